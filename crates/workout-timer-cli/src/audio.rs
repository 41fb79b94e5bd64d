//! Audio cue rendering: synthesized tones plus speech.
//!
//! Runs as a background task consuming cues from the timer service's channel.
//! Countdown tones rise in pitch toward the boundary, with a long final beep.
//! TTS is only available on Windows/macOS - Linux falls back to espeak.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use workout_timer_core::storage::AudioConfig;
use workout_timer_core::{Cue, CueStyle};

const TONE_BASE_HZ: f32 = 600.0;
const TONE_SPAN_HZ: f32 = 600.0;
const TONE_BASE_GAIN: f32 = 0.7;
const TONE_GAIN_SPAN: f32 = 0.3;
const TONE_MILLIS: u64 = 200;
const FINAL_TONE_MILLIS: u64 = 1000;

pub struct AudioService {
    cue_rx: mpsc::Receiver<Cue>,

    /// Output volume, 0-100.
    volume: u32,

    /// Custom boundary sound file; the built-in double tone when unset.
    boundary_sound: Option<PathBuf>,

    /// TTS engine (None if initialization failed or unavailable on platform)
    #[cfg(not(target_os = "linux"))]
    tts: Option<tts::Tts>,
}

impl AudioService {
    pub fn new(cue_rx: mpsc::Receiver<Cue>, config: &AudioConfig) -> Self {
        #[cfg(not(target_os = "linux"))]
        let tts = match tts::Tts::default() {
            Ok(mut engine) => {
                let _ = engine.set_rate(engine.normal_rate());
                Some(engine)
            }
            Err(_) => None,
        };

        Self {
            cue_rx,
            volume: config.volume.min(100),
            boundary_sound: config.boundary_sound.as_ref().map(PathBuf::from),
            #[cfg(not(target_os = "linux"))]
            tts,
        }
    }

    /// Consume cues until the channel closes.
    pub async fn run(mut self) {
        while let Some(cue) = self.cue_rx.recv().await {
            match cue {
                Cue::Countdown {
                    seconds_remaining,
                    lead_seconds,
                    style,
                } => match style {
                    CueStyle::Tone => {
                        let tone = countdown_tone(seconds_remaining, lead_seconds);
                        self.play_tone(tone);
                    }
                    CueStyle::Spoken => self.speak(&seconds_remaining.to_string()),
                },
                Cue::Boundary => self.play_boundary(),
                Cue::Speech { text } => self.speak(&text),
            }
        }
    }

    fn play_tone(&self, tone: Tone) {
        let gain = tone.gain * self.volume as f32 / 100.0;
        std::thread::spawn(move || {
            use rodio::source::{SineWave, Source};
            use rodio::{OutputStream, Sink};

            let Ok((_stream, handle)) = OutputStream::try_default() else {
                return;
            };
            let Ok(sink) = Sink::try_new(&handle) else {
                return;
            };
            let source = SineWave::new(tone.freq)
                .take_duration(Duration::from_millis(tone.millis))
                .amplify(gain);
            sink.append(source);
            sink.sleep_until_end();
        });
    }

    fn play_boundary(&self) {
        if let Some(path) = self.boundary_sound.clone() {
            if path.exists() {
                self.play_sound_file(path);
                return;
            }
        }

        // Built-in boundary: a quick two-note chime.
        let gain = self.volume as f32 / 100.0;
        std::thread::spawn(move || {
            use rodio::source::{SineWave, Source};
            use rodio::{OutputStream, Sink};

            let Ok((_stream, handle)) = OutputStream::try_default() else {
                return;
            };
            let Ok(sink) = Sink::try_new(&handle) else {
                return;
            };
            for freq in [900.0, 1200.0] {
                let source = SineWave::new(freq)
                    .take_duration(Duration::from_millis(150))
                    .amplify(gain);
                sink.append(source);
            }
            sink.sleep_until_end();
        });
    }

    fn play_sound_file(&self, path: PathBuf) {
        let vol = self.volume;
        std::thread::spawn(move || {
            use rodio::{Decoder, OutputStream, Sink};
            use std::fs::File;
            use std::io::BufReader;

            let Ok((_stream, handle)) = OutputStream::try_default() else {
                return;
            };
            let Ok(file) = File::open(&path) else { return };
            let Ok(source) = Decoder::new(BufReader::new(file)) else {
                return;
            };
            let Ok(sink) = Sink::try_new(&handle) else {
                return;
            };

            sink.set_volume(vol as f32 / 100.0);
            sink.append(source);
            sink.sleep_until_end();
        });
    }

    /// Speak text using TTS (espeak on Linux)
    #[cfg(not(target_os = "linux"))]
    fn speak(&mut self, text: &str) {
        if let Some(ref mut tts) = self.tts {
            let _ = tts.speak(text, false);
        }
    }

    #[cfg(target_os = "linux")]
    fn speak(&mut self, text: &str) {
        use std::process::Command;
        let text = text.to_string();
        std::thread::spawn(move || {
            let _ = Command::new("espeak").arg(&text).output();
        });
    }
}

/// Parameters for one synthesized countdown tone.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tone {
    freq: f32,
    /// Urgency gain, 0.7 at the first cue rising to 1.0 toward the boundary;
    /// multiplied by the config volume.
    gain: f32,
    millis: u64,
}

/// Pitch and urgency gain both rise across the lead window as
/// `1 - remaining / lead`, and the last second gets a long beep.
fn countdown_tone(seconds_remaining: u32, lead_seconds: u32) -> Tone {
    let lead = lead_seconds.max(1);
    let progress = 1.0 - seconds_remaining.min(lead) as f32 / lead as f32;
    Tone {
        freq: TONE_BASE_HZ + TONE_SPAN_HZ * progress,
        gain: TONE_BASE_GAIN + TONE_GAIN_SPAN * progress,
        millis: if seconds_remaining <= 1 {
            FINAL_TONE_MILLIS
        } else {
            TONE_MILLIS
        },
    }
}
