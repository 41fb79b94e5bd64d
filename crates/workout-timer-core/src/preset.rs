//! Timer presets: named, persisted timer configurations.
//!
//! A preset fully determines a run: the mode, its durations, and the audio
//! cue settings. Numeric fields are clamped to their documented bounds at the
//! edit boundary; the engine additionally clamps defensively on `start`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// Fixed total duration counted in whole minutes, with a cue at each
    /// minute boundary (EMOM style).
    #[default]
    Interval,
    /// Repetitions of a hold phase followed by a rest phase (hangboard style).
    HoldRest,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Interval => "interval",
            TimerMode::HoldRest => "hold_rest",
        }
    }

    /// Parse the database representation. Unknown values fall back to
    /// `Interval`, matching the schema default.
    pub fn from_db(s: &str) -> Self {
        match s {
            "hold_rest" => TimerMode::HoldRest,
            _ => TimerMode::Interval,
        }
    }
}

/// How countdown cues are rendered: synthesized tones or spoken numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueStyle {
    #[default]
    Tone,
    Spoken,
}

impl CueStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CueStyle::Tone => "tone",
            CueStyle::Spoken => "spoken",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "spoken" => CueStyle::Spoken,
            _ => CueStyle::Tone,
        }
    }
}

/// A saved timer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerPreset {
    /// Database rowid; 0 for an unsaved preset.
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub mode: TimerMode,
    /// Interval mode: total duration in minutes (2-120).
    pub total_minutes: u32,
    pub audio_enabled: bool,
    #[serde(default)]
    pub cue_style: CueStyle,
    /// How many seconds before a boundary the countdown cue starts (1-10).
    pub cue_lead_seconds: u32,
    /// Get-ready countdown before the workout begins; 0 disables, else 2-30.
    #[serde(default)]
    pub initial_countdown_seconds: u32,
    /// HoldRest mode: hold phase length in seconds (1-60).
    #[serde(default = "default_hold_seconds")]
    pub hold_seconds: u32,
    /// HoldRest mode: rest phase length in seconds (1-60).
    #[serde(default = "default_rest_seconds")]
    pub rest_seconds: u32,
    /// HoldRest mode: repetition count (1-100).
    #[serde(default = "default_total_repetitions")]
    pub total_repetitions: u32,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_hold_seconds() -> u32 {
    7
}
fn default_rest_seconds() -> u32 {
    3
}
fn default_total_repetitions() -> u32 {
    6
}

impl Default for TimerPreset {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            mode: TimerMode::Interval,
            total_minutes: 10,
            audio_enabled: true,
            cue_style: CueStyle::Tone,
            cue_lead_seconds: 3,
            initial_countdown_seconds: 0,
            hold_seconds: default_hold_seconds(),
            rest_seconds: default_rest_seconds(),
            total_repetitions: default_total_repetitions(),
            created_at: Utc::now(),
        }
    }
}

impl TimerPreset {
    /// Coerce every numeric field into its documented bounds, in place.
    ///
    /// `initial_countdown_seconds` is special: 0 means disabled and stays 0,
    /// anything else lands in 2-30.
    pub fn clamp(&mut self) {
        self.total_minutes = self.total_minutes.clamp(2, 120);
        self.cue_lead_seconds = self.cue_lead_seconds.clamp(1, 10);
        if self.initial_countdown_seconds != 0 {
            self.initial_countdown_seconds = self.initial_countdown_seconds.clamp(2, 30);
        }
        self.hold_seconds = self.hold_seconds.clamp(1, 60);
        self.rest_seconds = self.rest_seconds.clamp(1, 60);
        self.total_repetitions = self.total_repetitions.clamp(1, 100);
    }

    /// A clamped copy; used by the engine which trusts but verifies.
    pub fn clamped(&self) -> Self {
        let mut p = self.clone();
        p.clamp();
        p
    }

    /// Total run length in seconds for the configured mode.
    pub fn total_seconds(&self) -> u32 {
        match self.mode {
            TimerMode::Interval => self.total_minutes * 60,
            TimerMode::HoldRest => {
                (self.hold_seconds + self.rest_seconds) * self.total_repetitions
            }
        }
    }

    /// Seconds in one hold+rest repetition (HoldRest mode).
    pub fn repetition_seconds(&self) -> u32 {
        self.hold_seconds + self.rest_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_coerces_all_bounds() {
        let mut p = TimerPreset {
            total_minutes: 500,
            cue_lead_seconds: 0,
            initial_countdown_seconds: 1,
            hold_seconds: 0,
            rest_seconds: 99,
            total_repetitions: 101,
            ..Default::default()
        };
        p.clamp();
        assert_eq!(p.total_minutes, 120);
        assert_eq!(p.cue_lead_seconds, 1);
        assert_eq!(p.initial_countdown_seconds, 2);
        assert_eq!(p.hold_seconds, 1);
        assert_eq!(p.rest_seconds, 60);
        assert_eq!(p.total_repetitions, 100);
    }

    #[test]
    fn clamp_keeps_disabled_initial_countdown() {
        let mut p = TimerPreset {
            initial_countdown_seconds: 0,
            ..Default::default()
        };
        p.clamp();
        assert_eq!(p.initial_countdown_seconds, 0);
    }

    #[test]
    fn total_seconds_interval() {
        let p = TimerPreset {
            mode: TimerMode::Interval,
            total_minutes: 12,
            ..Default::default()
        };
        assert_eq!(p.total_seconds(), 12 * 60);
    }

    #[test]
    fn total_seconds_hold_rest() {
        let p = TimerPreset {
            mode: TimerMode::HoldRest,
            hold_seconds: 7,
            rest_seconds: 3,
            total_repetitions: 6,
            ..Default::default()
        };
        assert_eq!(p.total_seconds(), 60);
    }

    #[test]
    fn mode_db_roundtrip() {
        assert_eq!(TimerMode::from_db(TimerMode::HoldRest.as_str()), TimerMode::HoldRest);
        assert_eq!(TimerMode::from_db("something_else"), TimerMode::Interval);
        assert_eq!(CueStyle::from_db(CueStyle::Spoken.as_str()), CueStyle::Spoken);
    }
}
