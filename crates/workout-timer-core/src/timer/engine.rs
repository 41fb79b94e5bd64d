//! Timer engine implementation.
//!
//! The timer engine is a state machine advanced one logical second per call.
//! It does not use internal threads or read the clock - the caller is
//! responsible for calling `tick()` once per elapsed second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> InitialCountdown -> Active(Interval | HoldRest) -> Complete
//! ```
//!
//! `paused` is an orthogonal flag over InitialCountdown/Active: a paused tick
//! is a no-op, so the caller keeps its cadence and no time is replayed or
//! skipped on resume.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.start(&preset)?;
//! // Once per second:
//! let cues = engine.tick(); // cues computed against pre-advance state
//! ```

use crate::cue::Cue;
use crate::error::EngineError;
use crate::preset::{TimerMode, TimerPreset};

use super::state::{EngineState, ModeProgress};

const SECONDS_PER_MINUTE: u32 = 60;

/// Core timer engine.
///
/// Operates on logical seconds -- no internal clock. Cue emission for a given
/// second always happens before that second's advancement is committed, so an
/// observer of state is guaranteed the cue condition matched the state before
/// the increment.
#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    state: EngineState,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Immutable snapshot for observers.
    pub fn snapshot(&self) -> EngineState {
        self.state.clone()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a run from the given preset.
    ///
    /// Valid only from Idle or Complete; a run in progress must be stopped
    /// first. Replaces the whole state, entering the initial countdown when
    /// the preset configures one, otherwise the mode's first second.
    ///
    /// # Errors
    /// Returns [`EngineError::AlreadyRunning`] while a run is active.
    pub fn start(&mut self, preset: &TimerPreset) -> Result<(), EngineError> {
        if self.state.running {
            return Err(EngineError::AlreadyRunning);
        }
        // The edit boundary already clamps; clamp again rather than trust.
        let preset = preset.clamped();

        let progress = match preset.mode {
            TimerMode::Interval => ModeProgress::Interval {
                current_minute: 0,
                total_minutes: preset.total_minutes,
            },
            TimerMode::HoldRest => ModeProgress::HoldRest {
                current_repetition: 0,
                seconds_into_repetition: 0,
                is_hold_phase: true,
                hold_seconds: preset.hold_seconds,
                rest_seconds: preset.rest_seconds,
                total_repetitions: preset.total_repetitions,
            },
        };

        self.state = EngineState {
            preset_id: preset.id,
            preset_name: preset.name.clone(),
            mode: preset.mode,
            running: true,
            paused: false,
            complete: false,
            in_initial_countdown: preset.initial_countdown_seconds > 0,
            initial_countdown_remaining: preset.initial_countdown_seconds,
            elapsed_seconds: 0,
            total_seconds: preset.total_seconds(),
            audio_enabled: preset.audio_enabled,
            cue_style: preset.cue_style,
            cue_lead_seconds: preset.cue_lead_seconds,
            progress,
        };
        Ok(())
    }

    /// Freeze advancement. Returns false (no-op) if not running or already
    /// paused.
    pub fn pause(&mut self) -> bool {
        if self.state.running && !self.state.paused {
            self.state.paused = true;
            true
        } else {
            false
        }
    }

    /// Continue from the frozen state. Returns false (no-op) if not paused.
    pub fn resume(&mut self) -> bool {
        if self.state.running && self.state.paused {
            self.state.paused = false;
            true
        } else {
            false
        }
    }

    /// Reset to the idle state. Valid from any state.
    pub fn stop(&mut self) {
        self.state = EngineState::default();
    }

    // ── Tick ─────────────────────────────────────────────────────────

    /// Advance one logical second and return the cues for it.
    ///
    /// A paused or idle engine ticks as a no-op; the caller may keep its
    /// cadence running regardless.
    pub fn tick(&mut self) -> Vec<Cue> {
        if !self.state.running || self.state.paused {
            return Vec::new();
        }
        if self.state.in_initial_countdown {
            return self.tick_initial_countdown();
        }
        match self.state.progress {
            ModeProgress::Interval { .. } => self.tick_interval(),
            ModeProgress::HoldRest { .. } => self.tick_hold_rest(),
        }
    }

    fn tick_initial_countdown(&mut self) -> Vec<Cue> {
        let mut cues = Vec::new();
        let remaining = self.state.initial_countdown_remaining;
        if remaining > 0 {
            if self.state.audio_enabled && remaining <= self.state.cue_lead_seconds {
                cues.push(self.countdown_cue(remaining));
            }
            self.state.initial_countdown_remaining = remaining - 1;
        }
        if self.state.initial_countdown_remaining == 0 {
            // Get-set cue fires even with audio disabled, as the original did.
            cues.push(Cue::Boundary);
            self.state.in_initial_countdown = false;
        }
        cues
    }

    fn tick_interval(&mut self) -> Vec<Cue> {
        if self.state.elapsed_seconds >= self.state.total_seconds {
            return self.finish("Workout complete!");
        }

        let mut cues = Vec::new();
        let second = self.state.elapsed_seconds;
        let seconds_in_minute = second % SECONDS_PER_MINUTE;
        let minute = second / SECONDS_PER_MINUTE;

        if self.state.audio_enabled {
            let until_next_minute = SECONDS_PER_MINUTE - seconds_in_minute;
            if until_next_minute > 0 && until_next_minute <= self.state.cue_lead_seconds {
                cues.push(self.countdown_cue(until_next_minute));
            }
            // A new minute just began; skip the very first second of the run.
            if seconds_in_minute == 0 && minute > 0 {
                cues.push(Cue::Boundary);
            }
        }

        self.state.elapsed_seconds = second + 1;
        if let ModeProgress::Interval { current_minute, .. } = &mut self.state.progress {
            // Committed from the second just completed, not the incremented
            // one; the boundary cue above depends on this.
            *current_minute = minute;
        }
        cues
    }

    fn tick_hold_rest(&mut self) -> Vec<Cue> {
        let ModeProgress::HoldRest {
            current_repetition,
            seconds_into_repetition,
            hold_seconds,
            rest_seconds,
            total_repetitions,
            ..
        } = self.state.progress
        else {
            return Vec::new();
        };

        if current_repetition >= total_repetitions {
            return self.finish("Climbing workout complete!");
        }

        let mut cues = Vec::new();
        let is_holding = seconds_into_repetition < hold_seconds;
        let time_in_phase = if is_holding {
            seconds_into_repetition
        } else {
            seconds_into_repetition - hold_seconds
        };
        let phase_length = if is_holding { hold_seconds } else { rest_seconds };
        let until_phase_end = phase_length - time_in_phase;

        if self.state.audio_enabled {
            // Countdown only toward the end of rest, never during a hold.
            if !is_holding
                && until_phase_end > 0
                && until_phase_end <= self.state.cue_lead_seconds
            {
                cues.push(self.countdown_cue(until_phase_end));
            }
            if seconds_into_repetition == 0 && current_repetition > 0 {
                cues.push(Cue::Boundary);
            }
            if seconds_into_repetition == hold_seconds && rest_seconds > 0 {
                cues.push(Cue::Speech {
                    text: "Rest".into(),
                });
            }
        }

        let next_second = seconds_into_repetition + 1;
        let repetition_seconds = hold_seconds + rest_seconds;
        let repetition_done = next_second >= repetition_seconds;

        if let ModeProgress::HoldRest {
            current_repetition,
            seconds_into_repetition,
            is_hold_phase,
            ..
        } = &mut self.state.progress
        {
            if repetition_done {
                *seconds_into_repetition = 0;
                *current_repetition += 1;
                *is_hold_phase = true;
            } else {
                *seconds_into_repetition = next_second;
                *is_hold_phase = next_second < hold_seconds;
            }
        }
        self.state.elapsed_seconds += 1;
        cues
    }

    fn finish(&mut self, announcement: &str) -> Vec<Cue> {
        self.state.running = false;
        self.state.paused = false;
        self.state.complete = true;
        vec![Cue::Speech {
            text: announcement.into(),
        }]
    }

    fn countdown_cue(&self, seconds_remaining: u32) -> Cue {
        Cue::Countdown {
            seconds_remaining,
            lead_seconds: self.state.cue_lead_seconds,
            style: self.state.cue_style,
        }
    }
}
