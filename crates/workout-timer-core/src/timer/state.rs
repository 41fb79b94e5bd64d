//! Engine run state and its per-mode progress variant.

use serde::{Deserialize, Serialize};

use crate::preset::{CueStyle, TimerMode};

/// Mode-specific progress within a run.
///
/// A tagged variant rather than two engine subtypes: the tick function
/// pattern-matches on this, and observers get the per-mode fields without
/// nullable placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModeProgress {
    Interval {
        /// Minute index of the most recently completed second.
        current_minute: u32,
        total_minutes: u32,
    },
    HoldRest {
        current_repetition: u32,
        /// Seconds elapsed inside the current repetition (0-based).
        seconds_into_repetition: u32,
        /// true while in the hold phase, false during rest.
        is_hold_phase: bool,
        hold_seconds: u32,
        rest_seconds: u32,
        total_repetitions: u32,
    },
}

impl Default for ModeProgress {
    fn default() -> Self {
        ModeProgress::Interval {
            current_minute: 0,
            total_minutes: 0,
        }
    }
}

/// Immutable snapshot of the timer engine.
///
/// Owned exclusively by the engine and mutated only by its command and tick
/// handlers; observers receive clones and can never alias live state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub preset_id: i64,
    pub preset_name: String,
    pub mode: TimerMode,

    pub running: bool,
    pub paused: bool,
    pub complete: bool,

    pub in_initial_countdown: bool,
    pub initial_countdown_remaining: u32,

    /// Seconds counted so far across the whole run (excluding the initial
    /// countdown).
    pub elapsed_seconds: u32,
    pub total_seconds: u32,

    pub audio_enabled: bool,
    pub cue_style: CueStyle,
    pub cue_lead_seconds: u32,

    pub progress: ModeProgress,
}

impl EngineState {
    /// Seconds left in the run as a whole.
    pub fn remaining_seconds(&self) -> u32 {
        self.total_seconds.saturating_sub(self.elapsed_seconds)
    }

    /// Seconds left in the current hold or rest phase (HoldRest runs only).
    pub fn phase_remaining_seconds(&self) -> Option<u32> {
        match self.progress {
            ModeProgress::HoldRest {
                seconds_into_repetition,
                is_hold_phase,
                hold_seconds,
                rest_seconds,
                ..
            } => {
                let remaining = if is_hold_phase {
                    hold_seconds.saturating_sub(seconds_into_repetition)
                } else {
                    (hold_seconds + rest_seconds).saturating_sub(seconds_into_repetition)
                };
                Some(remaining)
            }
            ModeProgress::Interval { .. } => None,
        }
    }
}
