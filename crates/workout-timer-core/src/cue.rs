//! Audio cue types and the channel that carries them.
//!
//! The engine emits cues; a renderer (tones, speech) consumes them. Delivery
//! is fire-and-forget: the channel is bounded and a full or closed channel
//! drops the cue rather than delaying the tick cadence.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::preset::CueStyle;

/// A single audio notification emitted at a specific countdown moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cue {
    /// Countdown toward a boundary. The renderer derives urgency (pitch,
    /// volume) from `seconds_remaining / lead_seconds` and may use a longer
    /// tone at exactly one second remaining; both numbers are passed so it
    /// can decide.
    Countdown {
        seconds_remaining: u32,
        lead_seconds: u32,
        style: CueStyle,
    },
    /// A minute or repetition just rolled over (or the get-ready countdown
    /// finished). Rendered as a distinct double tone.
    Boundary,
    /// Spoken text, regardless of the configured countdown style.
    Speech { text: String },
}

/// Sender half of the cue channel, held by the timer service.
pub type CueSender = mpsc::Sender<Cue>;

/// Create a cue channel. A small buffer is plenty: at most a handful of cues
/// fire per second, and stale cues are worthless anyway.
pub fn create_cue_channel() -> (CueSender, mpsc::Receiver<Cue>) {
    mpsc::channel(64)
}
