//! # Workout Timer Core Library
//!
//! Core business logic for Workout Timer, an interval workout timer with two
//! modes: fixed-length minute intervals (EMOM style) and hold/rest repetitions
//! (hangboard style). All operations are available to a standalone CLI binary;
//! any GUI is expected to be a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a synchronous state machine advanced one logical second
//!   at a time by calling `tick()`; it decides cue timing and phase
//!   transitions but owns no clock of its own
//! - **Timer Service**: a supervisor that drives the engine on a one-second
//!   tokio cadence, broadcasts immutable state snapshots, and forwards cues
//!   to whatever renders them
//! - **Storage**: SQLite-based preset storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: the timer state machine
//! - [`TimerService`]: engine supervisor with snapshot stream and commands
//! - [`PresetDb`]: preset persistence
//! - [`Config`]: application configuration management

pub mod cue;
pub mod error;
pub mod format;
pub mod preset;
pub mod service;
pub mod storage;
pub mod timer;

pub use cue::{create_cue_channel, Cue, CueSender};
pub use error::{ConfigError, CoreError, DatabaseError, EngineError};
pub use preset::{CueStyle, TimerMode, TimerPreset};
pub use service::{NoopWakeLock, TimerService, WakeLock};
pub use storage::{Config, PresetDb};
pub use timer::{EngineState, ModeProgress, TimerEngine};
