pub mod completions;
pub mod config;
pub mod preset;
pub mod timer;
