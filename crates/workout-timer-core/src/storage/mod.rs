mod config;
pub mod migrations;
pub mod preset_db;

pub use config::{AudioConfig, Config, PresetDefaultsConfig};
pub use preset_db::PresetDb;

use std::path::PathBuf;

/// Returns the data directory, `~/.config/workout-timer[-dev]/` by default.
///
/// `WORKOUT_TIMER_DATA_DIR` overrides the location entirely (used by tests);
/// `WORKOUT_TIMER_ENV=dev` switches to a separate development directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = if let Ok(dir) = std::env::var("WORKOUT_TIMER_DATA_DIR") {
        PathBuf::from(dir)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");
        let env = std::env::var("WORKOUT_TIMER_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("workout-timer-dev")
        } else {
            base_dir.join("workout-timer")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
