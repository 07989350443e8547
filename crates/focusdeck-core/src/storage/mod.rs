mod config;
mod database;
mod pomodoro;

pub use config::{Config, NotificationsConfig, RemoteConfig};
pub use database::Database;
pub use pomodoro::PomodoroStore;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/focusdeck[-dev]/` based on FOCUSDECK_ENV.
///
/// Set FOCUSDECK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSDECK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusdeck-dev")
    } else {
        base_dir.join("focusdeck")
    };

    std::fs::create_dir_all(&dir).map_err(|_| ConfigError::NoConfigDir)?;
    Ok(dir)
}
