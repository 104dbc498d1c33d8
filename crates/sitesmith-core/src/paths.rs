//! Centralized path utilities
//!
//! All application paths in one place for consistency

use std::path::PathBuf;

use crate::constants::paths;

/// Get the sitesmith config directory (~/.sitesmith)
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(paths::CONFIG_DIR_NAME)
}

/// Get the config file path (~/.sitesmith/config.toml)
pub fn config_file() -> PathBuf {
    config_dir().join(paths::CONFIG_FILE_NAME)
}

/// Get the logs directory (~/.sitesmith/logs)
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Get the CLI log file (~/.sitesmith/logs/sitesmith.log)
pub fn log_file() -> PathBuf {
    logs_dir().join(paths::LOG_FILE_NAME)
}
