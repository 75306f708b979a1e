//! Platform directories for graft's own files.

use crate::error::ApiError;
use std::path::PathBuf;

fn project_dirs() -> Result<directories::ProjectDirs, ApiError> {
    directories::ProjectDirs::from("", "graft", "graft").ok_or_else(|| {
        ApiError::ConfigError("Could not determine platform directories (HOME not set)".to_string())
    })
}

/// `$XDG_CONFIG_HOME/graft` on Linux; the platform equivalent elsewhere.
pub fn config_dir() -> Result<PathBuf, ApiError> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Global config file, `<config dir>/config.toml`.
pub fn global_config_file() -> Result<PathBuf, ApiError> {
    Ok(config_dir()?.join("config.toml"))
}
