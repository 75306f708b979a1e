//! ConfigLoader facade over the merge service.

use super::merge::MergeService;
use super::GraftConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration; `path` replaces the global file.
    pub fn load(path: Option<&Path>) -> Result<GraftConfig, ApiError> {
        let config = match path {
            Some(path) => MergeService::load_from_file(path)?,
            None => MergeService::load()?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn default() -> GraftConfig {
        GraftConfig::default()
    }
}
