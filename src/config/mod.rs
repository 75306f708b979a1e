//! Configuration
//!
//! Settings are layered: built-in defaults, then a config file, then
//! `GRAFT_*` environment variables (`__` separates nested keys, e.g.
//! `GRAFT_INGEST__MAX_FILE_SIZE`).

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::ApiError;
use crate::ingest::IngestConfig;
use crate::logging::LoggingConfig;
use crate::provider::GenerationSettings;
use crate::summary::SummaryConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraftConfig {
    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub summary: SummaryConfig,

    #[serde(default)]
    pub generation: GenerationSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GraftConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        self.ingest.validate()?;
        self.generation.validate()?;
        self.logging.validate()?;
        if self.summary.max_excerpt_lines == 0 {
            return Err(ApiError::ConfigError(
                "summary.max_excerpt_lines must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GraftConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: GraftConfig =
            serde_json::from_str(r#"{"ingest":{"max_file_size":1024}}"#).unwrap();
        assert_eq!(config.ingest.max_file_size, 1024);
        assert!(config.ingest.excluded_names.contains(&"node_modules".to_string()));
        assert_eq!(config.summary, SummaryConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_excerpt() {
        let mut config = GraftConfig::default();
        config.summary.max_excerpt_lines = 0;
        assert!(config.validate().is_err());
    }
}
