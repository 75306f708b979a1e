//! Folder ingestion: content loading, handle reading, and the ingestor.

pub mod content;
pub mod exclusion;
pub mod ingestor;
pub mod reader;
pub mod strategy;

pub use content::ContentLoader;
pub use exclusion::ExclusionSet;
pub use ingestor::{DirectoryIngestor, IngestOutcome, IngestState};
pub use reader::HandleTreeReader;
pub use strategy::AcquisitionStrategy;

use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// Ingestion limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Files above this many bytes get size-sentinel content (default: 2 MiB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Entry names skipped during ingestion
    #[serde(default = "default_excluded_names")]
    pub excluded_names: Vec<String>,
}

fn default_max_file_size() -> u64 {
    content::DEFAULT_MAX_FILE_SIZE
}

fn default_excluded_names() -> Vec<String> {
    exclusion::DEFAULT_EXCLUDED_NAMES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            excluded_names: default_excluded_names(),
        }
    }
}

impl IngestConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.max_file_size == 0 {
            return Err(ApiError::ConfigError(
                "ingest.max_file_size must be greater than zero".to_string(),
            ));
        }
        if self.excluded_names.iter().any(|n| n.is_empty() || n.contains('/')) {
            return Err(ApiError::ConfigError(
                "ingest.excluded_names entries must be single, non-empty names".to_string(),
            ));
        }
        Ok(())
    }

    pub fn loader(&self) -> ContentLoader {
        ContentLoader::new(self.max_file_size)
    }

    pub fn exclusions(&self) -> ExclusionSet {
        ExclusionSet::new(self.excluded_names.iter().cloned())
    }
}
