//! Content loading with a size ceiling.
//!
//! Oversized and unreadable files never fail an import; they are replaced
//! by sentinel text so the rest of the folder still loads.

use crate::error::ContentError;
use crate::source::FileSource;
use tracing::{debug, warn};

/// Default size ceiling: 2 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;

/// Sentinel content for files that could not be read or decoded.
pub const READ_ERROR_SENTINEL: &str = "[Error reading file]";

/// Sentinel content for files above the size ceiling.
pub fn too_large_sentinel(size: u64) -> String {
    format!("[File too large: {:.2}MB]", size as f64 / 1024.0 / 1024.0)
}

/// Reads file content as text, bounded by `max_size` bytes.
#[derive(Debug, Clone)]
pub struct ContentLoader {
    max_size: u64,
}

impl ContentLoader {
    pub fn new(max_size: u64) -> Self {
        Self { max_size }
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Load a file's text, substituting sentinel content on any failure.
    pub async fn load(&self, file: &dyn FileSource) -> String {
        match self.try_load(file).await {
            Ok(text) => text,
            Err(ContentError::TooLarge { size }) => {
                debug!(file = file.name(), size, "File above size ceiling");
                too_large_sentinel(size)
            }
            Err(ContentError::ReadFailure(reason)) => {
                warn!(file = file.name(), %reason, "Error reading file");
                READ_ERROR_SENTINEL.to_string()
            }
        }
    }

    /// Load a file's text, reporting why it could not be loaded.
    pub async fn try_load(&self, file: &dyn FileSource) -> Result<String, ContentError> {
        self.check_size(file.size())?;
        let bytes = file
            .read()
            .await
            .map_err(|e| ContentError::ReadFailure(e.to_string()))?;
        String::from_utf8(bytes)
            .map_err(|e| ContentError::ReadFailure(format!("not valid UTF-8: {e}")))
    }

    /// The ceiling is inclusive: a file of exactly `max_size` bytes loads.
    pub fn check_size(&self, size: u64) -> Result<(), ContentError> {
        if size > self.max_size {
            Err(ContentError::TooLarge { size })
        } else {
            Ok(())
        }
    }
}

impl Default for ContentLoader {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}
