//! Acquisition strategy selection.

use crate::source::Capabilities;
use std::fmt;

/// How a folder is obtained from the environment, chosen once up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionStrategy {
    /// Recursive directory handle with explicit read permission.
    NativeHandle,
    /// Flat list of files carrying folder-relative paths.
    FlatFileList,
    Unsupported,
}

impl AcquisitionStrategy {
    /// Prefer native handles, fall back to a file list.
    pub fn detect(capabilities: Capabilities) -> Self {
        if capabilities.directory_handle {
            AcquisitionStrategy::NativeHandle
        } else if capabilities.file_list {
            AcquisitionStrategy::FlatFileList
        } else {
            AcquisitionStrategy::Unsupported
        }
    }
}

impl fmt::Display for AcquisitionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AcquisitionStrategy::NativeHandle => "native-handle",
            AcquisitionStrategy::FlatFileList => "flat-file-list",
            AcquisitionStrategy::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}
