//! Capability interfaces over folder sources.
//!
//! Tree building only ever talks to these traits, so the same reader runs
//! against the local filesystem, a browser bridge, or the in-memory fakes.

use crate::error::EntryError;
use async_trait::async_trait;

/// Read permission state reported by a directory handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
}

/// A byte-bearing file with a known size and name.
#[async_trait]
pub trait FileSource: Send + Sync {
    fn name(&self) -> &str;

    /// Size in bytes, known without reading the content.
    fn size(&self) -> u64;

    async fn read(&self) -> Result<Vec<u8>, EntryError>;
}

/// A file entry yielded while enumerating a directory.
#[async_trait]
pub trait FileHandle: Send + Sync {
    fn name(&self) -> &str;

    /// Resolve the entry to a readable file.
    async fn get_file(&self) -> Result<Box<dyn FileSource>, EntryError>;
}

/// A recursive directory handle.
#[async_trait]
pub trait DirectoryHandle: Send + Sync {
    fn name(&self) -> &str;

    /// Enumerate direct children, in whatever order the source yields them.
    async fn entries(&self) -> Result<Vec<DirectoryEntry>, EntryError>;

    async fn query_permission(&self) -> PermissionState {
        PermissionState::Granted
    }

    async fn request_permission(&self) -> PermissionState {
        PermissionState::Granted
    }
}

/// One child of a directory handle.
pub enum DirectoryEntry {
    File(Box<dyn FileHandle>),
    Directory(Box<dyn DirectoryHandle>),
}

impl DirectoryEntry {
    pub fn name(&self) -> &str {
        match self {
            DirectoryEntry::File(handle) => handle.name(),
            DirectoryEntry::Directory(handle) => handle.name(),
        }
    }
}

/// A file from a multi-file folder selection.
pub struct SelectedFile {
    /// `/`-separated path relative to the chosen folder's parent,
    /// starting with the folder name itself.
    pub relative_path: String,
    pub file: Box<dyn FileSource>,
}

/// Acquisition mechanisms offered by the running environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub directory_handle: bool,
    pub file_list: bool,
}

/// User-driven folder selection.
///
/// `Ok(None)` means the user cancelled the selection.
#[async_trait]
pub trait FolderPicker: Send + Sync {
    fn capabilities(&self) -> Capabilities;

    async fn pick_directory(&self) -> Result<Option<Box<dyn DirectoryHandle>>, EntryError>;

    async fn pick_files(&self) -> Result<Option<Vec<SelectedFile>>, EntryError>;
}
