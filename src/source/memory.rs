//! In-memory folder sources.
//!
//! Deterministic stand-ins for real handles: entries can be told to fail,
//! permission answers are scripted, and a directory can hold its
//! enumeration behind a gate to keep an ingestion suspended mid-read.

use crate::error::EntryError;
use crate::source::handle::{
    Capabilities, DirectoryEntry, DirectoryHandle, FileHandle, FileSource, FolderPicker,
    PermissionState, SelectedFile,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// In-memory file.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    bytes: Vec<u8>,
    reported_size: Option<u64>,
    fail_open: bool,
    fail_read: bool,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: content.into(),
            reported_size: None,
            fail_open: false,
            fail_read: false,
        }
    }

    /// Report `size` instead of the real byte length.
    pub fn with_reported_size(mut self, size: u64) -> Self {
        self.reported_size = Some(size);
        self
    }

    /// Fail when the entry is resolved to a file.
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Fail when the bytes are read.
    pub fn failing_read(mut self) -> Self {
        self.fail_read = true;
        self
    }
}

#[async_trait]
impl FileSource for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.reported_size.unwrap_or(self.bytes.len() as u64)
    }

    async fn read(&self) -> Result<Vec<u8>, EntryError> {
        if self.fail_read {
            return Err(EntryError::Read {
                name: self.name.clone(),
                reason: "simulated read failure".to_string(),
            });
        }
        Ok(self.bytes.clone())
    }
}

#[async_trait]
impl FileHandle for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_file(&self) -> Result<Box<dyn FileSource>, EntryError> {
        if self.fail_open {
            return Err(EntryError::Read {
                name: self.name.clone(),
                reason: "simulated open failure".to_string(),
            });
        }
        Ok(Box::new(self.clone()))
    }
}

/// In-memory directory entry.
#[derive(Debug, Clone)]
pub enum MemoryEntry {
    File(MemoryFile),
    Directory(MemoryDirectory),
}

/// In-memory directory.
#[derive(Debug, Clone)]
pub struct MemoryDirectory {
    name: String,
    entries: Vec<MemoryEntry>,
    permission: PermissionState,
    request_answer: PermissionState,
    permission_requests: Arc<AtomicUsize>,
    fail_enumerate: bool,
    gate: Option<Arc<Notify>>,
}

impl MemoryDirectory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            permission: PermissionState::Granted,
            request_answer: PermissionState::Granted,
            permission_requests: Arc::new(AtomicUsize::new(0)),
            fail_enumerate: false,
            gate: None,
        }
    }

    pub fn file(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.entries.push(MemoryEntry::File(MemoryFile::new(name, content)));
        self
    }

    pub fn with_file(mut self, file: MemoryFile) -> Self {
        self.entries.push(MemoryEntry::File(file));
        self
    }

    pub fn dir(mut self, dir: MemoryDirectory) -> Self {
        self.entries.push(MemoryEntry::Directory(dir));
        self
    }

    /// Script the permission answers: the current state, and the answer
    /// given when permission is requested.
    pub fn with_permission(
        mut self,
        current: PermissionState,
        on_request: PermissionState,
    ) -> Self {
        self.permission = current;
        self.request_answer = on_request;
        self
    }

    pub fn failing_enumeration(mut self) -> Self {
        self.fail_enumerate = true;
        self
    }

    /// Hold enumeration until the gate is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of times permission was requested on this directory.
    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectoryHandle for MemoryDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    async fn entries(&self) -> Result<Vec<DirectoryEntry>, EntryError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_enumerate {
            return Err(EntryError::Enumeration(format!(
                "simulated enumeration failure in {}",
                self.name
            )));
        }
        Ok(self
            .entries
            .iter()
            .map(|entry| match entry {
                MemoryEntry::File(file) => DirectoryEntry::File(Box::new(file.clone())),
                MemoryEntry::Directory(dir) => DirectoryEntry::Directory(Box::new(dir.clone())),
            })
            .collect())
    }

    async fn query_permission(&self) -> PermissionState {
        self.permission
    }

    async fn request_permission(&self) -> PermissionState {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        self.request_answer
    }
}

/// Scripted folder picker.
#[derive(Debug, Clone, Default)]
pub struct MemoryPicker {
    capabilities: Capabilities,
    directory: Option<MemoryDirectory>,
    files: Option<Vec<(String, MemoryFile)>>,
}

impl MemoryPicker {
    /// Picker offering native directory handles; selection yields `dir`.
    pub fn with_directory(dir: MemoryDirectory) -> Self {
        Self {
            capabilities: Capabilities {
                directory_handle: true,
                file_list: true,
            },
            directory: Some(dir),
            files: None,
        }
    }

    /// Picker offering only a flat file list; selection yields `files`.
    pub fn with_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, MemoryFile)>,
        P: Into<String>,
    {
        Self {
            capabilities: Capabilities {
                directory_handle: false,
                file_list: true,
            },
            directory: None,
            files: Some(files.into_iter().map(|(p, f)| (p.into(), f)).collect()),
        }
    }

    /// Picker where the user dismisses the dialog.
    pub fn cancelled(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            directory: None,
            files: None,
        }
    }

    /// Picker in an environment with no folder access at all.
    pub fn unsupported() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FolderPicker for MemoryPicker {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    async fn pick_directory(&self) -> Result<Option<Box<dyn DirectoryHandle>>, EntryError> {
        Ok(self
            .directory
            .clone()
            .map(|dir| Box::new(dir) as Box<dyn DirectoryHandle>))
    }

    async fn pick_files(&self) -> Result<Option<Vec<SelectedFile>>, EntryError> {
        Ok(self.files.as_ref().map(|files| {
            files
                .iter()
                .map(|(path, file)| SelectedFile {
                    relative_path: path.clone(),
                    file: Box::new(file.clone()),
                })
                .collect()
        }))
    }
}
