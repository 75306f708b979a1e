//! Local filesystem folder sources.

use crate::error::EntryError;
use crate::ingest::ExclusionSet;
use crate::source::handle::{
    Capabilities, DirectoryEntry, DirectoryHandle, FileHandle, FileSource, FolderPicker,
    PermissionState, SelectedFile,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().nfc().collect())
        .unwrap_or_default()
}

async fn canonical(path: &Path) -> Result<PathBuf, EntryError> {
    let resolved = tokio::fs::canonicalize(path).await?;
    Ok(dunce::simplified(&resolved).to_path_buf())
}

/// A file on disk, resolved with its size.
pub struct LocalFile {
    path: PathBuf,
    name: String,
    size: u64,
}

impl LocalFile {
    pub async fn open(path: PathBuf) -> Result<Self, EntryError> {
        let metadata = tokio::fs::metadata(&path).await?;
        Ok(Self {
            name: entry_name(&path),
            size: metadata.len(),
            path,
        })
    }
}

#[async_trait]
impl FileSource for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read(&self) -> Result<Vec<u8>, EntryError> {
        tokio::fs::read(&self.path).await.map_err(|e| EntryError::Read {
            name: self.name.clone(),
            reason: e.to_string(),
        })
    }
}

/// A file entry inside a local directory.
pub struct LocalFileHandle {
    path: PathBuf,
    name: String,
}

#[async_trait]
impl FileHandle for LocalFileHandle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_file(&self) -> Result<Box<dyn FileSource>, EntryError> {
        Ok(Box::new(LocalFile::open(self.path.clone()).await?))
    }
}

/// A directory on disk.
///
/// Symlinked directories are followed unless they resolve to the directory
/// itself or one of its ancestors.
pub struct LocalDirectory {
    path: PathBuf,
    name: String,
    confirm: bool,
    /// Canonical paths of the directories above this one.
    ancestors: Arc<Vec<PathBuf>>,
}

impl LocalDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: entry_name(&path),
            path,
            confirm: false,
            ancestors: Arc::new(Vec::new()),
        }
    }

    /// Ask on the terminal before granting read access.
    pub fn confirming(mut self) -> Self {
        self.confirm = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DirectoryHandle for LocalDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    async fn entries(&self) -> Result<Vec<DirectoryEntry>, EntryError> {
        let mut read_dir = tokio::fs::read_dir(&self.path).await.map_err(|e| {
            EntryError::Enumeration(format!("{}: {}", self.path.display(), e))
        })?;
        let own = canonical(&self.path).await?;
        let mut lineage = self.ancestors.as_ref().clone();
        lineage.push(own);
        let lineage = Arc::new(lineage);
        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let path = entry.path();
            let name = entry_name(&path);
            // Follows symlinks; dangling links are skipped.
            let metadata = match tokio::fs::metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unresolvable entry");
                    continue;
                }
            };
            if metadata.is_dir() {
                let resolved = match canonical(&path).await {
                    Ok(resolved) => resolved,
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "Skipping unresolvable directory"
                        );
                        continue;
                    }
                };
                if lineage.contains(&resolved) {
                    warn!(path = %path.display(), "Skipping directory link cycle");
                    continue;
                }
                entries.push(DirectoryEntry::Directory(Box::new(LocalDirectory {
                    path,
                    name,
                    confirm: false,
                    ancestors: Arc::clone(&lineage),
                })));
            } else if metadata.is_file() {
                entries.push(DirectoryEntry::File(Box::new(LocalFileHandle { path, name })));
            }
        }
        Ok(entries)
    }

    async fn query_permission(&self) -> PermissionState {
        if self.confirm {
            return PermissionState::Prompt;
        }
        match tokio::fs::read_dir(&self.path).await {
            Ok(_) => PermissionState::Granted,
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => PermissionState::Denied,
            Err(_) => PermissionState::Prompt,
        }
    }

    async fn request_permission(&self) -> PermissionState {
        if !self.confirm {
            return match tokio::fs::read_dir(&self.path).await {
                Ok(_) => PermissionState::Granted,
                Err(_) => PermissionState::Denied,
            };
        }
        let prompt = format!("Allow read access to {}?", self.path.display());
        let answer = tokio::task::spawn_blocking(move || {
            dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(true)
                .interact()
        })
        .await;
        match answer {
            Ok(Ok(true)) => PermissionState::Granted,
            Ok(Ok(false)) => PermissionState::Denied,
            Ok(Err(e)) => {
                warn!(error = %e, "Permission prompt failed");
                PermissionState::Denied
            }
            Err(e) => {
                warn!(error = %e, "Permission prompt task failed");
                PermissionState::Denied
            }
        }
    }
}

/// How a [`LocalPicker`] hands over the chosen folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerMode {
    /// Recursive directory handle.
    DirectoryHandle,
    /// Flat list of files with folder-relative paths.
    FileList,
}

/// Non-interactive picker whose "selection" is a folder given up front.
pub struct LocalPicker {
    root: PathBuf,
    mode: PickerMode,
    confirm: bool,
    pruned: ExclusionSet,
}

impl LocalPicker {
    pub fn new(root: impl Into<PathBuf>, mode: PickerMode) -> Self {
        Self {
            root: root.into(),
            mode,
            confirm: false,
            pruned: ExclusionSet::empty(),
        }
    }

    pub fn confirming(mut self, confirm: bool) -> Self {
        self.confirm = confirm;
        self
    }

    /// Directories with these names are not descended into when listing files.
    pub fn excluding(mut self, pruned: ExclusionSet) -> Self {
        self.pruned = pruned;
        self
    }

    fn ensure_root(&self) -> Result<(), EntryError> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(EntryError::Enumeration(format!(
                "{} is not a directory",
                self.root.display()
            )))
        }
    }
}

/// Walk `root` and list every file as `<root name>/<relative path>`.
///
/// Directories below the root whose name is in `pruned` are skipped whole.
pub fn list_relative_files(root: &Path, pruned: &ExclusionSet) -> Vec<(String, PathBuf)> {
    let root_name = entry_name(root);
    walkdir::WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !pruned.excludes_name(&entry_name(entry.path()))
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable path during walk");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(root).ok()?;
            let mut segments = vec![root_name.clone()];
            segments.extend(
                relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().nfc().collect::<String>()),
            );
            Some((segments.join("/"), entry.into_path()))
        })
        .collect()
}

#[async_trait]
impl FolderPicker for LocalPicker {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            directory_handle: self.mode == PickerMode::DirectoryHandle,
            file_list: true,
        }
    }

    async fn pick_directory(&self) -> Result<Option<Box<dyn DirectoryHandle>>, EntryError> {
        self.ensure_root()?;
        let mut dir = LocalDirectory::new(self.root.clone());
        if self.confirm {
            dir = dir.confirming();
        }
        Ok(Some(Box::new(dir) as Box<dyn DirectoryHandle>))
    }

    async fn pick_files(&self) -> Result<Option<Vec<SelectedFile>>, EntryError> {
        self.ensure_root()?;
        let root = self.root.clone();
        let pruned = self.pruned.clone();
        let listed = tokio::task::spawn_blocking(move || list_relative_files(&root, &pruned))
            .await
            .map_err(|e| EntryError::Enumeration(e.to_string()))?;
        debug!(count = listed.len(), root = %self.root.display(), "Listed folder files");

        let mut selected = Vec::with_capacity(listed.len());
        for (relative_path, path) in listed {
            match LocalFile::open(path).await {
                Ok(file) => selected.push(SelectedFile {
                    relative_path,
                    file: Box::new(file),
                }),
                Err(e) => warn!(path = %relative_path, error = %e, "Skipping file"),
            }
        }
        Ok(Some(selected))
    }
}
