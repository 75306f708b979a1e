//! Directory ingestion orchestration.
//!
//! One attempt runs `Idle -> AcquiringPermission -> Reading -> Merging -> Idle`.
//! A failed attempt passes through `Error` and is back at `Idle` when the
//! call returns. A second call while one is in flight is rejected.

use crate::error::ApiError;
use crate::ingest::content::ContentLoader;
use crate::ingest::exclusion::ExclusionSet;
use crate::ingest::reader::HandleTreeReader;
use crate::ingest::strategy::AcquisitionStrategy;
use crate::ingest::IngestConfig;
use crate::notify::{Notice, Notifier};
use crate::source::{DirectoryHandle, FolderPicker, PermissionState};
use crate::tree::mount::TreeConsumer;
use crate::tree::node::FileSystemNode;
use crate::tree::path_builder::PathTreeBuilder;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Ingestor lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestState {
    Idle,
    AcquiringPermission,
    Reading,
    Merging,
    Error,
}

/// Result of one ingestion attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Nodes were merged at `mount_path`.
    Merged { mount_path: String, node_count: usize },
    /// The user dismissed the selection; the tree is unchanged.
    Cancelled,
}

/// Resets the busy flag and state when an attempt ends, however it ends.
struct InFlight<'a> {
    busy: &'a AtomicBool,
    state: &'a RwLock<IngestState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.state.write() = IngestState::Idle;
        self.busy.store(false, Ordering::Release);
    }
}

/// Imports a user-selected folder into the caller's tree.
pub struct DirectoryIngestor {
    picker: Box<dyn FolderPicker>,
    tree: Box<dyn TreeConsumer>,
    notifier: Box<dyn Notifier>,
    strategy: AcquisitionStrategy,
    reader: HandleTreeReader,
    loader: ContentLoader,
    exclusions: ExclusionSet,
    busy: AtomicBool,
    state: RwLock<IngestState>,
}

impl DirectoryIngestor {
    /// Create an ingestor; the picker's capabilities are checked once here.
    pub fn new(
        picker: Box<dyn FolderPicker>,
        tree: Box<dyn TreeConsumer>,
        notifier: Box<dyn Notifier>,
        config: &IngestConfig,
    ) -> Self {
        let strategy = AcquisitionStrategy::detect(picker.capabilities());
        debug!(%strategy, "Selected acquisition strategy");
        let loader = config.loader();
        let exclusions = config.exclusions();
        Self {
            picker,
            tree,
            notifier,
            strategy,
            reader: HandleTreeReader::new(loader.clone(), exclusions.clone()),
            loader,
            exclusions,
            busy: AtomicBool::new(false),
            state: RwLock::new(IngestState::Idle),
        }
    }

    pub fn strategy(&self) -> AcquisitionStrategy {
        self.strategy
    }

    pub fn state(&self) -> IngestState {
        *self.state.read()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn set_state(&self, state: IngestState) {
        debug!(?state, "Ingest state transition");
        *self.state.write() = state;
    }

    fn begin(&self) -> Result<InFlight<'_>, ApiError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ApiError::IngestionInProgress)?;
        Ok(InFlight {
            busy: &self.busy,
            state: &self.state,
        })
    }

    /// Ask the user for a folder and merge it at `mount_path` ("" is the root).
    pub async fn ingest_directory(&self, mount_path: &str) -> Result<IngestOutcome, ApiError> {
        let _in_flight = match self.begin() {
            Ok(guard) => guard,
            Err(e) => {
                warn!("Ingestion rejected: another ingestion is in flight");
                self.notifier.notify(Notice::Error(e.to_string()));
                return Err(e);
            }
        };

        let result = self.run(mount_path).await;
        match &result {
            Ok(IngestOutcome::Merged { node_count, .. }) => {
                info!(mount_path, node_count, "Folder loaded");
                self.notifier.notify(Notice::Dismiss);
                self.notifier.notify(Notice::Success("Folder loaded successfully".to_string()));
            }
            Ok(IngestOutcome::Cancelled) => {
                info!("Folder selection cancelled");
            }
            Err(e) => {
                self.set_state(IngestState::Error);
                warn!(error = %e, "Ingestion failed");
                self.notifier.notify(Notice::Dismiss);
                self.notifier.notify(Notice::Error(format!("Failed to open folder: {}", e)));
            }
        }
        result
    }

    async fn run(&self, mount_path: &str) -> Result<IngestOutcome, ApiError> {
        match self.strategy {
            AcquisitionStrategy::NativeHandle => self.run_native(mount_path).await,
            AcquisitionStrategy::FlatFileList => self.run_file_list(mount_path).await,
            AcquisitionStrategy::Unsupported => Err(ApiError::UnsupportedEnvironment),
        }
    }

    async fn run_native(&self, mount_path: &str) -> Result<IngestOutcome, ApiError> {
        self.set_state(IngestState::AcquiringPermission);
        let Some(handle) = self.picker.pick_directory().await? else {
            return Ok(IngestOutcome::Cancelled);
        };
        ensure_read_permission(handle.as_ref()).await?;

        self.set_state(IngestState::Reading);
        self.notifier
            .notify(Notice::Loading("Reading folder contents...".to_string()));
        let nodes = self
            .reader
            .read(handle.as_ref())
            .await
            .map_err(|e| ApiError::DirectoryRead(e.to_string()))?;

        self.merge(mount_path, nodes)
    }

    async fn run_file_list(&self, mount_path: &str) -> Result<IngestOutcome, ApiError> {
        self.set_state(IngestState::AcquiringPermission);
        let Some(files) = self.picker.pick_files().await? else {
            return Ok(IngestOutcome::Cancelled);
        };

        self.set_state(IngestState::Reading);
        self.notifier
            .notify(Notice::Loading("Reading folder contents...".to_string()));
        let mut builder = PathTreeBuilder::new();
        for selected in files {
            if self.exclusions.excludes_path(&selected.relative_path) {
                debug!(path = %selected.relative_path, "Skipping excluded path");
                continue;
            }
            let content = self.loader.load(selected.file.as_ref()).await;
            builder.add(&selected.relative_path, content);
        }

        self.merge(mount_path, builder.finish())
    }

    fn merge(
        &self,
        mount_path: &str,
        nodes: Vec<FileSystemNode>,
    ) -> Result<IngestOutcome, ApiError> {
        self.set_state(IngestState::Merging);
        let node_count = nodes.iter().map(FileSystemNode::count).sum();
        self.tree.update_directory(mount_path, nodes)?;
        Ok(IngestOutcome::Merged {
            mount_path: mount_path.to_string(),
            node_count,
        })
    }
}

async fn ensure_read_permission(handle: &dyn DirectoryHandle) -> Result<(), ApiError> {
    let mut status = handle.query_permission().await;
    if status != PermissionState::Granted {
        debug!(directory = handle.name(), ?status, "Requesting read permission");
        status = handle.request_permission().await;
    }
    if status != PermissionState::Granted {
        return Err(ApiError::PermissionDenied(format!(
            "read access to {} was not granted",
            handle.name()
        )));
    }
    Ok(())
}
