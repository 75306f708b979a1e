//! Graft: folder ingestion into an in-memory project tree
//!
//! A user-selected folder is read, either through a recursive directory
//! handle or a flat list of relative paths, into a tree of file and
//! directory nodes with bounded content loading, and merged into the
//! caller's project tree at a mount path.

pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod messaging;
pub mod notify;
pub mod provider;
pub mod source;
pub mod summary;
pub mod tooling;
pub mod tree;
pub mod types;

pub use error::{ApiError, ContentError, EntryError};
pub use ingest::{DirectoryIngestor, IngestOutcome};
pub use tree::{FileSystemNode, PathTreeBuilder};
