//! Folder sources: capability traits and their implementations.

pub mod handle;
pub mod local;
pub mod memory;

pub use handle::{
    Capabilities, DirectoryEntry, DirectoryHandle, FileHandle, FileSource, FolderPicker,
    PermissionState, SelectedFile,
};
