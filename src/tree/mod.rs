//! Project tree: node types, path reconstruction, mounting, and export.

pub mod export;
pub mod mount;
pub mod node;
pub mod path_builder;

pub use mount::{FileTree, SharedTree, TreeConsumer};
pub use node::{DirectoryNode, FileNode, FileSystemNode, NodeKind};
pub use path_builder::PathTreeBuilder;
