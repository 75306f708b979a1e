//! Mounted project tree and the tree-consumer boundary.

use crate::error::ApiError;
use crate::tree::node::{DirectoryNode, FileSystemNode};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Receives merged subtrees and exposes the current tree.
pub trait TreeConsumer: Send + Sync {
    /// Replace the children of the directory at `target_path` with `nodes`.
    ///
    /// An empty path targets the root.
    fn update_directory(
        &self,
        target_path: &str,
        nodes: Vec<FileSystemNode>,
    ) -> Result<(), ApiError>;

    /// Set the content of the root file `name` in one step.
    ///
    /// An existing root file keeps its position; otherwise the file is
    /// appended.
    fn upsert_root_file(&self, name: &str, content: String);

    /// Copy of the root's children.
    fn snapshot(&self) -> Vec<FileSystemNode>;
}

/// Project tree rooted at one implicit, unnamed directory.
#[derive(Debug, Clone, PartialEq)]
pub struct FileTree {
    root: DirectoryNode,
}

impl FileTree {
    pub fn new() -> Self {
        let mut root = DirectoryNode::new("");
        root.expanded = true;
        Self { root }
    }

    pub fn root(&self) -> &DirectoryNode {
        &self.root
    }

    pub fn children(&self) -> &[FileSystemNode] {
        &self.root.children
    }

    /// Resolve a `/`-separated directory path below the root.
    pub fn directory(&self, path: &str) -> Option<&DirectoryNode> {
        segments(path).try_fold(&self.root, |dir, name| dir.child_dir(name))
    }

    fn directory_mut(&mut self, path: &str) -> Option<&mut DirectoryNode> {
        segments(path).try_fold(&mut self.root, |dir, name| dir.child_dir_mut(name))
    }

    /// Replace the children at `target_path`; unrelated siblings are untouched.
    pub fn update_directory(
        &mut self,
        target_path: &str,
        nodes: Vec<FileSystemNode>,
    ) -> Result<(), ApiError> {
        let dir = self
            .directory_mut(target_path)
            .ok_or_else(|| ApiError::MountPathNotFound(target_path.to_string()))?;
        debug!(target = target_path, nodes = nodes.len(), "Merging nodes into tree");
        dir.children = nodes;
        Ok(())
    }

    /// Replace the root file `name` in place, or append it.
    pub fn upsert_root_file(&mut self, name: &str, content: String) {
        let node = FileSystemNode::file(name, content);
        let children = &mut self.root.children;
        match children
            .iter()
            .position(|n| !n.is_directory() && n.name() == name)
        {
            Some(index) => children[index] = node,
            None => children.push(node),
        }
    }

    /// Number of nodes below the root.
    pub fn node_count(&self) -> usize {
        self.root.children.iter().map(FileSystemNode::count).sum()
    }
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Shared, lockable tree handle owned by the application.
#[derive(Debug, Clone, Default)]
pub struct SharedTree {
    inner: Arc<RwLock<FileTree>>,
}

impl SharedTree {
    pub fn new(tree: FileTree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Run `f` with read access to the tree.
    pub fn read<R>(&self, f: impl FnOnce(&FileTree) -> R) -> R {
        f(&self.inner.read())
    }
}

impl TreeConsumer for SharedTree {
    fn update_directory(
        &self,
        target_path: &str,
        nodes: Vec<FileSystemNode>,
    ) -> Result<(), ApiError> {
        self.inner.write().update_directory(target_path, nodes)
    }

    fn upsert_root_file(&self, name: &str, content: String) {
        self.inner.write().upsert_root_file(name, content)
    }

    fn snapshot(&self) -> Vec<FileSystemNode> {
        self.inner.read().children().to_vec()
    }
}
