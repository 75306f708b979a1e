//! Project tree node types

use crate::types::NodeId;
use serde::{Deserialize, Serialize};

/// File node representation
///
/// `content` is always present; files whose bytes were skipped or unreadable
/// carry a sentinel string instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    pub id: NodeId,
    pub name: String,
    pub content: String,
}

/// Directory node representation
///
/// `children` keep first-encountered order; they are never re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryNode {
    pub id: NodeId,
    pub name: String,
    pub children: Vec<FileSystemNode>,
    pub expanded: bool,
}

/// Project tree node type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileSystemNode {
    File(FileNode),
    Directory(DirectoryNode),
}

/// Node variant, used together with the name as the key within one parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Directory,
}

impl FileNode {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            content: content.into(),
        }
    }
}

impl DirectoryNode {
    /// Create a collapsed, empty directory.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_children(name, Vec::new())
    }

    pub fn with_children(name: impl Into<String>, children: Vec<FileSystemNode>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            children,
            expanded: false,
        }
    }

    /// Find a child directory by name.
    pub fn child_dir(&self, name: &str) -> Option<&DirectoryNode> {
        self.children.iter().find_map(|child| match child {
            FileSystemNode::Directory(dir) if dir.name == name => Some(dir),
            _ => None,
        })
    }

    /// Find a child directory by name, mutably.
    pub fn child_dir_mut(&mut self, name: &str) -> Option<&mut DirectoryNode> {
        find_dir_mut(&mut self.children, name)
    }
}

impl FileSystemNode {
    pub fn file(name: impl Into<String>, content: impl Into<String>) -> Self {
        FileSystemNode::File(FileNode::new(name, content))
    }

    pub fn directory(name: impl Into<String>, children: Vec<FileSystemNode>) -> Self {
        FileSystemNode::Directory(DirectoryNode::with_children(name, children))
    }

    pub fn id(&self) -> NodeId {
        match self {
            FileSystemNode::File(file) => file.id,
            FileSystemNode::Directory(dir) => dir.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FileSystemNode::File(file) => &file.name,
            FileSystemNode::Directory(dir) => &dir.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            FileSystemNode::File(_) => NodeKind::File,
            FileSystemNode::Directory(_) => NodeKind::Directory,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, FileSystemNode::Directory(_))
    }

    /// Total number of nodes in this subtree, including self.
    pub fn count(&self) -> usize {
        match self {
            FileSystemNode::File(_) => 1,
            FileSystemNode::Directory(dir) => {
                1 + dir.children.iter().map(Self::count).sum::<usize>()
            }
        }
    }
}

/// Find a directory with the given name among `nodes`.
///
/// Names are keyed by variant: a file with the same name is not a match.
pub fn find_dir_mut<'a>(
    nodes: &'a mut [FileSystemNode],
    name: &str,
) -> Option<&'a mut DirectoryNode> {
    nodes.iter_mut().find_map(|node| match node {
        FileSystemNode::Directory(dir) if dir.name == name => Some(dir),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_lookup_is_keyed_by_variant() {
        let mut dir = DirectoryNode::with_children(
            "root",
            vec![
                FileSystemNode::file("src", "not a directory"),
                FileSystemNode::directory("src", vec![]),
            ],
        );
        let found = dir.child_dir_mut("src").unwrap();
        assert!(found.children.is_empty());
        assert!(dir.child_dir("missing").is_none());
    }

    #[test]
    fn test_count_includes_descendants() {
        let node = FileSystemNode::directory(
            "a",
            vec![
                FileSystemNode::file("b", ""),
                FileSystemNode::directory("c", vec![FileSystemNode::file("d", "")]),
            ],
        );
        assert_eq!(node.count(), 4);
    }

    #[test]
    fn test_serialized_shape_is_tagged() {
        let node = FileSystemNode::file("a.ts", "A");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["name"], "a.ts");
        assert_eq!(json["content"], "A");
    }
}
