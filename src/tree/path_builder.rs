//! Tree reconstruction from flat relative paths.
//!
//! Files are grouped by their directory prefix in first-encountered order.
//! Each prefix then walks its segments, creating missing directories, and
//! its file batch is attached once to the directory it names.

use crate::tree::node::{find_dir_mut, DirectoryNode, FileNode, FileSystemNode};
use std::collections::HashMap;

/// Builds a node tree from `(relative path, content)` pairs.
///
/// Exclusion filtering is the caller's job; every entry given is placed.
pub struct PathTreeBuilder {
    groups: Vec<(String, Vec<FileNode>)>,
    index: HashMap<String, usize>,
}

impl PathTreeBuilder {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build the top-level node sequence for `entries` in one call.
    pub fn build<I, P, C>(entries: I) -> Vec<FileSystemNode>
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: Into<String>,
    {
        let mut builder = Self::new();
        for (path, content) in entries {
            builder.add(path.as_ref(), content);
        }
        builder.finish()
    }

    /// Add one file. A repeated path keeps its first position and takes
    /// the latest content.
    pub fn add(&mut self, relative_path: &str, content: impl Into<String>) {
        let (dir, name) = relative_path.rsplit_once('/').unwrap_or(("", relative_path));
        let slot = match self.index.get(dir) {
            Some(&slot) => slot,
            None => {
                self.groups.push((dir.to_string(), Vec::new()));
                self.index.insert(dir.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };

        let files = &mut self.groups[slot].1;
        let content = content.into();
        match files.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.content = content,
            None => files.push(FileNode::new(name, content)),
        }
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, files)| files.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Assemble the tree.
    pub fn finish(self) -> Vec<FileSystemNode> {
        let mut items = Vec::new();
        for (dir, files) in self.groups {
            let files: Vec<FileSystemNode> = files.into_iter().map(FileSystemNode::File).collect();
            if dir.is_empty() {
                items.extend(files);
                continue;
            }
            let segments: Vec<&str> = dir.split('/').collect();
            attach(&mut items, &segments, files);
        }
        items
    }
}

impl Default for PathTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn attach(nodes: &mut Vec<FileSystemNode>, segments: &[&str], files: Vec<FileSystemNode>) {
    let Some((name, rest)) = segments.split_first() else {
        return;
    };
    if find_dir_mut(nodes, name).is_none() {
        nodes.push(FileSystemNode::Directory(DirectoryNode::new(*name)));
    }
    if let Some(dir) = find_dir_mut(nodes, name) {
        if rest.is_empty() {
            // The batch replaces the directory's files; subdirectories
            // created by deeper prefixes stay.
            dir.children.retain(FileSystemNode::is_directory);
            dir.children.extend(files);
        } else {
            attach(&mut dir.children, rest, files);
        }
    }
}
