//! Depth-first reading of a recursive directory handle.

use crate::error::EntryError;
use crate::ingest::content::ContentLoader;
use crate::ingest::exclusion::ExclusionSet;
use crate::source::{DirectoryEntry, DirectoryHandle};
use crate::tree::node::{DirectoryNode, FileNode, FileSystemNode};
use futures::future::BoxFuture;
use tracing::{debug, warn};

/// Walks a directory handle into tree nodes.
///
/// A failure on one entry skips that entry only. Only a failure to
/// enumerate the handle passed to [`HandleTreeReader::read`] is returned.
#[derive(Debug, Clone, Default)]
pub struct HandleTreeReader {
    loader: ContentLoader,
    exclusions: ExclusionSet,
}

impl HandleTreeReader {
    pub fn new(loader: ContentLoader, exclusions: ExclusionSet) -> Self {
        Self { loader, exclusions }
    }

    pub async fn read(&self, dir: &dyn DirectoryHandle) -> Result<Vec<FileSystemNode>, EntryError> {
        self.read_dir(dir).await
    }

    fn read_dir<'a>(
        &'a self,
        dir: &'a dyn DirectoryHandle,
    ) -> BoxFuture<'a, Result<Vec<FileSystemNode>, EntryError>> {
        Box::pin(async move {
            let entries = dir.entries().await?;
            let mut children = Vec::with_capacity(entries.len());
            for entry in entries {
                let name = entry.name().to_string();
                match self.read_entry(entry).await {
                    Ok(Some(node)) => children.push(node),
                    Ok(None) => debug!(directory = %name, "Skipping excluded directory"),
                    Err(e) => warn!(entry = %name, error = %e, "Skipping entry"),
                }
            }
            Ok(children)
        })
    }

    async fn read_entry(
        &self,
        entry: DirectoryEntry,
    ) -> Result<Option<FileSystemNode>, EntryError> {
        match entry {
            DirectoryEntry::File(handle) => {
                let file = handle.get_file().await?;
                let content = self.loader.load(file.as_ref()).await;
                Ok(Some(FileSystemNode::File(FileNode::new(handle.name(), content))))
            }
            DirectoryEntry::Directory(handle) => {
                if self.exclusions.excludes_name(handle.name()) {
                    return Ok(None);
                }
                let children = self.read_dir(handle.as_ref()).await?;
                Ok(Some(FileSystemNode::Directory(DirectoryNode::with_children(
                    handle.name(),
                    children,
                ))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::memory::{MemoryDirectory, MemoryFile};

    fn names(nodes: &[FileSystemNode]) -> Vec<&str> {
        nodes.iter().map(FileSystemNode::name).collect()
    }

    #[tokio::test]
    async fn test_reads_nested_directories_collapsed() {
        let root = MemoryDirectory::new("project")
            .dir(MemoryDirectory::new("src").file("main.ts", "M"))
            .file("package.json", "{}");
        let nodes = HandleTreeReader::default().read(&root).await.unwrap();
        assert_eq!(names(&nodes), vec!["src", "package.json"]);
        let FileSystemNode::Directory(src) = &nodes[0] else {
            panic!("expected src directory");
        };
        assert!(!src.expanded);
        assert_eq!(names(&src.children), vec!["main.ts"]);
    }

    #[tokio::test]
    async fn test_excluded_directories_are_not_read() {
        let root = MemoryDirectory::new("project")
            .dir(
                MemoryDirectory::new("node_modules")
                    .dir(MemoryDirectory::new("react").file("index.js", "")),
            )
            .dir(MemoryDirectory::new(".git").failing_enumeration())
            .dir(MemoryDirectory::new("lib").dir(MemoryDirectory::new(".next").file("build", "")))
            .file("index.ts", "I");
        let nodes = HandleTreeReader::default().read(&root).await.unwrap();
        assert_eq!(names(&nodes), vec!["lib", "index.ts"]);
        let FileSystemNode::Directory(lib) = &nodes[0] else {
            panic!("expected lib directory");
        };
        assert!(lib.children.is_empty());
    }

    #[tokio::test]
    async fn test_custom_exclusions() {
        let root = MemoryDirectory::new("crate")
            .dir(MemoryDirectory::new("target").file("out", ""))
            .dir(MemoryDirectory::new("node_modules").file("x", ""));
        let reader = HandleTreeReader::new(ContentLoader::default(), ExclusionSet::new(["target"]));
        let nodes = reader.read(&root).await.unwrap();
        assert_eq!(names(&nodes), vec!["node_modules"]);
    }

    #[tokio::test]
    async fn test_failing_entries_are_isolated() {
        let root = MemoryDirectory::new("project")
            .file("a.ts", "A")
            .with_file(MemoryFile::new("locked.ts", "L").failing_open())
            .dir(MemoryDirectory::new("broken").failing_enumeration())
            .file("b.ts", "B");
        let nodes = HandleTreeReader::default().read(&root).await.unwrap();
        assert_eq!(names(&nodes), vec!["a.ts", "b.ts"]);
    }

    #[tokio::test]
    async fn test_unreadable_content_keeps_the_node() {
        let root = MemoryDirectory::new("project")
            .with_file(MemoryFile::new("blob.bin", "x").failing_read())
            .with_file(MemoryFile::new("huge.log", "x").with_reported_size(5 * 1024 * 1024));
        let nodes = HandleTreeReader::default().read(&root).await.unwrap();
        let contents: Vec<&str> = nodes
            .iter()
            .map(|n| match n {
                FileSystemNode::File(f) => f.content.as_str(),
                FileSystemNode::Directory(_) => "",
            })
            .collect();
        assert_eq!(contents, vec!["[Error reading file]", "[File too large: 5.00MB]"]);
    }

    #[tokio::test]
    async fn test_root_enumeration_failure_is_returned() {
        let root = MemoryDirectory::new("project").failing_enumeration();
        assert!(HandleTreeReader::default().read(&root).await.is_err());
    }
}
