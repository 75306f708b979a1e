//! Tree export: flattening and writing a tree back to disk.

use crate::error::ApiError;
use crate::tree::node::FileSystemNode;
use std::path::Path;
use tracing::debug;

/// Flatten nodes to `(relative path, content)` pairs, depth-first.
///
/// Empty directories produce no pair.
pub fn flatten(nodes: &[FileSystemNode]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    flatten_into(nodes, "", &mut out);
    out
}

fn flatten_into(nodes: &[FileSystemNode], prefix: &str, out: &mut Vec<(String, String)>) {
    for node in nodes {
        let path = if prefix.is_empty() {
            node.name().to_string()
        } else {
            format!("{}/{}", prefix, node.name())
        };
        match node {
            FileSystemNode::File(file) => out.push((path, file.content.clone())),
            FileSystemNode::Directory(dir) => flatten_into(&dir.children, &path, out),
        }
    }
}

fn safe_name(name: &str) -> Result<&str, ApiError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ApiError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("refusing to export entry named {:?}", name),
        )));
    }
    Ok(name)
}

/// Write nodes below `dest`, creating directories as needed.
///
/// Returns the number of files written.
pub fn write_to_dir(nodes: &[FileSystemNode], dest: &Path) -> Result<usize, ApiError> {
    std::fs::create_dir_all(dest)?;
    let mut written = 0;
    for node in nodes {
        let path = dest.join(safe_name(node.name())?);
        match node {
            FileSystemNode::File(file) => {
                std::fs::write(&path, &file.content)?;
                written += 1;
            }
            FileSystemNode::Directory(dir) => {
                written += write_to_dir(&dir.children, &path)?;
            }
        }
    }
    debug!(dest = %dest.display(), written, "Exported tree level");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<FileSystemNode> {
        vec![
            FileSystemNode::directory(
                "src",
                vec![
                    FileSystemNode::file("a.ts", "A"),
                    FileSystemNode::directory("empty", vec![]),
                ],
            ),
            FileSystemNode::file("README.md", "R"),
        ]
    }

    #[test]
    fn test_flatten_is_depth_first() {
        assert_eq!(
            flatten(&sample()),
            vec![
                ("src/a.ts".to_string(), "A".to_string()),
                ("README.md".to_string(), "R".to_string()),
            ]
        );
    }

    #[test]
    fn test_write_to_dir_materialises_tree() {
        let temp = tempfile::tempdir().unwrap();
        let written = write_to_dir(&sample(), temp.path()).unwrap();
        assert_eq!(written, 2);
        assert_eq!(
            std::fs::read_to_string(temp.path().join("src/a.ts")).unwrap(),
            "A"
        );
        assert!(temp.path().join("src/empty").is_dir());
    }

    #[test]
    fn test_write_to_dir_rejects_traversal() {
        let temp = tempfile::tempdir().unwrap();
        let nodes = vec![FileSystemNode::file("..", "escape")];
        assert!(write_to_dir(&nodes, &temp.path().join("out")).is_err());
    }
}
