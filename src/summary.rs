//! Project summary projection.
//!
//! Renders a tree as an indented listing with short source excerpts, the
//! payload used to prompt README generation.

use crate::tree::node::FileSystemNode;
use serde::{Deserialize, Serialize};

/// Summary rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Fixed text emitted before the listing
    #[serde(default = "default_header")]
    pub header: String,

    /// Number of leading lines excerpted from each source file
    #[serde(default = "default_max_excerpt_lines")]
    pub max_excerpt_lines: usize,

    /// File extensions (case-insensitive, without the dot) that get excerpts
    #[serde(default = "default_excerpt_extensions")]
    pub excerpt_extensions: Vec<String>,
}

fn default_header() -> String {
    "Project Structure:\n\n".to_string()
}

fn default_max_excerpt_lines() -> usize {
    15
}

fn default_excerpt_extensions() -> Vec<String> {
    ["js", "ts", "jsx", "tsx", "json"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            header: default_header(),
            max_excerpt_lines: default_max_excerpt_lines(),
            excerpt_extensions: default_excerpt_extensions(),
        }
    }
}

impl SummaryConfig {
    fn wants_excerpt(&self, name: &str) -> bool {
        match name.rsplit_once('.') {
            Some((_, ext)) => self
                .excerpt_extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

/// Render `nodes` as an indented listing, one line per node.
pub fn project(nodes: &[FileSystemNode], config: &SummaryConfig) -> String {
    let mut summary = config.header.clone();
    traverse(nodes, 0, config, &mut summary);
    summary
}

fn traverse(nodes: &[FileSystemNode], depth: usize, config: &SummaryConfig, out: &mut String) {
    for node in nodes {
        out.push_str(&"  ".repeat(depth));
        out.push_str("- ");
        out.push_str(node.name());
        out.push('\n');

        match node {
            FileSystemNode::Directory(dir) => traverse(&dir.children, depth + 1, config, out),
            FileSystemNode::File(file) => {
                if file.content.is_empty() || !config.wants_excerpt(&file.name) {
                    continue;
                }
                let excerpt: Vec<&str> = file
                    .content
                    .split('\n')
                    .take(config.max_excerpt_lines)
                    .collect();
                out.push_str(&"  ".repeat(depth + 1));
                out.push_str("```\n");
                out.push_str(&excerpt.join("\n"));
                out.push_str("\n```\n\n");
            }
        }
    }
}

/// Build the README generation prompt for `nodes`.
pub fn readme_prompt(nodes: &[FileSystemNode], config: &SummaryConfig) -> String {
    format!(
        "Create a professional README.md for this codebase. Include:

1. Project Title (as H1 header)
2. Description (purpose and functionality)
3. Features (bullet points)
4. Installation (step-by-step)
5. Usage (with examples if applicable)
6. Configuration (environment variables, settings)
7. Contributing Guidelines
8. License (if detectable)

Format using Markdown with proper code blocks.

Here's the project structure and key file contents:
{}",
        project(nodes, config)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree_is_header_only() {
        assert_eq!(project(&[], &SummaryConfig::default()), "Project Structure:\n\n");
    }

    #[test]
    fn test_listing_and_excerpts() {
        let nodes = vec![
            FileSystemNode::directory(
                "src",
                vec![
                    FileSystemNode::file("main.ts", "line1\nline2"),
                    FileSystemNode::file("notes.md", "not excerpted"),
                ],
            ),
            FileSystemNode::file("package.json", ""),
        ];
        let summary = project(&nodes, &SummaryConfig::default());
        assert_eq!(
            summary,
            "Project Structure:\n\n\
             - src\n\
             \x20\x20- main.ts\n\
             \x20\x20\x20\x20```\nline1\nline2\n```\n\n\
             \x20\x20- notes.md\n\
             - package.json\n"
        );
    }

    #[test]
    fn test_excerpt_is_truncated() {
        let content: Vec<String> = (1..=40).map(|i| format!("l{i}")).collect();
        let nodes = vec![FileSystemNode::file("big.JS", content.join("\n"))];
        let summary = project(&nodes, &SummaryConfig::default());
        assert!(summary.contains("l15\n```"));
        assert!(!summary.contains("l16"));
    }

    #[test]
    fn test_configurable_excerpts() {
        let config = SummaryConfig {
            max_excerpt_lines: 1,
            excerpt_extensions: vec!["rs".to_string()],
            ..SummaryConfig::default()
        };
        let nodes = vec![
            FileSystemNode::file("lib.rs", "fn a() {}\nfn b() {}"),
            FileSystemNode::file("index.ts", "skipped"),
        ];
        let summary = project(&nodes, &config);
        assert!(summary.contains("fn a() {}\n```"));
        assert!(!summary.contains("fn b"));
        assert!(!summary.contains("skipped"));
    }

    #[test]
    fn test_readme_prompt_embeds_summary() {
        let nodes = vec![FileSystemNode::file("index.ts", "x")];
        let prompt = readme_prompt(&nodes, &SummaryConfig::default());
        assert!(prompt.starts_with("Create a professional README.md"));
        assert!(prompt.ends_with("Project Structure:\n\n- index.ts\n  ```\nx\n```\n\n"));
    }
}
