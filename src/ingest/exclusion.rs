//! Exclusion set: names that are always skipped during ingestion.

use serde::{Deserialize, Serialize};

/// Names skipped by default, matching common tool and VCS directories.
pub const DEFAULT_EXCLUDED_NAMES: [&str; 5] =
    ["node_modules", ".git", ".vscode", ".next", ".DS_Store"];

/// Set of excluded entry names.
///
/// Entry names match exactly. Relative paths from a flat file list match
/// by containment, so `.git` also excludes `repo/.gitignore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionSet {
    names: Vec<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// An exclusion set that skips nothing.
    pub fn empty() -> Self {
        Self { names: Vec::new() }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether a single entry name is excluded.
    pub fn excludes_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Whether a relative path contains any excluded name.
    pub fn excludes_path(&self, path: &str) -> bool {
        self.names.iter().any(|n| path.contains(n.as_str()))
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_NAMES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let set = ExclusionSet::default();
        assert!(set.excludes_name("node_modules"));
        assert!(set.excludes_name(".DS_Store"));
        assert!(!set.excludes_name("src"));
    }

    #[test]
    fn test_path_matching_is_by_containment() {
        let set = ExclusionSet::default();
        assert!(set.excludes_path("app/node_modules/react/index.js"));
        assert!(set.excludes_path("app/.git/HEAD"));
        assert!(set.excludes_path("app/.DS_Store"));
        assert!(set.excludes_path("project/.gitignore"));
        assert!(set.excludes_path("project/.github/workflows/ci.yml"));
        assert!(set.excludes_path("project/.nextrc"));
        assert!(set.excludes_path("app/src/node_modules_notes.md"));
        assert!(!set.excludes_path("app/src/git.ts"));
    }

    #[test]
    fn test_name_matching_stays_exact() {
        let set = ExclusionSet::default();
        assert!(set.excludes_name(".git"));
        assert!(!set.excludes_name(".github"));
        assert!(!set.excludes_name(".gitignore"));
    }

    #[test]
    fn test_custom_and_empty_sets() {
        let set = ExclusionSet::new(["target"]);
        assert!(set.excludes_path("crate/target/debug/out"));
        assert!(!set.excludes_path("crate/.git/HEAD"));
        assert!(!ExclusionSet::empty().excludes_path("a/.git/b"));
    }
}
