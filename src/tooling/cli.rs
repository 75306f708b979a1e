//! CLI Tooling
//!
//! Command-line surface over the ingestion engine. Each command ingests a
//! local folder into a fresh tree and then renders, summarizes, exports, or
//! documents it.

use crate::config::GraftConfig;
use crate::error::ApiError;
use crate::ingest::{DirectoryIngestor, IngestOutcome};
use crate::notify::TracingNotifier;
use crate::provider::{GeminiClient, ReadmeService};
use crate::source::local::{LocalPicker, PickerMode};
use crate::summary;
use crate::tree::export;
use crate::tree::mount::{FileTree, SharedTree, TreeConsumer};
use crate::tree::node::FileSystemNode;
use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Graft - import folders into an in-memory project tree
#[derive(Parser, Debug)]
#[command(name = "graft")]
#[command(about = "Import folders into an in-memory project tree")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Ask before granting read access to the folder
    #[arg(long, global = true)]
    pub confirm: bool,
}

/// Rendering for `ingest`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a folder and print the resulting tree
    Ingest {
        /// Folder to import
        dir: PathBuf,
        /// Directory path inside the tree to mount at ("" is the root)
        #[arg(long, default_value = "")]
        mount: String,
        /// Read through a flat file list instead of a directory handle
        #[arg(long)]
        flat: bool,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the project summary used for README prompts
    Summary {
        dir: PathBuf,
        #[arg(long)]
        flat: bool,
    },
    /// Generate a README for a folder
    Readme {
        dir: PathBuf,
        /// Write the README here instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Ingest a folder and write the tree to DEST
    Export { dir: PathBuf, dest: PathBuf },
}

/// CLI execution context
pub struct CliContext {
    config: GraftConfig,
    confirm: bool,
    color: bool,
}

impl CliContext {
    pub fn new(config: GraftConfig, confirm: bool) -> Self {
        use std::io::IsTerminal;
        Self {
            config,
            confirm,
            color: std::io::stdout().is_terminal(),
        }
    }

    /// Disable ANSI styling in rendered output.
    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn config(&self) -> &GraftConfig {
        &self.config
    }

    /// Execute a CLI command and return the text to print.
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Ingest {
                dir,
                mount,
                flat,
                format,
            } => {
                let Some(tree) = self.load_tree(dir, mount, *flat).await? else {
                    return Ok("Selection cancelled.".to_string());
                };
                let nodes = tree.snapshot();
                match format {
                    OutputFormat::Json => serde_json::to_string_pretty(&nodes).map_err(|e| {
                        ApiError::ConfigError(format!("Failed to serialize tree: {}", e))
                    }),
                    OutputFormat::Text => {
                        let mut out = String::new();
                        render_tree(&nodes, 0, self.color, &mut out);
                        let total = tree.read(FileTree::node_count);
                        out.push_str(&format!("\nTotal: {} node(s)", total));
                        Ok(out)
                    }
                }
            }
            Commands::Summary { dir, flat } => {
                let Some(tree) = self.load_tree(dir, "", *flat).await? else {
                    return Ok("Selection cancelled.".to_string());
                };
                Ok(summary::project(&tree.snapshot(), &self.config.summary))
            }
            Commands::Readme { dir, output } => {
                let client = GeminiClient::from_settings(&self.config.generation)?;
                let Some(tree) = self.load_tree(dir, "", false).await? else {
                    return Ok("Selection cancelled.".to_string());
                };
                let service = ReadmeService::new(
                    Box::new(client),
                    self.config.generation.options,
                    self.config.summary.clone(),
                );
                let text = service.generate_readme(&tree, &TracingNotifier).await?;
                match output {
                    Some(path) => {
                        tokio::fs::write(path, &text).await?;
                        Ok(format!("README written to {}", path.display()))
                    }
                    None => Ok(text),
                }
            }
            Commands::Export { dir, dest } => {
                let Some(tree) = self.load_tree(dir, "", false).await? else {
                    return Ok("Selection cancelled.".to_string());
                };
                let written = export::write_to_dir(&tree.snapshot(), dest)?;
                Ok(format!("Exported {} file(s) to {}", written, dest.display()))
            }
        }
    }

    /// Ingest `dir` at `mount` in a fresh tree; `None` when cancelled.
    async fn load_tree(
        &self,
        dir: &Path,
        mount: &str,
        flat: bool,
    ) -> Result<Option<SharedTree>, ApiError> {
        let root = dunce::canonicalize(dir)?;
        let mode = if flat {
            PickerMode::FileList
        } else {
            PickerMode::DirectoryHandle
        };
        let picker = LocalPicker::new(root, mode)
            .confirming(self.confirm)
            .excluding(self.config.ingest.exclusions());
        let tree = SharedTree::new(seed_mount(mount)?);
        let ingestor = DirectoryIngestor::new(
            Box::new(picker),
            Box::new(tree.clone()),
            Box::new(TracingNotifier),
            &self.config.ingest,
        );
        match ingestor.ingest_directory(mount).await? {
            IngestOutcome::Merged { node_count, .. } => {
                info!(node_count, dir = %dir.display(), "Folder ingested");
                Ok(Some(tree))
            }
            IngestOutcome::Cancelled => Ok(None),
        }
    }
}

/// Fresh tree holding the empty directory chain named by `mount`.
fn seed_mount(mount: &str) -> Result<FileTree, ApiError> {
    let chain = mount
        .split('/')
        .filter(|s| !s.is_empty())
        .rev()
        .fold(Vec::new(), |children, name| {
            vec![FileSystemNode::directory(name, children)]
        });
    let mut tree = FileTree::new();
    tree.update_directory("", chain)?;
    Ok(tree)
}

/// Indented listing; directories get a trailing slash.
fn render_tree(nodes: &[FileSystemNode], depth: usize, color: bool, out: &mut String) {
    for node in nodes {
        out.push_str(&"  ".repeat(depth));
        match node {
            FileSystemNode::Directory(dir) => {
                let label = format!("{}/", dir.name);
                if color {
                    out.push_str(&label.bold().blue().to_string());
                } else {
                    out.push_str(&label);
                }
                out.push('\n');
                render_tree(&dir.children, depth + 1, color, out);
            }
            FileSystemNode::File(file) => {
                out.push_str(&file.name);
                let size = format!(" ({} bytes)", file.content.len());
                if color {
                    out.push_str(&size.dimmed().to_string());
                } else {
                    out.push_str(&size);
                }
                out.push('\n');
            }
        }
    }
}
