//! Tooling layer
//!
//! Command-line entry points over the library.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, OutputFormat};
