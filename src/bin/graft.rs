//! Graft CLI binary

use anyhow::Context;
use clap::Parser;
use graft::config::ConfigLoader;
use graft::logging::init_logging;
use graft::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config =
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    init_logging(Some(&config.logging)).context("Failed to initialize logging")?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to create runtime")?;
    let context = CliContext::new(config, cli.confirm);
    let output = runtime.block_on(context.execute(&cli.command))?;
    println!("{}", output);
    Ok(())
}
