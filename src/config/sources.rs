//! Configuration sources: defaults, files, and the environment.

use crate::config::{paths, GraftConfig};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use std::path::Path;
use tracing::debug;

pub const ENV_PREFIX: &str = "GRAFT";
pub const LOCAL_FILE: &str = "graft.toml";

pub type Builder = ConfigBuilder<DefaultState>;

/// Start a builder seeded with `GraftConfig::default()`.
pub fn builder_with_defaults() -> Result<Builder, ConfigError> {
    let defaults = Config::try_from(&GraftConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}

/// Global config file, skipped when absent.
pub fn add_global_file(builder: Builder) -> Result<Builder, ConfigError> {
    match paths::global_config_file() {
        Ok(path) => {
            debug!(path = %path.display(), "Global config file");
            Ok(builder.add_source(File::from(path).required(false)))
        }
        Err(_) => Ok(builder),
    }
}

/// `graft.toml` in the working directory, skipped when absent.
pub fn add_local_file(builder: Builder) -> Result<Builder, ConfigError> {
    Ok(builder.add_source(File::from(Path::new(LOCAL_FILE)).required(false)))
}

/// Explicit config file; it must exist.
pub fn add_file(builder: Builder, path: &Path) -> Result<Builder, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    Ok(builder.add_source(File::from(path).required(true)))
}

/// `GRAFT_*` overlay; `__` separates nested keys.
pub fn add_environment(builder: Builder) -> Result<Builder, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("ingest.excluded_names")
            .with_list_parse_key("summary.excerpt_extensions")
            .try_parsing(true),
    ))
}
