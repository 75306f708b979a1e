//! Source composition and deserialization into `GraftConfig`.

use crate::config::sources;
use crate::config::GraftConfig;
use config::ConfigError;
use std::path::Path;

/// Composes configuration sources in precedence order.
pub struct MergeService;

impl MergeService {
    /// Defaults, global file, `./graft.toml`, then the environment.
    pub fn load() -> Result<GraftConfig, ConfigError> {
        let builder = sources::builder_with_defaults()?;
        let builder = sources::add_global_file(builder)?;
        let builder = sources::add_local_file(builder)?;
        let builder = sources::add_environment(builder)?;
        builder.build()?.try_deserialize()
    }

    /// Defaults, then `path`, then the environment.
    pub fn load_from_file(path: &Path) -> Result<GraftConfig, ConfigError> {
        let builder = sources::builder_with_defaults()?;
        let builder = sources::add_file(builder, path)?;
        let builder = sources::add_environment(builder)?;
        builder.build()?.try_deserialize()
    }
}
