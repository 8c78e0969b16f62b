//! Subcommands.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::Path;

use tracing::debug;

use propex_core::models::config::PropexConfig;

/// Load the configuration named on the command line, else the user's
/// config file when one exists, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PropexConfig> {
    if let Some(path) = config_path {
        return Ok(PropexConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(PropexConfig::from_file(&default_path)?)
    } else {
        Ok(PropexConfig::default())
    }
}
