//! Config command - manage configuration.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use propex_core::models::config::PropexConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration as JSON
    Show,

    /// Write a configuration file with default values
    Init(InitArgs),

    /// Print one value by dotted key
    Get {
        /// Configuration key (e.g., "batch.jobs")
        key: String,
    },

    /// Change one value by dotted key
    Set {
        /// Dotted key, e.g. "extraction.reference_year"
        key: String,
        /// New value, as JSON or a bare string
        value: String,
    },

    /// Print the configuration file location
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Write here instead of the configured path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replace an existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => {
            if !path.exists() {
                eprintln!("{} No config file at {}, showing defaults.", style("ℹ").blue(), path.display());
            }
            println!("{}", serde_json::to_string_pretty(&read_or_default(&path)?)?);
        }
        ConfigCommand::Init(init) => {
            let target = init.output.unwrap_or(path);
            if target.exists() && !init.force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    target.display()
                );
            }
            PropexConfig::default().save(&target)?;
            println!("{} Created configuration file at {}", style("✓").green(), target.display());
        }
        ConfigCommand::Get { key } => {
            let value = read_or_default(&path)?.get(&key)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ConfigCommand::Set { key, value } => {
            let mut config = read_or_default(&path)?;
            let stored = config.set(&key, &value)?;
            config.save(&path)?;
            println!("{} Set {} = {}", style("✓").green(), key, stored);
        }
        ConfigCommand::Path => {
            let status = if path.exists() {
                style("exists").green()
            } else {
                style("not created (run 'propex config init')").yellow()
            };
            println!("{} [{}]", path.display(), status);
        }
    }

    Ok(())
}

/// `<config_dir>/propex/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("propex")
        .join("config.json")
}

fn read_or_default(path: &Path) -> anyhow::Result<PropexConfig> {
    if path.exists() {
        Ok(PropexConfig::from_file(path)?)
    } else {
        Ok(PropexConfig::default())
    }
}
