//! Plugin Config - YAML configuration files for game-server plugins.
//!
//! [`ConfigFile`] loads and saves a YAML mapping, materializes a bundled
//! default through a [`ResourceProvider`], and can run any of those
//! operations inline or on the tokio blocking pool.

pub mod cli;
pub mod config;
pub mod error;
pub mod resource;

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_yaml::Value;
use tracing::info;

use crate::cli::{Cli, Commands};
pub use crate::config::{
    ConfigFile, ConfigTask, DefaultOutcome, Execution, LoadOutcome, SaveDefaultOptions,
};
pub use crate::error::ConfigError;
use crate::resource::DirectoryResources;
pub use crate::resource::{ResourceOutcome, ResourceProvider};

/// Runs the CLI with the provided arguments.
pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(cli.log_level())?;
    execute(&cli).await
}

/// Dispatches a parsed command. Logging must already be set up.
pub async fn execute(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Show { json } => show_config(cli, *json).await,
        Commands::Get { path } => get_value(cli, path).await,
        Commands::Set { path, value } => set_value(cli, path, value).await,
        Commands::Unset { path } => unset_value(cli, path).await,
        Commands::Clear => clear_config(cli).await,
        Commands::Exists => exists(cli),
        Commands::Init { replace } => init_default(cli, *replace).await,
    }
}

/// Initializes the tracing subscriber for structured logging.
fn setup_logging(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .json()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}

/// Opens the configuration file named on the command line and loads it.
async fn open_config(cli: &Cli) -> Result<ConfigFile> {
    let config = ConfigFile::new(cli.config_path());

    let outcome = config
        .load_in(Execution::Background)
        .await
        .with_context(|| format!("Failed to load {}", config.file().display()))?;

    if outcome == LoadOutcome::Missing {
        info!(path = %config.file().display(), "Config file does not exist yet");
    }

    Ok(config)
}

/// Saves the configuration in the background.
async fn persist(config: &ConfigFile) -> Result<()> {
    config
        .save_in(Execution::Background)
        .await
        .with_context(|| format!("Failed to save {}", config.file().display()))
}

/// Prints the whole configuration.
async fn show_config(cli: &Cli, json: bool) -> Result<()> {
    let config = open_config(cli).await?;
    let snapshot = config.snapshot();

    let rendered = if json {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_yaml::to_string(&snapshot)?
    };
    println!("{}", rendered.trim_end());

    Ok(())
}

/// Prints the value at a dotted path.
async fn get_value(cli: &Cli, path: &str) -> Result<()> {
    let config = open_config(cli).await?;

    match config.get(path) {
        Some(value) => {
            println!("{}", render_value(&value)?);
            Ok(())
        }
        None => anyhow::bail!("No value at '{}'", path),
    }
}

/// Sets the value at a dotted path and saves.
async fn set_value(cli: &Cli, path: &str, raw: &str) -> Result<()> {
    let config = open_config(cli).await?;

    config.set(path, parse_value(raw))?;
    persist(&config).await?;

    info!(path, "Value updated");
    Ok(())
}

/// Removes the value at a dotted path and saves.
async fn unset_value(cli: &Cli, path: &str) -> Result<()> {
    let config = open_config(cli).await?;

    if config.remove(path).is_none() {
        anyhow::bail!("No value at '{}'", path);
    }
    persist(&config).await
}

/// Removes every value and saves.
async fn clear_config(cli: &Cli) -> Result<()> {
    let config = open_config(cli).await?;
    config.clear_config();
    persist(&config).await
}

/// Reports whether the configuration file exists.
fn exists(cli: &Cli) -> Result<()> {
    let config = ConfigFile::new(cli.config_path());
    println!("{}", config.exist());
    Ok(())
}

/// Copies the bundled default into the data directory.
async fn init_default(cli: &Cli, replace: bool) -> Result<()> {
    let data_dir = cli
        .data_dir
        .clone()
        .context("init requires --data-dir")?;
    let resources = cli
        .resources
        .clone()
        .context("init requires --resources")?;

    let owner = Arc::new(DirectoryResources::new(resources, data_dir));
    let config = ConfigFile::with_owner(owner, &cli.file);

    let outcome = config
        .save_default_in(SaveDefaultOptions::default().replace(replace), Execution::Background)
        .await
        .with_context(|| format!("Failed to save default {}", config.resource()))?;

    match outcome {
        DefaultOutcome::Written => println!("Wrote {}", config.file().display()),
        DefaultOutcome::AlreadyExists => println!("{} already exists", config.file().display()),
        DefaultOutcome::NoOwner => {}
    }

    Ok(())
}

/// Parses a command-line value as YAML, falling back to a plain string.
fn parse_value(raw: &str) -> Value {
    serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Renders a value for printing: strings bare, everything else as YAML.
fn render_value(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Ok(serde_yaml::to_string(other)?.trim_end().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_types() {
        assert_eq!(parse_value("20"), Value::from(20));
        assert_eq!(parse_value("true"), Value::Bool(true));
        assert_eq!(parse_value("hello world"), Value::from("hello world"));
        assert!(parse_value("[a, b]").is_sequence());
        assert_eq!(parse_value("key: [unclosed"), Value::from("key: [unclosed"));
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&Value::from("lobby")).unwrap(), "lobby");
        assert_eq!(render_value(&Value::from(20)).unwrap(), "20");
        assert_eq!(render_value(&parse_value("[a, b]")).unwrap(), "- a\n- b");
    }
}
