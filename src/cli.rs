//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect and edit a plugin's YAML configuration file.
#[derive(Parser, Debug)]
#[command(name = "plugin-config", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file, relative to the data directory if one is given.
    #[arg(short, long, default_value = "config.yml", env = "PLUGIN_CONFIG_FILE", global = true)]
    pub file: PathBuf,

    /// The plugin's data directory.
    #[arg(long, env = "PLUGIN_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory holding the bundled default resources.
    #[arg(long, env = "PLUGIN_RESOURCES_DIR", global = true)]
    pub resources: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Returns the log level based on verbosity flags.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Returns the path of the live configuration file.
    pub fn config_path(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.join(&self.file),
            None => self.file.clone(),
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the configuration.
    Show {
        /// Print as JSON instead of YAML.
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Print the value at a dotted path.
    Get {
        /// Dotted path, e.g. `server.slots`.
        path: String,
    },

    /// Set the value at a dotted path and save.
    Set {
        /// Dotted path, e.g. `server.slots`.
        path: String,
        /// Value, parsed as YAML (`20`, `true`, `[a, b]`, `hello`).
        value: String,
    },

    /// Remove the value at a dotted path and save.
    Unset {
        /// Dotted path, e.g. `server.slots`.
        path: String,
    },

    /// Remove every value and save.
    Clear,

    /// Report whether the configuration file exists.
    Exists,

    /// Copy the bundled default into the data directory.
    Init {
        /// Overwrite an existing file.
        #[arg(long, default_value = "false")]
        replace: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_joins_data_dir() {
        let cli = Cli::parse_from([
            "plugin-config",
            "--data-dir",
            "plugins/Lobby",
            "--file",
            "settings.yml",
            "exists",
        ]);
        assert_eq!(cli.config_path(), PathBuf::from("plugins/Lobby/settings.yml"));
    }

    #[test]
    fn test_config_path_without_data_dir() {
        let cli = Cli::parse_from(["plugin-config", "get", "motd", "-f", "other.yml"]);
        assert_eq!(cli.config_path(), PathBuf::from("other.yml"));
        assert!(matches!(cli.command, Commands::Get { path } if path == "motd"));
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = Cli::parse_from(["plugin-config", "-vv", "clear"]);
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
