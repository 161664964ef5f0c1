// Command-line arguments and runtime configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Catalog file used when neither --catalog nor the env var is given
pub const DEFAULT_CATALOG_PATH: &str = "trees.json";

#[derive(Debug, Parser)]
#[command(name = "carbon-garden", version, about = "Track a garden of trees and its CO2 capture")]
pub struct Args {
    /// Path of the tree catalog (JSON)
    #[arg(
        long,
        global = true,
        env = "CARBON_GARDEN_CATALOG",
        default_value = DEFAULT_CATALOG_PATH
    )]
    pub catalog: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Interactive terminal UI (default)
    Ui,

    /// Print every tree type in the catalog
    List,

    /// Add a tree type (or change its rate) and save the catalog
    Register {
        name: String,

        /// Absorption rate in kg CO2 per year
        rate: String,
    },

    /// Plant the named trees and print the garden statistics
    Tally {
        #[arg(required = true)]
        trees: Vec<String>,
    },

    /// Write the built-in catalog to the catalog path
    Init {
        /// Overwrite an existing catalog file
        #[arg(long)]
        force: bool,
    },
}

/// Runtime configuration, resolved from Args
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub catalog_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
        }
    }
}

impl Args {
    /// Split into configuration and the command to run
    pub fn into_config(self) -> (Config, Command) {
        let config = Config {
            catalog_path: self.catalog,
        };
        (config, self.command.unwrap_or(Command::Ui))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_ui() {
        let args = Args::try_parse_from(["carbon-garden", "--catalog", "/tmp/t.json"]).unwrap();
        let (config, command) = args.into_config();

        assert_eq!(command, Command::Ui);
        assert_eq!(config.catalog_path, PathBuf::from("/tmp/t.json"));
    }

    #[test]
    fn test_register_args() {
        let args = Args::try_parse_from(["carbon-garden", "register", "Redwood", "30"]).unwrap();
        let (_, command) = args.into_config();

        assert_eq!(
            command,
            Command::Register {
                name: "Redwood".to_string(),
                rate: "30".to_string(),
            }
        );
    }

    #[test]
    fn test_tally_requires_trees() {
        assert!(Args::try_parse_from(["carbon-garden", "tally"]).is_err());

        let args = Args::try_parse_from(["carbon-garden", "tally", "Oak", "Oak"]).unwrap();
        assert_eq!(
            args.command,
            Some(Command::Tally {
                trees: vec!["Oak".to_string(), "Oak".to_string()],
            })
        );
    }

    #[test]
    fn test_global_catalog_flag_after_subcommand() {
        let args = Args::try_parse_from(["carbon-garden", "list", "--catalog", "x.json"]).unwrap();
        assert_eq!(args.catalog, PathBuf::from("x.json"));
    }
}
