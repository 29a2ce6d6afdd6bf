//! Command-Line Interface

use crate::app::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Step Synth - Turn captured events and screen observations into workflow steps
#[derive(Parser, Debug)]
#[command(name = "step-synth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize scored steps from a capture session
    Synthesize {
        /// Input capture session file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the JSON result (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include a quality report in the output
        #[arg(short, long)]
        report: bool,
    },

    /// Check that a capture session parses and has valid timestamps
    Validate {
        /// Input capture session file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write the default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the default config file location
    Path,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "bursts.burst_threshold", "scoring.visual_weight")
        key: String,

        /// Value to set
        value: String,
    },

    /// Get a specific configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Config file this invocation reads and writes
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Load the configuration this command runs with.
    ///
    /// Init and reset overwrite the file, so a missing or broken one is
    /// fine there. Config subcommands fall back to defaults when the file
    /// does not exist, which lets `config set` report the missing file
    /// itself. Every other command requires an explicit `--config` to exist.
    pub fn load_config(&self) -> Result<Config, crate::Error> {
        let path = self.config_path();
        match &self.command {
            Commands::Init { .. }
            | Commands::Config {
                action: ConfigAction::Reset { .. },
            } => Ok(Config::default()),
            Commands::Config { .. } if !path.exists() => Ok(Config::default()),
            _ if self.config.is_some() => Config::load(&path),
            _ => Config::load_default(),
        }
    }
}
