//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::BaseConfig;

#[derive(Parser)]
#[command(name = "formbot")]
#[command(about = "Telegram questionnaire bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; flags override BOT_TOKEN and ROUTER_LANES).
    Run {
        #[arg(short, long)]
        token: Option<String>,
        /// Number of dispatch lanes.
        #[arg(short, long)]
        lanes: Option<usize>,
    },
}

/// Loads BaseConfig from the environment, applying CLI overrides.
pub fn load_config(token: Option<String>, lanes: Option<usize>) -> Result<BaseConfig> {
    BaseConfig::load(token, lanes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = Cli::parse_from(["formbot", "run", "--token", "abc", "--lanes", "3"]);
        match cli.command {
            Commands::Run { token, lanes } => {
                assert_eq!(token.as_deref(), Some("abc"));
                assert_eq!(lanes, Some(3));
            }
        }
    }

    #[test]
    fn test_parse_run_without_flags() {
        let cli = Cli::parse_from(["formbot", "run"]);
        match cli.command {
            Commands::Run { token, lanes } => {
                assert!(token.is_none());
                assert!(lanes.is_none());
            }
        }
    }
}
