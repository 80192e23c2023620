//! formbot binary.

use anyhow::Result;
use clap::Parser;
use formbot::{load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token, lanes } => {
            let config = load_config(token, lanes)?;
            run_bot(config).await
        }
    }
}
