mod cmds;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "auction")]
#[command(version)]
#[command(about = "Deploy and operate the SecretMinBidAuction contract", long_about = None)]
struct Cli {
    /// Log level for auction output (RUST_LOG takes precedence)
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Deploy the auction, probe it and optionally close or finalize it")]
    Deploy(cmds::deploy::Opts),

    #[command(about = "Close or finalize the recorded auction deployment")]
    Lifecycle(cmds::lifecycle::Opts),

    #[command(alias = "get_nonce", about = "Print the pending nonce of the first signer")]
    Nonce(cmds::nonce::Opts),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    match &cli.command {
        Commands::Deploy(opts) => cmds::deploy::run(opts).await?,
        Commands::Lifecycle(opts) => cmds::lifecycle::run(opts).await?,
        Commands::Nonce(opts) => cmds::nonce::run(opts).await?,
    }

    Ok(())
}
