use anyhow::Result;
use auction_deploy::nonce::current_nonce;
use clap::Parser;

use super::NetworkOpts;

#[derive(Debug, Parser)]
pub struct Opts {
    #[command(flatten)]
    network: NetworkOpts,
}

pub async fn run(opts: &Opts) -> Result<()> {
    let backend = opts.network.connect(false).await?;
    let (signer, nonce) = current_nonce(&backend).await?;
    tracing::debug!("pending nonce of {}", signer);

    println!("Current nonce: {}", nonce);

    Ok(())
}
