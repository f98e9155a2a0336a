use anyhow::{Context, Result};
use auction_deploy::backend::DeploymentBackend;
use auction_deploy::lifecycle::{run_lifecycle, StepOutcome};
use auction_deploy::orchestrator::CONTRACT_NAME;
use auction_deploy::Error;
use clap::Parser;

use super::{LifecycleOpts, NetworkOpts};

#[derive(Debug, Parser)]
pub struct Opts {
    #[command(flatten)]
    network: NetworkOpts,

    #[command(flatten)]
    lifecycle: LifecycleOpts,
}

pub async fn run(opts: &Opts) -> Result<()> {
    let flags = opts.lifecycle.flags();
    if !flags.any() {
        tracing::info!("ℹ️ Nothing to do, pass --close and/or --finalize");
        return Ok(());
    }

    let backend = opts.network.connect(false).await?;
    let record = backend
        .deployment(CONTRACT_NAME)
        .await?
        .ok_or_else(|| Error::DeploymentNotFound {
            name: CONTRACT_NAME.to_string(),
            network: backend.network_name().to_string(),
        })?;
    let deployer = backend
        .named_account("deployer")
        .await
        .context("Failed to resolve deployer account")?;

    tracing::info!("{} at {} on {}", CONTRACT_NAME, record.address, backend.network_name());
    let report = run_lifecycle(&backend, CONTRACT_NAME, deployer, flags).await?;

    for (step, outcome) in [("close", &report.close), ("finalize", &report.finalize)] {
        if let Some(StepOutcome::Executed(receipt)) = outcome {
            println!("{}: {}", step, receipt.transaction_hash);
        }
    }

    Ok(())
}
