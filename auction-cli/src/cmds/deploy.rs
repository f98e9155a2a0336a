use anyhow::Result;
use auction_deploy::backend::DeploymentBackend;
use auction_deploy::config::{parse_confirmations, DeployConfig};
use auction_deploy::orchestrator::{self, CONTRACT_NAME};
use clap::Parser;

use super::{LifecycleOpts, NetworkOpts};

#[derive(Debug, Parser)]
pub struct Opts {
    #[command(flatten)]
    network: NetworkOpts,

    #[command(flatten)]
    lifecycle: LifecycleOpts,

    /// Exact artifact identifier to try first, e.g. contracts/SecretMinBidAuction.sol:SecretMinBidAuction
    #[arg(long, env = "FQN")]
    fqn: Option<String>,

    /// Confirmations to wait for after the deploy transaction
    #[arg(long, env = "WAIT_CONFIRMATIONS", default_value = "1", value_parser = parse_confirmations)]
    wait_confirmations: u64,

    /// Run only deploy procedures carrying one of these tags (comma separated)
    #[arg(long, env = "DEPLOY_TAGS", value_delimiter = ',')]
    tags: Vec<String>,

    /// Forget recorded deployments on this network and deploy again
    #[arg(long, env = "DEPLOY_RESET")]
    reset: bool,
}

impl Opts {
    fn deploy_config(&self) -> DeployConfig {
        DeployConfig::new(
            self.fqn.as_deref(),
            self.wait_confirmations,
            self.lifecycle.flags(),
        )
        .with_tags(&self.tags)
    }
}

pub async fn run(opts: &Opts) -> Result<()> {
    let config = opts.deploy_config();
    let backend = opts.network.connect(opts.reset).await?;
    tracing::debug!("deploying to {} with {:?}", backend.network_name(), config);

    if let Some(report) = orchestrator::run(&backend, &config).await? {
        println!("{} contract: {}", CONTRACT_NAME, report.address);
    }

    Ok(())
}
