//! The SecretMinBidAuction deploy procedure.
//!
//! One sequential pass: resolve the artifact, deploy it, probe the new
//! instance, then attempt the lifecycle transitions the configuration asks
//! for. Only the probe recovers from its own failures; anything else aborts
//! the run. The procedure is tagged so a run restricted to other tags leaves
//! it out.

use alloy::primitives::Address;
use tracing::{info, warn};

use crate::backend::{DeployOptions, DeploymentBackend};
use crate::config::DeployConfig;
use crate::lifecycle::{self, LifecycleReport};
use crate::probe::{self, ProbeOutcome};
use crate::resolver;
use crate::Result;

pub const CONTRACT_NAME: &str = "SecretMinBidAuction";
/// Recorded after a successful run so later runs skip the procedure.
pub const DEPLOYMENT_ID: &str = "deploy_secret_min_bid_auction";
pub const TAGS: &[&str] = &[CONTRACT_NAME];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub address: Address,
    /// Artifact identifier used; `None` when the procedure was skipped.
    pub contract_id: Option<String>,
    pub newly_deployed: bool,
    pub skipped: bool,
    pub probe: Option<ProbeOutcome>,
    pub lifecycle: LifecycleReport,
}

/// Returns `None` when the configured tags leave this procedure out.
pub async fn run<B>(backend: &B, config: &DeployConfig) -> Result<Option<DeployReport>>
where
    B: DeploymentBackend + ?Sized,
{
    if !config.selects(TAGS) {
        info!(
            "{} not selected by tags [{}], skipping",
            DEPLOYMENT_ID,
            config.tags.join(", ")
        );
        return Ok(None);
    }

    if backend.is_migration_recorded(DEPLOYMENT_ID).await? {
        match backend.deployment(CONTRACT_NAME).await? {
            Some(record) => {
                info!(
                    "{} already executed on {}, skipping (address {})",
                    DEPLOYMENT_ID,
                    backend.network_name(),
                    record.address
                );
                return Ok(Some(DeployReport {
                    address: record.address,
                    contract_id: None,
                    newly_deployed: false,
                    skipped: true,
                    probe: None,
                    lifecycle: LifecycleReport::default(),
                }));
            }
            None => warn!(
                "{} is recorded on {} but the {} deployment is missing, deploying again",
                DEPLOYMENT_ID,
                backend.network_name(),
                CONTRACT_NAME
            ),
        }
    }

    let deployer = backend.named_account("deployer").await?;

    let candidates = config.candidates(CONTRACT_NAME);
    let resolved = resolver::resolve_artifact(backend, CONTRACT_NAME, &candidates).await?;

    info!("🔨 Deploying {}… (artifact: {})", CONTRACT_NAME, resolved.id);

    let deployed = backend
        .deploy(
            CONTRACT_NAME,
            DeployOptions {
                from: deployer,
                contract: resolved.id.clone(),
                args: Vec::new(),
                log: true,
                wait_confirmations: config.wait_confirmations,
            },
        )
        .await?;

    let probe = probe::probe(backend, CONTRACT_NAME).await;
    info!("{}", probe.summary(deployed.address, backend.network_name()));

    let lifecycle = lifecycle::run_lifecycle(backend, CONTRACT_NAME, deployer, config.flags).await?;

    backend.record_migration(DEPLOYMENT_ID).await?;

    Ok(Some(DeployReport {
        address: deployed.address,
        contract_id: Some(resolved.id),
        newly_deployed: deployed.newly_deployed,
        skipped: false,
        probe: Some(probe),
        lifecycle,
    }))
}
