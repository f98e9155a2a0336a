//! CLI command modules for the auction CLI.
//!
//! - `deploy`: full deploy run (resolve, deploy, probe, lifecycle)
//! - `lifecycle`: close/finalize against an existing deployment
//! - `nonce`: pending nonce of the active signer

pub mod deploy;
pub mod lifecycle;
pub mod nonce;

use anyhow::{Context, Result};
use auction_deploy::backend::EvmBackend;
use auction_deploy::config::parse_switch;
use auction_deploy::config_file::{ConfigFile, Overrides};
use clap::{ArgAction, Args};
use std::path::PathBuf;

/// Where and as whom to talk to the chain.
#[derive(Debug, Args)]
pub struct NetworkOpts {
    /// Network config file
    #[arg(long, env = "DEPLOY_CONFIG", default_value = "deploy.json")]
    pub config: PathBuf,

    /// Network name from the config file (defaults to its default_network, then localhost)
    #[arg(long, env = "NETWORK")]
    pub network: Option<String>,

    /// JSON-RPC endpoint, overrides the configured network url
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Hex private key used as the first signer
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,
}

impl NetworkOpts {
    pub async fn connect(&self, reset: bool) -> Result<EvmBackend> {
        let file = ConfigFile::load(&self.config)?;
        let config = file.backend_config(Overrides {
            network: self.network.clone(),
            rpc_url: self.rpc_url.clone(),
            private_key: self.private_key.clone(),
            reset,
        })?;
        tracing::debug!("connecting to {} at {}", config.network, config.rpc_url);

        let network = config.network.clone();
        EvmBackend::connect(config)
            .await
            .with_context(|| format!("Failed to connect to network {}", network))
    }
}

/// CLOSE / FINALIZE style switch: `--close`, `--close=1`, or the environment variable.
#[derive(Debug, Args)]
pub struct LifecycleOpts {
    /// Close bidding when open and at least one bid exists
    #[arg(long, env = "CLOSE", action = ArgAction::Set, value_parser = parse_switch, num_args = 0..=1, default_value = "false", default_missing_value = "true")]
    pub close: bool,

    /// Finalize when closed, not yet finalized and participants exist
    #[arg(long, env = "FINALIZE", action = ArgAction::Set, value_parser = parse_switch, num_args = 0..=1, default_value = "false", default_missing_value = "true")]
    pub finalize: bool,
}

impl LifecycleOpts {
    pub fn flags(&self) -> auction_deploy::config::LifecycleFlags {
        auction_deploy::config::LifecycleFlags {
            close: self.close,
            finalize: self.finalize,
        }
    }
}
