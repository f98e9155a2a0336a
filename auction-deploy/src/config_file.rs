//! `deploy.json`: networks, signer keys, named accounts and build output locations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::EvmBackendConfig;
use crate::{Error, Result};

pub const DEFAULT_NETWORK: &str = "localhost";
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ConfigFile {
    pub default_network: Option<String>,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
    #[serde(default)]
    pub named_accounts: BTreeMap<String, usize>,
    pub artifacts: Option<Vec<PathBuf>>,
    pub deployments: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct NetworkConfig {
    pub url: Option<String>,
    #[serde(default)]
    pub accounts: Vec<String>,
}

/// Values given on the command line or through the environment; they win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub network: Option<String>,
    pub rpc_url: Option<String>,
    pub private_key: Option<String>,
    pub reset: bool,
}

impl ConfigFile {
    /// A missing file is not an error; the defaults target a local node.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    pub fn backend_config(&self, overrides: Overrides) -> Result<EvmBackendConfig> {
        let network = overrides
            .network
            .or_else(|| self.default_network.clone())
            .unwrap_or_else(|| DEFAULT_NETWORK.to_string());

        let network_config = match self.networks.get(&network) {
            Some(config) => config.clone(),
            None if network == DEFAULT_NETWORK => NetworkConfig::default(),
            None => {
                return Err(Error::Config(format!(
                    "network {} is not configured (known: {})",
                    network,
                    self.networks.keys().cloned().collect::<Vec<_>>().join(", ")
                )))
            }
        };

        let rpc_url = overrides
            .rpc_url
            .or(network_config.url)
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        let mut private_keys = network_config.accounts;
        if let Some(key) = overrides.private_key.filter(|k| !k.trim().is_empty()) {
            private_keys.insert(0, key);
        }

        Ok(EvmBackendConfig {
            network,
            rpc_url,
            private_keys,
            named_accounts: self.named_accounts.clone(),
            artifacts: self
                .artifacts
                .clone()
                .unwrap_or_else(|| vec![PathBuf::from("artifacts"), PathBuf::from("out")]),
            deployments: self
                .deployments
                .clone()
                .unwrap_or_else(|| PathBuf::from("deployments")),
            reset: overrides.reset,
        })
    }
}
