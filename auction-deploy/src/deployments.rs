//! Per-network record of what has been deployed and which deploy procedures already ran.
//!
//! Layout under the deployments root:
//! ```text
//! <root>/<network>/<Name>.json        one record per named deployment
//! <root>/<network>/.migrations.json   deployment id -> unix timestamp
//! ```

use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::Result;

const MIGRATIONS_FILE: &str = ".migrations.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub address: Address,
    pub abi: JsonAbi,
    pub transaction_hash: Option<B256>,
    pub block_number: Option<u64>,
    pub deployer: Address,
    /// Artifact identifier the deployment was built from.
    pub artifact: String,
    pub bytecode_hash: String,
    pub confirmations: u64,
    pub num_deployments: u64,
    pub deployed_at: i64,
}

impl DeploymentRecord {
    /// An earlier deployment is reused only when it was built from identical creation code.
    pub fn reusable_for(&self, bytecode_hash: &str) -> bool {
        self.bytecode_hash == bytecode_hash
    }

    /// `num_deployments` for a fresh deployment replacing `previous`.
    pub fn next_deployment_number(previous: Option<&DeploymentRecord>) -> u64 {
        previous.map_or(1, |r| r.num_deployments + 1)
    }
}

pub struct DeploymentStore {
    network_dir: PathBuf,
}

impl DeploymentStore {
    /// Nothing touches the disk until the first write.
    pub fn open(root: &Path, network: &str) -> Self {
        Self {
            network_dir: root.join(network),
        }
    }

    pub fn network_dir(&self) -> &Path {
        &self.network_dir
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.network_dir.join(format!("{}.json", name))
    }

    /// Load the record for a named deployment
    pub fn load(&self, name: &str) -> Result<Option<DeploymentRecord>> {
        let path = self.record_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Save the record for a named deployment
    pub fn save(&self, name: &str, record: &DeploymentRecord) -> Result<()> {
        let content = serde_json::to_string_pretty(record)?;
        std::fs::create_dir_all(&self.network_dir)?;
        std::fs::write(self.record_path(name), content)?;
        Ok(())
    }

    pub fn migrations(&self) -> Result<BTreeMap<String, i64>> {
        let path = self.network_dir.join(MIGRATIONS_FILE);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn is_migration_recorded(&self, id: &str) -> Result<bool> {
        Ok(self.migrations()?.contains_key(id))
    }

    pub fn record_migration(&self, id: &str) -> Result<()> {
        let mut migrations = self.migrations()?;
        migrations.insert(id.to_string(), chrono::Utc::now().timestamp());
        let content = serde_json::to_string_pretty(&migrations)?;
        std::fs::create_dir_all(&self.network_dir)?;
        std::fs::write(self.network_dir.join(MIGRATIONS_FILE), content)?;
        Ok(())
    }

    /// Forget every deployment and migration on this network.
    pub fn reset(&self) -> Result<()> {
        if self.network_dir.exists() {
            std::fs::remove_dir_all(&self.network_dir)?;
        }
        Ok(())
    }
}
