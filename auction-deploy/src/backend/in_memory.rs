use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use tokio::sync::Mutex;
use tracing::info;

use super::{DeployOptions, DeployResult, DeploymentBackend, TxOptions, TxReceipt};
use crate::artifacts::Artifact;
use crate::deployments::DeploymentRecord;
use crate::{Error, Result};

/// Backend that keeps the whole chain in process.
///
/// Read values are keyed by method name and shared by every contract, which is
/// enough for driving a single deployment. Executing a method applies the
/// value updates registered for it with [`InMemoryBackend::on_execute`].
pub struct InMemoryBackend {
    network: String,
    accounts: Vec<Address>,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    artifacts: HashMap<String, Artifact>,
    values: HashMap<String, DynSolValue>,
    failing_reads: HashSet<String>,
    failing_executes: HashSet<String>,
    effects: HashMap<String, Vec<(String, DynSolValue)>>,
    deployments: HashMap<String, DeploymentRecord>,
    migrations: BTreeSet<String>,
    artifact_lookups: Vec<String>,
    reads: Vec<String>,
    executed: Vec<String>,
    nonces: HashMap<Address, u64>,
    block: u64,
}

impl InMemoryBackend {
    pub fn new(network: &str) -> Self {
        Self {
            network: network.to_string(),
            accounts: Vec::new(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_account(mut self, account: Address) -> Self {
        self.accounts.push(account);
        self
    }

    pub fn with_artifact(mut self, id: &str, artifact: Artifact) -> Self {
        self.state.get_mut().artifacts.insert(id.to_string(), artifact);
        self
    }

    pub fn with_value(mut self, method: &str, value: DynSolValue) -> Self {
        self.state.get_mut().values.insert(method.to_string(), value);
        self
    }

    pub fn with_failing_read(mut self, method: &str) -> Self {
        self.state.get_mut().failing_reads.insert(method.to_string());
        self
    }

    pub fn with_failing_execute(mut self, method: &str) -> Self {
        self.state.get_mut().failing_executes.insert(method.to_string());
        self
    }

    pub fn with_migration(mut self, id: &str) -> Self {
        self.state.get_mut().migrations.insert(id.to_string());
        self
    }

    pub fn with_deployment(mut self, name: &str, record: DeploymentRecord) -> Self {
        self.state.get_mut().deployments.insert(name.to_string(), record);
        self
    }

    pub fn with_nonce(mut self, account: Address, nonce: u64) -> Self {
        self.state.get_mut().nonces.insert(account, nonce);
        self
    }

    /// Values overwritten whenever `method` is executed successfully.
    pub fn on_execute(mut self, method: &str, updates: Vec<(&str, DynSolValue)>) -> Self {
        let updates = updates
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        self.state.get_mut().effects.insert(method.to_string(), updates);
        self
    }

    pub async fn set_value(&self, method: &str, value: DynSolValue) {
        self.state.lock().await.values.insert(method.to_string(), value);
    }

    pub async fn artifact_lookups(&self) -> Vec<String> {
        self.state.lock().await.artifact_lookups.clone()
    }

    pub async fn reads(&self) -> Vec<String> {
        self.state.lock().await.reads.clone()
    }

    pub async fn executed(&self) -> Vec<String> {
        self.state.lock().await.executed.clone()
    }

    fn tx_hash(block: u64) -> B256 {
        B256::left_padding_from(&block.to_be_bytes())
    }
}

#[async_trait]
impl DeploymentBackend for InMemoryBackend {
    fn network_name(&self) -> &str {
        &self.network
    }

    async fn named_account(&self, name: &str) -> Result<Address> {
        match name {
            "deployer" => self.accounts.first().copied().ok_or(Error::NoSigner),
            _ => Err(Error::UnknownAccount(name.to_string())),
        }
    }

    async fn get_artifact(&self, id: &str) -> Result<Artifact> {
        let mut state = self.state.lock().await;
        state.artifact_lookups.push(id.to_string());
        state
            .artifacts
            .get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownArtifact(id.to_string()))
    }

    async fn deploy(&self, name: &str, options: DeployOptions) -> Result<DeployResult> {
        let mut state = self.state.lock().await;
        let artifact = state
            .artifacts
            .get(&options.contract)
            .cloned()
            .ok_or_else(|| Error::UnknownArtifact(options.contract.clone()))?;
        let code = artifact.creation_code(&options.args)?;
        let bytecode_hash = Artifact::bytecode_hash(&code);

        let previous = state.deployments.get(name);
        if let Some(existing) = previous.filter(|r| r.reusable_for(&bytecode_hash)) {
            if options.log {
                info!("reusing \"{}\" at {}", name, existing.address);
            }
            return Ok(DeployResult {
                address: existing.address,
                transaction_hash: existing.transaction_hash,
                confirmations: existing.confirmations,
                newly_deployed: false,
            });
        }
        let num_deployments = DeploymentRecord::next_deployment_number(previous);

        state.block += 1;
        let address = Address::left_padding_from(&(0xa0000 + state.block).to_be_bytes());
        let transaction_hash = Self::tx_hash(state.block);
        let record = DeploymentRecord {
            address,
            abi: artifact.abi,
            transaction_hash: Some(transaction_hash),
            block_number: Some(state.block),
            deployer: options.from,
            artifact: options.contract,
            bytecode_hash,
            confirmations: options.wait_confirmations,
            num_deployments,
            deployed_at: chrono::Utc::now().timestamp(),
        };
        state.deployments.insert(name.to_string(), record);

        Ok(DeployResult {
            address,
            transaction_hash: Some(transaction_hash),
            confirmations: options.wait_confirmations,
            newly_deployed: true,
        })
    }

    async fn read(&self, contract: &str, method: &str) -> Result<DynSolValue> {
        let mut state = self.state.lock().await;
        state.reads.push(method.to_string());
        if state.failing_reads.contains(method) {
            return Err(Error::Rpc(format!("execution reverted: {}.{}", contract, method)));
        }
        state
            .values
            .get(method)
            .cloned()
            .ok_or_else(|| Error::UnknownMethod {
                contract: contract.to_string(),
                method: method.to_string(),
            })
    }

    async fn execute(&self, contract: &str, _options: TxOptions, method: &str) -> Result<TxReceipt> {
        let mut state = self.state.lock().await;
        if state.failing_executes.contains(method) {
            return Err(Error::Transaction {
                method: method.to_string(),
                reason: format!("execution reverted: {}.{}", contract, method),
            });
        }
        state.executed.push(method.to_string());
        if let Some(updates) = state.effects.get(method).cloned() {
            state.values.extend(updates);
        }
        state.block += 1;
        Ok(TxReceipt {
            transaction_hash: Self::tx_hash(state.block),
            block_number: Some(state.block),
            gas_used: 21_000,
        })
    }

    async fn deployment(&self, name: &str) -> Result<Option<DeploymentRecord>> {
        Ok(self.state.lock().await.deployments.get(name).cloned())
    }

    async fn is_migration_recorded(&self, id: &str) -> Result<bool> {
        Ok(self.state.lock().await.migrations.contains(id))
    }

    async fn record_migration(&self, id: &str) -> Result<()> {
        self.state.lock().await.migrations.insert(id.to_string());
        Ok(())
    }

    async fn signers(&self) -> Result<Vec<Address>> {
        Ok(self.accounts.clone())
    }

    async fn transaction_count(&self, account: Address) -> Result<u64> {
        Ok(self.state.lock().await.nonces.get(&account).copied().unwrap_or_default())
    }
}
