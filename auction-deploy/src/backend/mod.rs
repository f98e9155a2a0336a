pub mod evm;
pub mod in_memory;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

use crate::artifacts::Artifact;
use crate::deployments::DeploymentRecord;
use crate::{Error, Result};

pub use evm::{EvmBackend, EvmBackendConfig};
pub use in_memory::InMemoryBackend;

#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub from: Address,
    /// Artifact identifier to build the deployment from.
    pub contract: String,
    pub args: Vec<DynSolValue>,
    pub log: bool,
    pub wait_confirmations: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployResult {
    pub address: Address,
    pub transaction_hash: Option<B256>,
    pub confirmations: u64,
    /// False when an identical earlier deployment was reused.
    pub newly_deployed: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct TxOptions {
    pub from: Address,
    pub log: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Everything a deploy run needs from the chain and the build outputs.
///
/// Contracts are addressed by deployment name; the backend owns the mapping
/// from name to address and ABI.
#[async_trait]
pub trait DeploymentBackend: Send + Sync {
    fn network_name(&self) -> &str;

    async fn named_account(&self, name: &str) -> Result<Address>;

    async fn get_artifact(&self, id: &str) -> Result<Artifact>;

    async fn deploy(&self, name: &str, options: DeployOptions) -> Result<DeployResult>;

    /// Calls a view method without arguments and returns its first output.
    async fn read(&self, contract: &str, method: &str) -> Result<DynSolValue>;

    /// Sends a transaction calling a method without arguments and waits for it to succeed.
    async fn execute(&self, contract: &str, options: TxOptions, method: &str) -> Result<TxReceipt>;

    async fn deployment(&self, name: &str) -> Result<Option<DeploymentRecord>>;

    async fn is_migration_recorded(&self, id: &str) -> Result<bool>;

    async fn record_migration(&self, id: &str) -> Result<()>;

    async fn signers(&self) -> Result<Vec<Address>>;

    /// Pending transaction count of `account`.
    async fn transaction_count(&self, account: Address) -> Result<u64>;

    async fn read_bool(&self, contract: &str, method: &str) -> Result<bool> {
        match self.read(contract, method).await? {
            DynSolValue::Bool(value) => Ok(value),
            other => Err(unexpected(method, "bool", &other)),
        }
    }

    async fn read_uint(&self, contract: &str, method: &str) -> Result<U256> {
        match self.read(contract, method).await? {
            DynSolValue::Uint(value, _) => Ok(value),
            other => Err(unexpected(method, "uint", &other)),
        }
    }

    async fn read_string(&self, contract: &str, method: &str) -> Result<String> {
        match self.read(contract, method).await? {
            DynSolValue::String(value) => Ok(value),
            other => Err(unexpected(method, "string", &other)),
        }
    }
}

fn unexpected(method: &str, expected: &'static str, found: &DynSolValue) -> Error {
    Error::UnexpectedValue {
        method: method.to_string(),
        expected,
        found: format!("{:?}", found),
    }
}
