use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy::json_abi::Function;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

use super::{DeployOptions, DeployResult, DeploymentBackend, TxOptions, TxReceipt};
use crate::artifacts::{Artifact, ArtifactStore};
use crate::deployments::{DeploymentRecord, DeploymentStore};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct EvmBackendConfig {
    pub network: String,
    pub rpc_url: String,
    /// Hex private keys; when empty the node's own accounts sign.
    pub private_keys: Vec<String>,
    pub named_accounts: BTreeMap<String, usize>,
    pub artifacts: Vec<PathBuf>,
    pub deployments: PathBuf,
    /// Drop recorded deployments and migrations for the network before use.
    pub reset: bool,
}

/// Deploys and drives contracts on an EVM chain over JSON-RPC.
pub struct EvmBackend {
    network: String,
    provider: DynProvider,
    signers: Vec<Address>,
    named_accounts: BTreeMap<String, usize>,
    artifacts: ArtifactStore,
    store: DeploymentStore,
}

impl EvmBackend {
    pub async fn connect(config: EvmBackendConfig) -> Result<Self> {
        let url: Url = config
            .rpc_url
            .parse()
            .map_err(|e| Error::Config(format!("invalid RPC url {}: {}", config.rpc_url, e)))?;

        let keys = config
            .private_keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                key.trim()
                    .parse::<PrivateKeySigner>()
                    .map_err(|e| Error::Config(format!("invalid private key for account #{}: {}", i, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        let (provider, signers) = match keys.split_first() {
            Some((first, rest)) => {
                let signers = keys.iter().map(|k| k.address()).collect();
                let mut wallet = EthereumWallet::from(first.clone());
                for key in rest {
                    wallet.register_signer(key.clone());
                }
                let provider = ProviderBuilder::new().wallet(wallet).connect_http(url).erased();
                (provider, signers)
            }
            None => {
                let provider = ProviderBuilder::new().connect_http(url).erased();
                let signers = provider.get_accounts().await.map_err(Error::rpc)?;
                debug!("using {} node-managed accounts", signers.len());
                (provider, signers)
            }
        };

        let store = DeploymentStore::open(&config.deployments, &config.network);
        if config.reset {
            info!("resetting deployments in {}", store.network_dir().display());
            store.reset()?;
        }

        Ok(Self {
            network: config.network,
            provider,
            signers,
            named_accounts: config.named_accounts,
            artifacts: ArtifactStore::new(config.artifacts),
            store,
        })
    }

    fn require_deployment(&self, name: &str) -> Result<DeploymentRecord> {
        self.store.load(name)?.ok_or_else(|| Error::DeploymentNotFound {
            name: name.to_string(),
            network: self.network.clone(),
        })
    }

    fn function(record: &DeploymentRecord, contract: &str, method: &str) -> Result<Function> {
        record
            .abi
            .function(method)
            .and_then(|overloads| overloads.iter().find(|f| f.inputs.is_empty()))
            .cloned()
            .ok_or_else(|| Error::UnknownMethod {
                contract: contract.to_string(),
                method: method.to_string(),
            })
    }

    async fn send(&self, method: &str, tx: TransactionRequest, confirmations: u64) -> Result<TransactionReceipt> {
        let failed = |reason: String| Error::Transaction {
            method: method.to_string(),
            reason,
        };
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| failed(e.to_string()))?;
        debug!("{} sent as {}", method, pending.tx_hash());

        let receipt = pending
            .with_required_confirmations(confirmations.max(1))
            .get_receipt()
            .await
            .map_err(|e| failed(e.to_string()))?;
        if !receipt.status() {
            return Err(failed(format!("reverted in {}", receipt.transaction_hash)));
        }
        Ok(receipt)
    }
}

#[async_trait]
impl DeploymentBackend for EvmBackend {
    fn network_name(&self) -> &str {
        &self.network
    }

    async fn named_account(&self, name: &str) -> Result<Address> {
        let index = match self.named_accounts.get(name) {
            Some(index) => *index,
            None if name == "deployer" => 0,
            None => return Err(Error::UnknownAccount(name.to_string())),
        };
        self.signers
            .get(index)
            .copied()
            .ok_or_else(|| Error::UnknownAccount(format!("{} (account #{})", name, index)))
    }

    async fn get_artifact(&self, id: &str) -> Result<Artifact> {
        self.artifacts.find(id)
    }

    async fn deploy(&self, name: &str, options: DeployOptions) -> Result<DeployResult> {
        let artifact = self.artifacts.find(&options.contract)?;
        let code = artifact.creation_code(&options.args)?;
        let bytecode_hash = Artifact::bytecode_hash(&code);

        let previous = self.store.load(name)?;
        if let Some(existing) = previous.as_ref().filter(|r| r.reusable_for(&bytecode_hash)) {
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

        let tx = TransactionRequest::default()
            .with_from(options.from)
            .with_deploy_code(code);
        let receipt = self.send("deploy", tx, options.wait_confirmations).await?;
        let address = receipt.contract_address.ok_or_else(|| Error::Transaction {
            method: "deploy".into(),
            reason: format!("no contract address in receipt {}", receipt.transaction_hash),
        })?;

        if options.log {
            info!(
                "deploying \"{}\" (tx: {})...: deployed at {} with {} gas",
                name, receipt.transaction_hash, address, receipt.gas_used
            );
        }

        let record = DeploymentRecord {
            address,
            abi: artifact.abi,
            transaction_hash: Some(receipt.transaction_hash),
            block_number: receipt.block_number,
            deployer: options.from,
            artifact: options.contract,
            bytecode_hash,
            confirmations: options.wait_confirmations,
            num_deployments: DeploymentRecord::next_deployment_number(previous.as_ref()),
            deployed_at: chrono::Utc::now().timestamp(),
        };
        self.store.save(name, &record)?;

        Ok(DeployResult {
            address,
            transaction_hash: Some(receipt.transaction_hash),
            confirmations: options.wait_confirmations,
            newly_deployed: true,
        })
    }

    async fn read(&self, contract: &str, method: &str) -> Result<DynSolValue> {
        let record = self.require_deployment(contract)?;
        let function = Self::function(&record, contract, method)?;
        let input = function.abi_encode_input(&[]).map_err(Error::abi)?;

        let tx = TransactionRequest::default()
            .with_to(record.address)
            .with_input(input);
        let output = self.provider.call(tx).await.map_err(Error::rpc)?;

        function
            .abi_decode_output(&output)
            .map_err(Error::abi)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Abi(format!("{}.{} returned nothing", contract, method)))
    }

    async fn execute(&self, contract: &str, options: TxOptions, method: &str) -> Result<TxReceipt> {
        let record = self.require_deployment(contract)?;
        let function = Self::function(&record, contract, method)?;
        let input = function.abi_encode_input(&[]).map_err(Error::abi)?;

        let tx = TransactionRequest::default()
            .with_from(options.from)
            .with_to(record.address)
            .with_input(input);
        let receipt = self.send(method, tx, 1).await?;

        if options.log {
            info!(
                "executing {}.{} (tx: {}) ...: performed with {} gas",
                contract, method, receipt.transaction_hash, receipt.gas_used
            );
        }

        Ok(TxReceipt {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }

    async fn deployment(&self, name: &str) -> Result<Option<DeploymentRecord>> {
        self.store.load(name)
    }

    async fn is_migration_recorded(&self, id: &str) -> Result<bool> {
        self.store.is_migration_recorded(id)
    }

    async fn record_migration(&self, id: &str) -> Result<()> {
        self.store.record_migration(id)
    }

    async fn signers(&self) -> Result<Vec<Address>> {
        Ok(self.signers.clone())
    }

    async fn transaction_count(&self, account: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(account)
            .pending()
            .await
            .map_err(Error::rpc)
    }
}
