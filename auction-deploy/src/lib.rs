//! Deployment and lifecycle orchestration for the SecretMinBidAuction contract.
//!
//! The crate is split along the steps of a deploy run:
//! - `artifacts` / `resolver`: locate the compiled contract among a list of candidate ids
//! - `backend`: the chain-facing surface (EVM over alloy, or in-process for tests)
//! - `orchestrator`: deploy, probe and step the auction in one sequential run
//! - `probe` / `lifecycle`: the read-only liveness check and the guarded close/finalize transitions
//! - `nonce`: pending transaction count of the active signer

mod error;

pub mod artifacts;
pub mod backend;
pub mod config;
pub mod config_file;
pub mod deployments;
pub mod lifecycle;
pub mod nonce;
pub mod orchestrator;
pub mod probe;
pub mod resolver;

pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
