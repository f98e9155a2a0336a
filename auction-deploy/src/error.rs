use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Cannot find artifact for {contract}. Make sure the contract is compiled and try one of: {}",
        .candidates.join(", ")
    )]
    ArtifactNotFound {
        contract: String,
        candidates: Vec<String>,
        reasons: Vec<String>,
    },

    #[error("Artifact not found: {0}")]
    UnknownArtifact(String),

    #[error("Multiple artifacts match {name}: {}", .matches.join(", "))]
    AmbiguousArtifact { name: String, matches: Vec<String> },

    #[error("Invalid artifact {path}: {reason}")]
    InvalidArtifact { path: String, reason: String },

    #[error("No deployment of {name} recorded on network {network}")]
    DeploymentNotFound { name: String, network: String },

    #[error("Contract {contract} has no method {method}")]
    UnknownMethod { contract: String, method: String },

    #[error("Unknown named account: {0}")]
    UnknownAccount(String),

    #[error("No signer available")]
    NoSigner,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction {method} failed: {reason}")]
    Transaction { method: String, reason: String },

    #[error("Unexpected value from {method}: expected {expected}, got {found}")]
    UnexpectedValue {
        method: String,
        expected: &'static str,
        found: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn rpc(err: impl std::fmt::Display) -> Self {
        Error::Rpc(err.to_string())
    }

    pub(crate) fn abi(err: impl std::fmt::Display) -> Self {
        Error::Abi(err.to_string())
    }
}
