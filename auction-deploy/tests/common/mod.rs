//! Shared fixtures for the in-process deploy tests

#![allow(dead_code)]

use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, Bytes, U256};
use auction_deploy::artifacts::Artifact;
use auction_deploy::backend::InMemoryBackend;

pub const AUCTION_ABI: &str = r#"[
    {"type":"function","name":"version","inputs":[],"outputs":[{"name":"","type":"string"}],"stateMutability":"view"},
    {"type":"function","name":"biddingOpen","inputs":[],"outputs":[{"name":"","type":"bool"}],"stateMutability":"view"},
    {"type":"function","name":"resultsReady","inputs":[],"outputs":[{"name":"","type":"bool"}],"stateMutability":"view"},
    {"type":"function","name":"participantsCount","inputs":[],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"},
    {"type":"function","name":"closeBidding","inputs":[],"outputs":[],"stateMutability":"nonpayable"},
    {"type":"function","name":"finalize","inputs":[],"outputs":[],"stateMutability":"nonpayable"}
]"#;

pub fn deployer() -> Address {
    Address::with_last_byte(0xde)
}

pub fn auction_artifact() -> Artifact {
    let abi: JsonAbi = serde_json::from_str(AUCTION_ABI).unwrap();
    Artifact::new(
        "SecretMinBidAuction",
        abi,
        Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]),
    )
}

pub fn uint(value: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(value), 256)
}

/// Backend with the auction artifact under its bare name and the given on-chain state.
pub fn auction_backend(bidding_open: bool, results_ready: bool, participants: u64) -> InMemoryBackend {
    InMemoryBackend::new("hardhat")
        .with_account(deployer())
        .with_artifact("SecretMinBidAuction", auction_artifact())
        .with_value("version", DynSolValue::String("1.0.0".into()))
        .with_value("biddingOpen", DynSolValue::Bool(bidding_open))
        .with_value("resultsReady", DynSolValue::Bool(results_ready))
        .with_value("participantsCount", uint(participants))
        .on_execute("closeBidding", vec![("biddingOpen", DynSolValue::Bool(false))])
        .on_execute("finalize", vec![("resultsReady", DynSolValue::Bool(true))])
}
