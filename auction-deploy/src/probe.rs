//! Best-effort read of the auction's initial state right after deployment.

use alloy::primitives::{Address, U256};
use std::fmt;

use crate::backend::DeploymentBackend;
use crate::Result;

pub const VERSION: &str = "version";
pub const BIDDING_OPEN: &str = "biddingOpen";
pub const RESULTS_READY: &str = "resultsReady";
pub const PARTICIPANTS_COUNT: &str = "participantsCount";

/// Four independent reads; nothing ties them to the same block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionSnapshot {
    pub version: String,
    pub bidding_open: bool,
    pub results_ready: bool,
    pub participants: U256,
}

impl AuctionSnapshot {
    pub async fn fetch<B>(backend: &B, contract: &str) -> Result<Self>
    where
        B: DeploymentBackend + ?Sized,
    {
        let version = backend.read_string(contract, VERSION).await?;
        let bidding_open = backend.read_bool(contract, BIDDING_OPEN).await?;
        let results_ready = backend.read_bool(contract, RESULTS_READY).await?;
        let participants = backend.read_uint(contract, PARTICIPANTS_COUNT).await?;
        Ok(Self {
            version,
            bidding_open,
            results_ready,
            participants,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Snapshot(AuctionSnapshot),
    /// A read failed; the reason is kept for debugging only.
    AddressOnly { reason: String },
}

impl ProbeOutcome {
    pub fn snapshot(&self) -> Option<&AuctionSnapshot> {
        match self {
            ProbeOutcome::Snapshot(snapshot) => Some(snapshot),
            ProbeOutcome::AddressOnly { .. } => None,
        }
    }

    pub fn summary(&self, address: Address, network: &str) -> ProbeSummary<'_> {
        ProbeSummary {
            outcome: self,
            address,
            network: network.to_string(),
        }
    }
}

/// Human-readable deploy line: the address, plus the snapshot when there is one.
pub struct ProbeSummary<'a> {
    outcome: &'a ProbeOutcome,
    address: Address,
    network: String,
}

impl fmt::Display for ProbeSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "✅ Deployed at {} on {}", self.address, self.network)?;
        if let ProbeOutcome::Snapshot(s) = self.outcome {
            write!(
                f,
                " (version: {}, biddingOpen: {}, resultsReady: {}, participants: {})",
                s.version, s.bidding_open, s.results_ready, s.participants
            )?;
        }
        Ok(())
    }
}

/// Never fails: any read error collapses the whole snapshot.
pub async fn probe<B>(backend: &B, contract: &str) -> ProbeOutcome
where
    B: DeploymentBackend + ?Sized,
{
    match AuctionSnapshot::fetch(backend, contract).await {
        Ok(snapshot) => ProbeOutcome::Snapshot(snapshot),
        Err(err) => {
            tracing::debug!("liveness probe of {} failed: {}", contract, err);
            ProbeOutcome::AddressOnly {
                reason: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_with_snapshot() {
        let outcome = ProbeOutcome::Snapshot(AuctionSnapshot {
            version: "1.0.0".into(),
            bidding_open: true,
            results_ready: false,
            participants: U256::from(2),
        });
        let line = outcome.summary(Address::ZERO, "sepolia").to_string();
        assert!(line.contains("on sepolia"));
        assert!(line.contains("version: 1.0.0"));
        assert!(line.contains("biddingOpen: true"));
        assert!(line.contains("resultsReady: false"));
        assert!(line.contains("participants: 2"));
    }

    #[test]
    fn test_summary_address_only() {
        let outcome = ProbeOutcome::AddressOnly {
            reason: "missing method".into(),
        };
        let line = outcome.summary(Address::ZERO, "localhost").to_string();
        assert_eq!(
            line,
            format!("✅ Deployed at {} on localhost", Address::ZERO)
        );
        assert!(outcome.snapshot().is_none());
    }
}
