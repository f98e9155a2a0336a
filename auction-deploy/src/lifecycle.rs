//! Guarded close and finalize transitions of a deployed auction.
//!
//! The contract owns its state machine (`Open -> Closed -> Finalized`); the
//! checks here only avoid sending transactions that cannot do anything useful.
//! State is re-read right before each transition, so another actor can still
//! move the auction between the check and the transaction.

use alloy::primitives::{Address, U256};
use std::fmt;
use tracing::{info, warn};

use crate::backend::{DeploymentBackend, TxOptions, TxReceipt};
use crate::config::LifecycleFlags;
use crate::probe::{BIDDING_OPEN, PARTICIPANTS_COUNT, RESULTS_READY};
use crate::Result;

pub const CLOSE_BIDDING: &str = "closeBidding";
pub const FINALIZE: &str = "finalize";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionState {
    Open,
    Closed,
    Finalized,
}

impl AuctionState {
    /// An open auction is `Open` whatever `resultsReady` says.
    pub fn observe(bidding_open: bool, results_ready: bool) -> Self {
        match (bidding_open, results_ready) {
            (true, _) => AuctionState::Open,
            (false, false) => AuctionState::Closed,
            (false, true) => AuctionState::Finalized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyClosed,
    NoBids,
    StillOpen,
    AlreadyFinalized,
    NoParticipants,
}

impl SkipReason {
    /// Warnings need operator action; the rest are harmless no-ops.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            SkipReason::NoBids | SkipReason::StillOpen | SkipReason::NoParticipants
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            SkipReason::AlreadyClosed => "ℹ️ Bidding already closed",
            SkipReason::NoBids => "⚠️ Cannot close: no bids yet",
            SkipReason::StillOpen => "⚠️ Cannot finalize: bidding is still open. Set CLOSE=1 first.",
            SkipReason::AlreadyFinalized => "ℹ️ Already finalized",
            SkipReason::NoParticipants => "⚠️ Cannot finalize: no participants",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Executed(TxReceipt),
    Skipped(SkipReason),
}

impl StepOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, StepOutcome::Executed(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleReport {
    /// `None` when the transition was not requested.
    pub close: Option<StepOutcome>,
    pub finalize: Option<StepOutcome>,
}

pub fn check_close(bidding_open: bool, participants: U256) -> std::result::Result<(), SkipReason> {
    if !bidding_open {
        Err(SkipReason::AlreadyClosed)
    } else if participants.is_zero() {
        Err(SkipReason::NoBids)
    } else {
        Ok(())
    }
}

pub fn check_finalize(state: AuctionState, participants: U256) -> std::result::Result<(), SkipReason> {
    match state {
        AuctionState::Open => Err(SkipReason::StillOpen),
        AuctionState::Finalized => Err(SkipReason::AlreadyFinalized),
        AuctionState::Closed if participants.is_zero() => Err(SkipReason::NoParticipants),
        AuctionState::Closed => Ok(()),
    }
}

fn skipped(reason: SkipReason) -> StepOutcome {
    if reason.is_warning() {
        warn!("{}", reason);
    } else {
        info!("{}", reason);
    }
    StepOutcome::Skipped(reason)
}

pub async fn close<B>(backend: &B, contract: &str, from: Address) -> Result<StepOutcome>
where
    B: DeploymentBackend + ?Sized,
{
    let bidding_open = backend.read_bool(contract, BIDDING_OPEN).await?;
    // participants only matter while bidding is open
    let participants = if bidding_open {
        backend.read_uint(contract, PARTICIPANTS_COUNT).await?
    } else {
        U256::ZERO
    };

    if let Err(reason) = check_close(bidding_open, participants) {
        return Ok(skipped(reason));
    }

    info!("🔒 Closing bidding…");
    let receipt = backend
        .execute(contract, TxOptions { from, log: true }, CLOSE_BIDDING)
        .await?;
    info!("🔒 Bidding closed");
    Ok(StepOutcome::Executed(receipt))
}

pub async fn finalize<B>(backend: &B, contract: &str, from: Address) -> Result<StepOutcome>
where
    B: DeploymentBackend + ?Sized,
{
    let bidding_open = backend.read_bool(contract, BIDDING_OPEN).await?;
    let results_ready = backend.read_bool(contract, RESULTS_READY).await?;
    let participants = backend.read_uint(contract, PARTICIPANTS_COUNT).await?;

    let state = AuctionState::observe(bidding_open, results_ready);
    if let Err(reason) = check_finalize(state, participants) {
        return Ok(skipped(reason));
    }

    info!("🏁 Finalizing auction (prepare winner flags)…");
    let receipt = backend
        .execute(contract, TxOptions { from, log: true }, FINALIZE)
        .await?;
    info!("🏁 Finalization complete (winner flags granted)");
    Ok(StepOutcome::Executed(receipt))
}

/// Close first, then finalize, each only when its flag is set.
pub async fn run_lifecycle<B>(
    backend: &B,
    contract: &str,
    from: Address,
    flags: LifecycleFlags,
) -> Result<LifecycleReport>
where
    B: DeploymentBackend + ?Sized,
{
    let mut report = LifecycleReport::default();
    if flags.close {
        report.close = Some(close(backend, contract, from).await?);
    }
    if flags.finalize {
        report.finalize = Some(finalize(backend, contract, from).await?);
    }
    Ok(report)
}
