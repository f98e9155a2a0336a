mod common;

use alloy::dyn_abi::DynSolValue;
use auction_deploy::backend::DeploymentBackend;
use auction_deploy::config::LifecycleFlags;
use auction_deploy::lifecycle::{self, run_lifecycle, SkipReason, StepOutcome};
use auction_deploy::Error;

use common::{auction_backend, deployer, uint};

const AUCTION: &str = "SecretMinBidAuction";

fn close_only() -> LifecycleFlags {
    LifecycleFlags { close: true, finalize: false }
}

fn finalize_only() -> LifecycleFlags {
    LifecycleFlags { close: false, finalize: true }
}

#[tokio::test]
async fn test_close_skipped_without_bids() {
    let backend = auction_backend(true, false, 0);

    let report = run_lifecycle(&backend, AUCTION, deployer(), close_only()).await.unwrap();

    assert_eq!(report.close, Some(StepOutcome::Skipped(SkipReason::NoBids)));
    assert!(SkipReason::NoBids.is_warning());
    assert!(report.finalize.is_none());
    assert!(backend.executed().await.is_empty());
}

#[tokio::test]
async fn test_close_when_already_closed_is_info_noop() {
    let backend = auction_backend(false, false, 4);

    let outcome = lifecycle::close(&backend, AUCTION, deployer()).await.unwrap();

    assert_eq!(outcome, StepOutcome::Skipped(SkipReason::AlreadyClosed));
    assert!(!SkipReason::AlreadyClosed.is_warning());
    // the participant count is not consulted once bidding is closed
    assert_eq!(backend.reads().await, vec!["biddingOpen"]);
    assert!(backend.executed().await.is_empty());
}

#[tokio::test]
async fn test_close_executes_with_bids() {
    let backend = auction_backend(true, false, 2);

    let outcome = lifecycle::close(&backend, AUCTION, deployer()).await.unwrap();

    assert!(outcome.is_executed());
    assert_eq!(backend.executed().await, vec!["closeBidding"]);
    assert!(!backend.read_bool(AUCTION, "biddingOpen").await.unwrap());
}

#[tokio::test]
async fn test_finalize_executes_exactly_once_when_closed() {
    let backend = auction_backend(false, false, 3);

    let report = run_lifecycle(&backend, AUCTION, deployer(), finalize_only()).await.unwrap();

    assert!(report.close.is_none());
    assert!(matches!(report.finalize, Some(StepOutcome::Executed(_))));
    assert_eq!(backend.executed().await, vec!["finalize"]);
}

#[tokio::test]
async fn test_finalize_skipped_while_open_regardless_of_participants() {
    for participants in [0, 1, 50] {
        let backend = auction_backend(true, false, participants);

        let report = run_lifecycle(&backend, AUCTION, deployer(), finalize_only()).await.unwrap();

        assert_eq!(report.finalize, Some(StepOutcome::Skipped(SkipReason::StillOpen)));
        assert!(SkipReason::StillOpen.to_string().contains("still open"));
        assert!(backend.executed().await.is_empty());
    }
}

#[tokio::test]
async fn test_finalize_is_idempotent_skip() {
    let backend = auction_backend(false, false, 3);

    let first = lifecycle::finalize(&backend, AUCTION, deployer()).await.unwrap();
    let second = lifecycle::finalize(&backend, AUCTION, deployer()).await.unwrap();

    assert!(first.is_executed());
    assert_eq!(second, StepOutcome::Skipped(SkipReason::AlreadyFinalized));
    assert!(!SkipReason::AlreadyFinalized.is_warning());
    assert_eq!(backend.executed().await, vec!["finalize"]);
}

#[tokio::test]
async fn test_finalize_skipped_without_participants() {
    let backend = auction_backend(false, false, 0);

    let outcome = lifecycle::finalize(&backend, AUCTION, deployer()).await.unwrap();

    assert_eq!(outcome, StepOutcome::Skipped(SkipReason::NoParticipants));
    assert!(backend.executed().await.is_empty());
}

#[tokio::test]
async fn test_close_then_finalize_in_one_run() {
    let backend = auction_backend(true, false, 2);
    let flags = LifecycleFlags { close: true, finalize: true };

    let report = run_lifecycle(&backend, AUCTION, deployer(), flags).await.unwrap();

    assert!(report.close.as_ref().unwrap().is_executed());
    assert!(report.finalize.as_ref().unwrap().is_executed());
    assert_eq!(backend.executed().await, vec!["closeBidding", "finalize"]);
}

#[tokio::test]
async fn test_preconditions_are_read_fresh() {
    let backend = auction_backend(true, false, 0);

    let outcome = lifecycle::close(&backend, AUCTION, deployer()).await.unwrap();
    assert_eq!(outcome, StepOutcome::Skipped(SkipReason::NoBids));

    // a bid lands between runs
    backend.set_value("participantsCount", uint(1)).await;
    let outcome = lifecycle::close(&backend, AUCTION, deployer()).await.unwrap();
    assert!(outcome.is_executed());
}

#[tokio::test]
async fn test_no_flags_no_reads() {
    let backend = auction_backend(true, false, 2);

    let report = run_lifecycle(&backend, AUCTION, deployer(), LifecycleFlags::default())
        .await
        .unwrap();

    assert_eq!(report, Default::default());
    assert!(backend.reads().await.is_empty());
}

#[tokio::test]
async fn test_transaction_failure_propagates() {
    let backend = auction_backend(false, false, 3).with_failing_execute("finalize");

    let err = run_lifecycle(&backend, AUCTION, deployer(), finalize_only())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transaction { ref method, .. } if method == "finalize"));
}

#[tokio::test]
async fn test_wrong_value_type_is_an_error() {
    let backend = auction_backend(true, false, 1).with_value("biddingOpen", DynSolValue::String("yes".into()));

    let err = lifecycle::close(&backend, AUCTION, deployer()).await.unwrap_err();

    assert!(matches!(err, Error::UnexpectedValue { expected: "bool", .. }));
}
