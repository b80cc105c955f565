//! Contract Test: Failure Policy
//!
//! Every runtime failure is absorbed by the engine and logged at the
//! severity of its class:
//! - connection/HTTP errors, timeouts, redirect limits, invalid IPs → WARN
//! - anything unanticipated → ERROR
//!
//! If this test fails, an error class is either escalating or being logged
//! at the wrong severity.

mod common;

use common::*;
use twod_core::{CycleOutcome, ReconciliationEngine};

async fn run_one_cycle(step: Step) -> (CycleOutcome, LogCapture) {
    let discoverer = ScriptedDiscoverer::new([step]);
    let record = MockHostRecord::recording("203.0.113.4");
    let mut engine =
        ReconciliationEngine::new(Box::new(discoverer), Box::new(record.clone())).await;

    let logs = LogCapture::default();
    let outcome = {
        let _guard = logs.install();
        engine.cycle().await
    };

    assert!(record.updates().is_empty(), "failed discovery must not update");
    assert_eq!(engine.last_known_ip(), Some("203.0.113.4"));
    (outcome, logs)
}

#[tokio::test]
async fn transport_error_warns() {
    let (outcome, logs) = run_one_cycle(Step::Transport).await;

    assert_eq!(outcome, CycleOutcome::DiscoveryFailed);
    let warnings = logs.lines_at("WARN");
    assert_eq!(warnings.len(), 1, "{}", logs.contents());
    assert!(warnings[0].contains("Error while fetching external IP: connection refused"));
    assert!(logs.lines_at("ERROR").is_empty());
}

#[tokio::test]
async fn timeout_warns_with_configured_seconds() {
    let (outcome, logs) = run_one_cycle(Step::Timeout(16.0)).await;

    assert_eq!(outcome, CycleOutcome::DiscoveryFailed);
    let warnings = logs.lines_at("WARN");
    assert!(
        warnings.iter().any(|l| l.contains(
            "Failed fetching external IP: server did not respond within 16 seconds"
        )),
        "{}",
        logs.contents()
    );
}

#[tokio::test]
async fn redirect_limit_warns() {
    let (outcome, logs) = run_one_cycle(Step::Redirects).await;

    assert_eq!(outcome, CycleOutcome::DiscoveryFailed);
    assert!(
        logs.lines_at("WARN")
            .iter()
            .any(|l| l.contains("Failed fetching external IP: too many redirects")),
        "{}",
        logs.contents()
    );
}

#[tokio::test]
async fn unexpected_error_logs_error() {
    let (outcome, logs) = run_one_cycle(Step::Unexpected).await;

    assert_eq!(outcome, CycleOutcome::DiscoveryFailed);
    let errors = logs.lines_at("ERROR");
    assert_eq!(errors.len(), 1, "{}", logs.contents());
    assert!(errors[0].contains("Unexpected error while fetching external IP"));
    assert!(errors[0].contains("retrying at next interval"));
    assert!(logs.lines_at("WARN").is_empty());
}
