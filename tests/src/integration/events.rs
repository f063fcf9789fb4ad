//! # DevPhase and Contract Factory Scenarios
//!
//! The coupling between the transaction queue and the one-shot event
//! queue: instantiation resolves only when the chain reports the
//! contract live.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::timeout;

use chain_client::{ArgFilters, ChainEvent};
use devnet::{DevPhase, DevPhaseOptions, FactoryError};

use crate::support::mock_chain::MockChain;
use crate::support::SubmitOutcome;

const TEST_TIMEOUT: Duration = Duration::from_secs(10);

fn phase_over(chain: &Arc<MockChain>) -> DevPhase {
    let api: Arc<dyn chain_client::ChainApi> = chain.clone();
    DevPhase::setup(api, &DevPhaseOptions::default()).expect("phase setup")
}

#[tokio::test]
async fn test_phase_resolves_dev_accounts() {
    let chain = Arc::new(MockChain::new());
    let phase = phase_over(&chain);

    assert_eq!(phase.sudo().name, "alice");
    assert!(phase.accounts().get("ferdie").is_some());
    assert!(phase.accounts().get("mallory").is_none());
}

#[tokio::test]
async fn test_factory_deploy_submits_upload() {
    let chain = Arc::new(MockChain::new());
    let phase = phase_over(&chain);

    phase
        .contract_factory()
        .deploy(&[0x00, 0x61, 0x73, 0x6d], phase.sudo())
        .await
        .expect("deploy");

    let submissions = chain.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].extrinsic, "contracts.uploadCode");
    assert_eq!(submissions[0].signer, "alice");
}

#[tokio::test]
async fn test_factory_instantiate_waits_for_instantiated_event() {
    let chain = Arc::new(MockChain::new());
    chain.script(SubmitOutcome::in_block_with_events(vec![ChainEvent::new(
        "contracts",
        "Instantiating",
        vec![json!("0xc0ffee")],
    )]));
    let phase = phase_over(&chain);

    // The cluster reports the contract live shortly after inclusion.
    let emitter = chain.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        emitter.emit_events(vec![
            ChainEvent::new("contracts", "Instantiated", vec![json!("0xother")]),
            ChainEvent::new("contracts", "Instantiated", vec![json!("0xc0ffee")]),
        ]);
    });

    let contract_id = timeout(
        TEST_TIMEOUT,
        phase
            .contract_factory()
            .instantiate("0xhash", "new", 1, phase.sudo()),
    )
    .await
    .expect("timely")
    .expect("instantiated");

    assert_eq!(contract_id, "0xc0ffee");
}

#[tokio::test]
async fn test_factory_instantiate_requires_instantiating_event() {
    let chain = Arc::new(MockChain::new());
    // Inclusion succeeds but the expected event is missing.
    chain.script(SubmitOutcome::success());
    let phase = phase_over(&chain);

    let error = phase
        .contract_factory()
        .instantiate("0xhash", "new", 1, phase.sudo())
        .await
        .expect_err("missing event");

    assert!(matches!(error, FactoryError::MissingEvent(_)));
}

#[tokio::test]
async fn test_event_queue_survives_unrelated_traffic() {
    let chain = Arc::new(MockChain::new());
    let phase = phase_over(&chain);

    let waiter = phase
        .event_queue()
        .wait_for("phase.ClusterCreated", ArgFilters::new())
        .await;

    // Noise on other keys must not consume the registration.
    for _ in 0..5 {
        chain.emit_events(vec![ChainEvent::new("system", "NewAccount", vec![])]);
    }
    chain.emit_events(vec![ChainEvent::new(
        "phase",
        "ClusterCreated",
        vec![json!("0x01")],
    )]);

    let event = timeout(TEST_TIMEOUT, waiter)
        .await
        .expect("timely")
        .expect("matched");
    assert_eq!(event.args[0], json!("0x01"));
}

#[tokio::test]
async fn test_cleanup_stops_dispatch() {
    let chain = Arc::new(MockChain::new());
    let mut phase = phase_over(&chain);

    let waiter = phase
        .event_queue()
        .wait_for("phase.ClusterCreated", ArgFilters::new())
        .await;

    phase.cleanup();
    chain.emit_events(vec![ChainEvent::new("phase", "ClusterCreated", vec![])]);

    // The dispatch task is gone: the waiter never resolves.
    let result = timeout(Duration::from_millis(300), waiter).await;
    assert!(result.is_err(), "no dispatch after cleanup");
}
