//! Tests for the LifecycleDriver

use super::helpers::{create_empty_state, create_test_state, fast_timing, frozen_timing, wait_for_condition};
use crate::core::NewAudience;
use crate::services::LifecycleDriver;
use crate::services::lifecycle::claim_pending;
use shared::{AudienceEventKind, AudienceId, AudienceSource, AudienceStatus};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn draft(name: &str) -> NewAudience {
    NewAudience {
        name: name.to_string(),
        source: AudienceSource::CustomerList,
        size: "5%".to_string(),
        created: "Oct 18, 2026".to_string(),
    }
}

#[tokio::test]
async fn test_activation_fires_after_delay() {
    let state = create_empty_state();
    let driver = LifecycleDriver::new(state.clone(), fast_timing());
    let audience = state.create(draft("Timed")).await;
    let mut events = state.subscribe();

    driver.schedule_activation(audience.id);
    assert_eq!(driver.pending_count(), 1);

    let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("activation within timeout")
        .unwrap();
    match event.kind {
        AudienceEventKind::StatusChange { status, reach } => {
            assert_eq!(status, AudienceStatus::Active);
            assert!((500_000..=3_000_000).contains(&reach));
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(driver.pending_count(), 0);
}

#[tokio::test]
async fn test_activation_of_missing_audience_is_noop() {
    let state = create_empty_state();
    let driver = LifecycleDriver::new(state.clone(), fast_timing());

    driver.schedule_activation(AudienceId(42));
    let pending = &driver;
    let drained = wait_for_condition(|| async move { pending.pending_count() == 0 }, 1_000).await;

    assert!(drained);
    assert!(state.list().await.is_empty());
    assert!(state.last_update().await.is_none());
}

#[tokio::test]
async fn test_cancel_prevents_activation() {
    let state = create_empty_state();
    let driver = LifecycleDriver::new(state.clone(), fast_timing());
    let audience = state.create(draft("Cancelled")).await;

    driver.schedule_activation(audience.id);
    assert!(driver.cancel(audience.id));
    assert!(!driver.cancel(audience.id));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(state.get(audience.id).await.unwrap().status, AudienceStatus::Processing);
}

#[tokio::test]
async fn test_perturb_once_bumps_an_active_audience() {
    let state = create_test_state();
    let driver = LifecycleDriver::new(state.clone(), frozen_timing());
    let before = state.stats().await.total_reach;

    // Zero deltas produce no event; retry until one lands
    let mut event = None;
    for _ in 0..20 {
        event = driver.perturb_once().await;
        if event.is_some() {
            break;
        }
    }
    let event = event.expect("some perturbation should change reach");

    assert!(matches!(event.kind, AudienceEventKind::ReachUpdate { .. }));
    let target = state.get(event.audience_id).await.unwrap();
    assert_eq!(target.status, AudienceStatus::Active);
    assert!(state.stats().await.total_reach > before);
    assert!(state.last_update().await.is_some());
}

#[tokio::test]
async fn test_perturbation_never_touches_processing() {
    let state = create_test_state();
    let driver = LifecycleDriver::new(state.clone(), frozen_timing());

    for _ in 0..50 {
        driver.perturb_once().await;
    }
    assert_eq!(state.get(AudienceId(4)).await.unwrap().reach, 0);
    assert_eq!(state.get(AudienceId(5)).await.unwrap().reach, 0);
}

#[tokio::test]
async fn test_live_loop_runs_until_shutdown() {
    let state = create_test_state();
    let driver = LifecycleDriver::new(state.clone(), fast_timing());

    driver.start_live_updates();
    driver.start_live_updates();
    assert!(driver.is_running());

    let observed = &state;
    let updated = wait_for_condition(|| async move { observed.last_update().await.is_some() }, 2_000).await;
    assert!(updated, "live loop should update reach");

    driver.shutdown().await;
    assert!(!driver.is_running());
    assert!(!state.is_live());

    // Nothing is scheduled once torn down
    let reach_after = state.stats().await.total_reach;
    driver.schedule_activation(AudienceId(4));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(driver.pending_count(), 0);
    assert_eq!(state.stats().await.total_reach, reach_after);
}

#[test]
fn test_superseded_timer_leaves_replacement_pending() {
    let id = AudienceId(4);
    let pending = Mutex::new(HashMap::new());

    // First schedule, then a reschedule that cancels it before it claims
    let first = CancellationToken::new();
    pending.lock().unwrap().insert(id, first.clone());
    let second = CancellationToken::new();
    if let Some(previous) = pending.lock().unwrap().insert(id, second.clone()) {
        previous.cancel();
    }

    assert!(!claim_pending(&pending, id, &first));
    assert!(pending.lock().unwrap().contains_key(&id), "replacement must stay cancellable");

    assert!(claim_pending(&pending, id, &second));
    assert!(pending.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_rescheduled_activation_still_cancellable() {
    let state = create_empty_state();
    let driver = LifecycleDriver::new(state.clone(), fast_timing());
    let audience = state.create(draft("Twice")).await;

    driver.schedule_activation(audience.id);
    driver.schedule_activation(audience.id);
    assert_eq!(driver.pending_count(), 1);

    assert!(driver.cancel(audience.id));
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(state.get(audience.id).await.unwrap().status, AudienceStatus::Processing);
    assert_eq!(driver.pending_count(), 0);
}
