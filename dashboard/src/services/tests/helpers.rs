//! Test helpers for dashboard service tests

use std::sync::Arc;

use crate::config::LifecycleTiming;
use crate::state::DashboardState;

/// Millisecond-scale timings so lifecycle tests finish quickly
pub fn fast_timing() -> LifecycleTiming {
    LifecycleTiming {
        activation_delay_min_ms: 20,
        activation_delay_max_ms: 40,
        activation_reach_min: 500_000,
        activation_reach_max: 3_000_000,
        perturb_interval_ms: 20,
        perturb_probability: 1.0,
        perturb_delta_max: 1_000,
    }
}

/// Timings long enough that nothing fires during a test
pub fn frozen_timing() -> LifecycleTiming {
    LifecycleTiming {
        activation_delay_min_ms: 60_000,
        activation_delay_max_ms: 60_000,
        perturb_interval_ms: 60_000,
        ..LifecycleTiming::default()
    }
}

pub fn create_test_state() -> Arc<DashboardState> {
    Arc::new(DashboardState::seeded())
}

pub fn create_empty_state() -> Arc<DashboardState> {
    Arc::new(DashboardState::empty())
}

/// Poll `condition` every 10ms until it holds or `timeout_ms` elapses
pub async fn wait_for_condition<F, Fut>(mut condition: F, timeout_ms: u64) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);

    loop {
        if condition().await {
            return true;
        }

        if start.elapsed() > timeout {
            return false;
        }

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}
