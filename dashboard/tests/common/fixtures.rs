//! Test fixtures for dashboard integration tests

use serde_json::{Value, json};

use dashboard::{DashboardConfig, LifecycleTiming};

pub const VALID_CSV: &str = "MADID,Email\nMAD001,john@example.com\nMAD002,jane@example.com\n";

/// Configuration whose timers never fire during a test
pub fn quiet_config() -> DashboardConfig {
    DashboardConfig {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        lifecycle: LifecycleTiming {
            activation_delay_min_ms: 60_000,
            activation_delay_max_ms: 60_000,
            perturb_interval_ms: 60_000,
            ..LifecycleTiming::default()
        },
        ..DashboardConfig::default()
    }
}

/// Configuration with millisecond-scale processing
pub fn fast_config() -> DashboardConfig {
    DashboardConfig {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        lifecycle: LifecycleTiming {
            activation_delay_min_ms: 30,
            activation_delay_max_ms: 60,
            perturb_interval_ms: 25,
            perturb_probability: 1.0,
            ..LifecycleTiming::default()
        },
        ..DashboardConfig::default()
    }
}

pub fn customer_list_body(name: &str) -> Value {
    json!({
        "name": name,
        "source": "Customer List",
        "size_percent": 5.0,
        "upload": {
            "file_name": "customers.csv",
            "content": VALID_CSV,
        },
    })
}

pub fn lookalike_body(name: &str, list: &str, size: f64) -> Value {
    json!({
        "name": name,
        "source": "Lookalike Audience",
        "size_percent": size,
        "customer_list_id": list,
    })
}
