//! Dashboard configuration
//!
//! All tunables with their production defaults. The `serve` command builds
//! this from CLI flags; tests construct it directly with short timings.

use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::error::{DashboardError, DashboardResult};

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_OUTPUT_DIR: &str = "./exports";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Timings and ranges of the simulated processing backend
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleTiming {
    pub activation_delay_min_ms: u64,
    pub activation_delay_max_ms: u64,
    pub activation_reach_min: u64,
    pub activation_reach_max: u64,
    pub perturb_interval_ms: u64,
    /// Chance that a perturbation tick actually updates an audience
    pub perturb_probability: f64,
    pub perturb_delta_max: u64,
}

impl Default for LifecycleTiming {
    fn default() -> Self {
        Self {
            activation_delay_min_ms: 3_000,
            activation_delay_max_ms: 5_000,
            activation_reach_min: 500_000,
            activation_reach_max: 3_000_000,
            perturb_interval_ms: 10_000,
            perturb_probability: 0.3,
            perturb_delta_max: 10_000,
        }
    }
}

impl LifecycleTiming {
    pub fn activation_delay_ms(&self) -> RangeInclusive<u64> {
        self.activation_delay_min_ms..=self.activation_delay_max_ms
    }

    pub fn activation_reach(&self) -> RangeInclusive<u64> {
        self.activation_reach_min..=self.activation_reach_max
    }

    pub fn perturb_interval(&self) -> Duration {
        Duration::from_millis(self.perturb_interval_ms)
    }

    pub fn validate(&self) -> DashboardResult<()> {
        if self.activation_delay_min_ms > self.activation_delay_max_ms {
            return Err(DashboardError::config(format!(
                "activation delay range is inverted: {}..{} ms",
                self.activation_delay_min_ms, self.activation_delay_max_ms
            )));
        }
        // Active audiences must end up with a positive reach
        if self.activation_reach_min == 0 || self.activation_reach_min > self.activation_reach_max {
            return Err(DashboardError::config(format!(
                "activation reach range must be positive and ordered: {}..{}",
                self.activation_reach_min, self.activation_reach_max
            )));
        }
        if self.perturb_interval_ms == 0 {
            return Err(DashboardError::config("perturbation interval must be non-zero"));
        }
        if !(0.0..=1.0).contains(&self.perturb_probability) {
            return Err(DashboardError::config(format!(
                "perturbation probability must be within [0, 1], got {}",
                self.perturb_probability
            )));
        }
        Ok(())
    }
}

/// Top-level dashboard configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub bind_address: SocketAddr,
    pub lifecycle: LifecycleTiming,
    pub max_upload_bytes: usize,
    /// Start with the fixture audiences
    pub seed_fixtures: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8080)),
            lifecycle: LifecycleTiming::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            seed_fixtures: true,
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> DashboardResult<()> {
        if self.max_upload_bytes == 0 {
            return Err(DashboardError::config("maximum upload size must be non-zero"));
        }
        self.lifecycle.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address.to_string(), DEFAULT_BIND_ADDRESS);
        assert_eq!(config.lifecycle.activation_delay_ms(), 3_000..=5_000);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_rejects_inverted_ranges() {
        let mut config = DashboardConfig::default();
        config.lifecycle.activation_delay_min_ms = 6_000;
        assert!(matches!(config.validate(), Err(DashboardError::Config(_))));

        let mut config = DashboardConfig::default();
        config.lifecycle.activation_reach_min = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_probability() {
        let mut config = DashboardConfig::default();
        config.lifecycle.perturb_probability = 1.5;
        assert!(config.validate().is_err());

        config.lifecycle.perturb_probability = f64::NAN;
        assert!(config.validate().is_err());
    }
}
