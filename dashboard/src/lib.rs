//! Lookalike audience dashboard
//!
//! Creates, lists, compares and exports marketing audiences held in an
//! in-memory session store. A simulated backend activates new audiences
//! after a delay and streams live reach updates to WebSocket clients.

pub mod cli;
pub mod config;
pub mod core;
pub mod dashboard_impl;
pub mod error;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;
pub mod web;

// Re-export main types
pub use config::{DashboardConfig, LifecycleTiming};
pub use dashboard_impl::Dashboard;
pub use error::{DashboardError, DashboardResult};
pub use state::DashboardState;
pub use types::*;

// Re-export trait definitions
pub use traits::{AudienceService, ExportWriter, UploadStore};

// Re-export service implementations
pub use services::{LifecycleDriver, RealAudienceService, RealExportWriter, SimulatedUploadStore};
