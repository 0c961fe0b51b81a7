//! Core business logic modules
//!
//! Pure business logic with no I/O dependencies

pub mod csv_import;
pub mod export;
pub mod fixtures;
pub mod form;
pub mod stats;
pub mod store;
pub mod templates;

// Re-export commonly used types
pub use csv_import::{display_cell, validate_csv, validate_csv_bytes};
pub use form::validate_create_request;
pub use stats::compute_stats;
pub use store::{AudienceStore, NewAudience};
