//! Message types published by the dashboard
//!
//! - `updates`: live audience change events pushed to connected clients

pub mod updates;

pub use updates::{AudienceEvent, AudienceEventKind};
