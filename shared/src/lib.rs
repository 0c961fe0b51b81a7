//! Shared types for the lookalike audience dashboard
//!
//! Contains the audience data model, live-update messages, error types and
//! the logging setup used by every binary in the workspace.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

pub use messages::{AudienceEvent, AudienceEventKind};
