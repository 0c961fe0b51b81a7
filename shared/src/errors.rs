//! Shared error types for the audience dashboard

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Unknown audience status: {input}")]
    UnknownStatus { input: String },

    #[error("Unknown audience source: {input}")]
    UnknownSource { input: String },

    #[error("Invalid audience id: {input}")]
    InvalidAudienceId { input: String },

    #[error("Invalid audience size: {value}% (expected 1-10 in 0.5 steps)")]
    InvalidSize { value: f64 },

    #[error("Unknown template type: {input}")]
    UnknownTemplate { input: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
