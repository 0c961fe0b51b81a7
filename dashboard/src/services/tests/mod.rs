//! Service tests for the dashboard
//!
//! One module per service plus shared fixtures and helpers.

pub mod helpers;

mod export_writer;
mod lifecycle;
