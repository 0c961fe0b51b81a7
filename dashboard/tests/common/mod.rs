//! Shared utilities for dashboard integration tests
#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;
