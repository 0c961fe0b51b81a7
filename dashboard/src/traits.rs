//! Service trait definitions for dependency injection
//!
//! All I/O operations are abstracted through these traits for testability

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::broadcast;

use shared::{Audience, AudienceEvent, AudienceId, AudiencePatch};

use crate::error::DashboardResult;
use crate::types::{AudienceFilter, CreateAudienceRequest, DashboardStats, ExportArtifact, UploadReceipt, UploadedFile};

/// Storage collaborator that receives customer-list uploads
#[mockall::automock]
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Hand over an uploaded file for the named audience
    async fn store_upload(&self, audience_name: &str, file: &UploadedFile) -> DashboardResult<UploadReceipt>;
}

/// Delivery target for generated exports
#[mockall::automock]
#[async_trait]
pub trait ExportWriter: Send + Sync {
    /// Persist an artifact and return where it was written
    async fn write_artifact(&self, artifact: &ExportArtifact) -> DashboardResult<PathBuf>;
}

/// Audience management service owning the session store
#[mockall::automock]
#[async_trait]
pub trait AudienceService: Send + Sync {
    /// All audiences, newest first
    async fn list(&self) -> Vec<Audience>;

    /// Audiences matching a name search and status filter
    async fn list_filtered(&self, filter: &AudienceFilter) -> Vec<Audience>;

    async fn get(&self, id: AudienceId) -> Option<Audience>;

    /// Validate, upload and insert a new audience, then schedule its activation
    async fn create(&self, request: CreateAudienceRequest) -> DashboardResult<Audience>;

    /// Remove an audience and cancel its pending activation. Returns whether it existed.
    async fn delete(&self, id: AudienceId) -> bool;

    /// Merge user edits into an audience
    async fn patch(&self, id: AudienceId, patch: AudiencePatch) -> Option<Audience>;

    /// Derived statistics plus live-update channel state
    async fn stats(&self) -> DashboardStats;

    /// Subscribe to store mutations
    fn subscribe(&self) -> broadcast::Receiver<AudienceEvent>;

    /// Run one live update immediately
    async fn force_update(&self) -> Option<AudienceEvent>;

    /// Cancel all pending timers and stop live updates
    async fn shutdown(&self);
}
