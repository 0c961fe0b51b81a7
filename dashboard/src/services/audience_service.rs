//! Audience management service
//!
//! Owns the session state, runs the create workflow (validate, upload,
//! insert, schedule) and keeps the lifecycle driver in step with deletes.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::broadcast;

use shared::{
    Audience, AudienceEvent, AudienceId, AudiencePatch, AudienceSource, ProcessId, format_size_percent, process_info,
    process_warn,
};

use crate::config::{DashboardConfig, LifecycleTiming};
use crate::core::{NewAudience, validate_create_request};
use crate::error::{DashboardError, DashboardResult};
use crate::services::lifecycle::LifecycleDriver;
use crate::state::DashboardState;
use crate::traits::{AudienceService, UploadStore};
use crate::types::{AudienceFilter, CreateAudienceRequest, DashboardStats, LiveStatus};

/// Display format of creation dates, e.g. `Jun 16, 2025`
const CREATED_DATE_FORMAT: &str = "%b %-d, %Y";

/// Real audience service implementation
pub struct RealAudienceService<U>
where
    U: UploadStore,
{
    state: Arc<DashboardState>,
    uploads: U,
    lifecycle: LifecycleDriver,
    max_upload_bytes: usize,
}

impl<U> RealAudienceService<U>
where
    U: UploadStore,
{
    pub fn new(state: Arc<DashboardState>, uploads: U, timing: LifecycleTiming, max_upload_bytes: usize) -> Self {
        let lifecycle = LifecycleDriver::new(state.clone(), timing);
        Self {
            state,
            uploads,
            lifecycle,
            max_upload_bytes,
        }
    }

    /// Build the service from configuration, seeding fixtures if enabled
    pub fn from_config(config: &DashboardConfig, uploads: U) -> Self {
        let state = if config.seed_fixtures {
            DashboardState::seeded()
        } else {
            DashboardState::empty()
        };
        Self::new(Arc::new(state), uploads, config.lifecycle.clone(), config.max_upload_bytes)
    }

    /// Schedule activation of seeded processing audiences and start live updates
    pub async fn start(&self) {
        let scheduled = self.lifecycle.schedule_processing().await;
        self.lifecycle.start_live_updates();
        process_info!(
            ProcessId::current(),
            "🚀 Audience service started ({} audiences, {} awaiting activation)",
            self.state.len().await,
            scheduled
        );
    }

    pub fn state(&self) -> &Arc<DashboardState> {
        &self.state
    }

    pub fn lifecycle(&self) -> &LifecycleDriver {
        &self.lifecycle
    }

    #[cfg(test)]
    pub(crate) fn uploads(&self) -> &U {
        &self.uploads
    }
}

#[async_trait]
impl<U> AudienceService for RealAudienceService<U>
where
    U: UploadStore + 'static,
{
    async fn list(&self) -> Vec<Audience> {
        self.state.list().await
    }

    async fn list_filtered(&self, filter: &AudienceFilter) -> Vec<Audience> {
        self.state.filter(filter).await
    }

    async fn get(&self, id: AudienceId) -> Option<Audience> {
        self.state.get(id).await
    }

    async fn create(&self, request: CreateAudienceRequest) -> DashboardResult<Audience> {
        let validation = validate_create_request(&request, self.max_upload_bytes);
        if !validation.is_valid() {
            return Err(DashboardError::Validation {
                errors: validation.errors,
            });
        }

        let size = format_size_percent(request.size_percent)?;
        let name = request.name.trim().to_string();

        if request.source == AudienceSource::CustomerList {
            if let Some(upload) = &request.upload {
                // A failed upload aborts the workflow before anything is stored
                if let Err(e) = self.uploads.store_upload(&name, upload).await {
                    process_warn!(ProcessId::current(), "Upload for audience '{}' failed: {}", name, e);
                    return Err(match e {
                        DashboardError::UploadFailed { .. } => e,
                        other => DashboardError::UploadFailed {
                            message: other.to_string(),
                        },
                    });
                }
            }
        }

        let audience = self
            .state
            .create(NewAudience {
                name,
                source: request.source,
                size,
                created: Utc::now().format(CREATED_DATE_FORMAT).to_string(),
            })
            .await;
        self.lifecycle.schedule_activation(audience.id);

        process_info!(
            ProcessId::current(),
            "➕ Created audience {} '{}' ({}, {})",
            audience.id,
            audience.name,
            audience.source,
            audience.size
        );
        Ok(audience)
    }

    async fn delete(&self, id: AudienceId) -> bool {
        self.lifecycle.cancel(id);
        let removed = self.state.delete(id).await;
        if let Some(audience) = &removed {
            process_info!(ProcessId::current(), "🗑️ Deleted audience {} '{}'", id, audience.name);
        }
        removed.is_some()
    }

    async fn patch(&self, id: AudienceId, patch: AudiencePatch) -> Option<Audience> {
        self.state.patch(id, &patch).await
    }

    async fn stats(&self) -> DashboardStats {
        DashboardStats {
            stats: self.state.stats().await,
            live: LiveStatus {
                is_connected: self.lifecycle.is_running(),
                last_update: self.state.last_update().await,
                pending_activations: self.lifecycle.pending_count(),
            },
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<AudienceEvent> {
        self.state.subscribe()
    }

    async fn force_update(&self) -> Option<AudienceEvent> {
        self.lifecycle.perturb_once().await
    }

    async fn shutdown(&self) {
        self.lifecycle.shutdown().await;
    }
}
