//! Dashboard state management
//!
//! Owns the audience store for the session and publishes every mutation on
//! the update channel. All access goes through the methods below.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{RwLock, broadcast};

use shared::{Audience, AudienceEvent, AudienceId, AudiencePatch, AudienceStats};

use crate::core::fixtures::seed_audiences;
use crate::core::{AudienceStore, NewAudience};
use crate::types::AudienceFilter;

const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Core dashboard state
#[derive(Debug)]
pub struct DashboardState {
    store: RwLock<AudienceStore>,
    events: broadcast::Sender<AudienceEvent>,
    last_update: RwLock<Option<DateTime<Utc>>>,
    live_updates_running: AtomicBool,
}

impl DashboardState {
    pub fn new(store: AudienceStore) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            store: RwLock::new(store),
            events,
            last_update: RwLock::new(None),
            live_updates_running: AtomicBool::new(false),
        }
    }

    /// State holding the fixture audiences
    pub fn seeded() -> Self {
        Self::new(AudienceStore::with_audiences(seed_audiences()))
    }

    pub fn empty() -> Self {
        Self::new(AudienceStore::new())
    }

    pub async fn list(&self) -> Vec<Audience> {
        self.store.read().await.list().to_vec()
    }

    pub async fn filter(&self, filter: &AudienceFilter) -> Vec<Audience> {
        self.store.read().await.filter(filter)
    }

    pub async fn get(&self, id: AudienceId) -> Option<Audience> {
        self.store.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn processing_ids(&self) -> Vec<AudienceId> {
        self.store.read().await.processing_ids()
    }

    pub async fn active_ids(&self) -> Vec<AudienceId> {
        self.store.read().await.active_ids()
    }

    pub async fn stats(&self) -> AudienceStats {
        self.store.read().await.stats()
    }

    pub async fn create(&self, draft: NewAudience) -> Audience {
        let audience = self.store.write().await.create(draft);
        self.publish(AudienceEvent::created(&audience));
        audience
    }

    pub async fn delete(&self, id: AudienceId) -> Option<Audience> {
        let removed = self.store.write().await.delete(id)?;
        self.publish(AudienceEvent::deleted(id));
        Some(removed)
    }

    /// Apply a user edit. Returns the updated record, or `None` if absent.
    pub async fn patch(&self, id: AudienceId, patch: &AudiencePatch) -> Option<Audience> {
        let mut store = self.store.write().await;
        let event = store.patch(id, patch);
        let updated = store.get(id).cloned();
        drop(store);

        if let Some(event) = event {
            self.publish(event);
        }
        updated
    }

    /// Apply a patch coming from the simulated backend
    pub async fn apply_live_patch(&self, id: AudienceId, patch: &AudiencePatch) -> Option<AudienceEvent> {
        let event = self.store.write().await.patch(id, patch)?;
        self.record_live_update(&event).await;
        Some(event)
    }

    /// Increase the reach of an active audience as a live update
    pub async fn bump_reach(&self, id: AudienceId, delta: u64) -> Option<AudienceEvent> {
        let event = self.store.write().await.bump_reach(id, delta)?;
        self.record_live_update(&event).await;
        Some(event)
    }

    async fn record_live_update(&self, event: &AudienceEvent) {
        *self.last_update.write().await = Some(event.timestamp);
        self.publish(event.clone());
    }

    fn publish(&self, event: AudienceEvent) {
        // No subscribers is fine; events are fire-and-forget
        let _ = self.events.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AudienceEvent> {
        self.events.subscribe()
    }

    pub async fn last_update(&self) -> Option<DateTime<Utc>> {
        *self.last_update.read().await
    }

    pub fn is_live(&self) -> bool {
        self.live_updates_running.load(Ordering::Relaxed)
    }

    pub fn set_live(&self, running: bool) {
        self.live_updates_running.store(running, Ordering::Relaxed);
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::empty()
    }
}
