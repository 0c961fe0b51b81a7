//! In-memory audience record store
//!
//! Pure business logic with no I/O dependencies. Ordering is newest first:
//! `create` prepends. Missing ids are never an error; `delete` and `patch`
//! simply report that nothing happened.

use shared::{Audience, AudienceEvent, AudienceId, AudiencePatch, AudienceSource, AudienceStats, AudienceStatus};

use crate::core::stats::compute_stats;
use crate::types::AudienceFilter;

/// Fields supplied by the create workflow; the store fills in the rest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAudience {
    pub name: String,
    pub source: AudienceSource,
    pub size: String,
    pub created: String,
}

/// Ordered collection of audiences owned by a single session
#[derive(Debug, Clone)]
pub struct AudienceStore {
    audiences: Vec<Audience>,
    next_id: u64,
}

impl AudienceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            audiences: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a store pre-populated with `audiences`, in the given order
    pub fn with_audiences(audiences: Vec<Audience>) -> Self {
        let next_id = audiences.iter().map(|a| a.id.0).max().map_or(1, |max| max + 1);
        Self { audiences, next_id }
    }

    pub fn list(&self) -> &[Audience] {
        &self.audiences
    }

    pub fn len(&self) -> usize {
        self.audiences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.audiences.is_empty()
    }

    pub fn get(&self, id: AudienceId) -> Option<&Audience> {
        self.audiences.iter().find(|a| a.id == id)
    }

    pub fn contains(&self, id: AudienceId) -> bool {
        self.get(id).is_some()
    }

    /// Audiences matching `filter`, in store order
    pub fn filter(&self, filter: &AudienceFilter) -> Vec<Audience> {
        self.audiences
            .iter()
            .filter(|a| filter.matches(&a.name, a.status))
            .cloned()
            .collect()
    }

    /// Ids of audiences still waiting for activation
    pub fn processing_ids(&self) -> Vec<AudienceId> {
        self.ids_with_status(AudienceStatus::Processing)
    }

    /// Ids of audiences eligible for reach updates
    pub fn active_ids(&self) -> Vec<AudienceId> {
        self.ids_with_status(AudienceStatus::Active)
    }

    fn ids_with_status(&self, status: AudienceStatus) -> Vec<AudienceId> {
        self.audiences
            .iter()
            .filter(|a| a.status == status)
            .map(|a| a.id)
            .collect()
    }

    /// Insert a new audience at the front with `processing` status and no reach
    pub fn create(&mut self, draft: NewAudience) -> Audience {
        let audience = Audience {
            id: AudienceId(self.next_id),
            name: draft.name,
            source: draft.source,
            size: draft.size,
            created: draft.created,
            status: AudienceStatus::Processing,
            reach: 0,
        };
        self.next_id += 1;
        self.audiences.insert(0, audience.clone());
        audience
    }

    /// Remove an audience. Returns the removed record, or `None` if absent.
    pub fn delete(&mut self, id: AudienceId) -> Option<Audience> {
        let index = self.audiences.iter().position(|a| a.id == id)?;
        Some(self.audiences.remove(index))
    }

    /// Merge `patch` into the matching audience.
    ///
    /// Returns the event describing a visible status or reach change. Absent
    /// ids and patches that change nothing visible yield `None`.
    pub fn patch(&mut self, id: AudienceId, patch: &AudiencePatch) -> Option<AudienceEvent> {
        let audience = self.audiences.iter_mut().find(|a| a.id == id)?;
        let before = audience.clone();
        if !audience.apply_patch(patch) {
            return None;
        }
        AudienceEvent::from_change(&before, audience)
    }

    /// Add `delta` to the reach of an active audience
    pub fn bump_reach(&mut self, id: AudienceId, delta: u64) -> Option<AudienceEvent> {
        let current = self.get(id).filter(|a| a.status == AudienceStatus::Active)?.reach;
        self.patch(id, &AudiencePatch::reach(current.saturating_add(delta)))
    }

    pub fn stats(&self) -> AudienceStats {
        compute_stats(&self.audiences)
    }
}

impl Default for AudienceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::seed_audiences;
    use crate::types::StatusFilter;
    use shared::AudienceEventKind;

    fn draft(name: &str) -> NewAudience {
        NewAudience {
            name: name.to_string(),
            source: AudienceSource::CustomerList,
            size: "5%".to_string(),
            created: "Oct 18, 2026".to_string(),
        }
    }

    #[test]
    fn test_create_defaults_and_prepends() {
        let mut store = AudienceStore::new();
        let first = store.create(draft("First"));
        let second = store.create(draft("Test Audience"));

        assert_eq!(second.status, AudienceStatus::Processing);
        assert_eq!(second.reach, 0);
        assert_ne!(first.id, second.id);
        assert_eq!(store.list()[0].id, second.id, "newest audience comes first");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_ids_continue_after_seed() {
        let mut store = AudienceStore::with_audiences(seed_audiences());
        let created = store.create(draft("Fresh"));
        assert_eq!(created.id, AudienceId(6));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = AudienceStore::new();
        let a = store.create(draft("a"));
        store.delete(a.id);
        let b = store.create(draft("b"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_length_tracks_creates_minus_deletes() {
        let mut store = AudienceStore::new();
        let ids: Vec<_> = (0..5).map(|i| store.create(draft(&format!("a{i}"))).id).collect();

        assert!(store.delete(ids[1]).is_some());
        assert!(store.delete(ids[3]).is_some());
        // Second delete of the same id and an unknown id are no-ops
        assert!(store.delete(ids[1]).is_none());
        assert!(store.delete(AudienceId(999)).is_none());

        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_patch_missing_id_is_noop() {
        let mut store = AudienceStore::with_audiences(seed_audiences());
        let before = store.list().to_vec();

        assert!(store.patch(AudienceId(42), &AudiencePatch::activate(10)).is_none());
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_patch_activation_emits_status_change() {
        let mut store = AudienceStore::new();
        let audience = store.create(draft("Test Audience"));

        let event = store.patch(audience.id, &AudiencePatch::activate(1_234_567)).unwrap();
        assert!(matches!(
            event.kind,
            AudienceEventKind::StatusChange { status: AudienceStatus::Active, reach: 1_234_567 }
        ));

        let stored = store.get(audience.id).unwrap();
        assert_eq!(stored.status, AudienceStatus::Active);
        assert_eq!(stored.reach, 1_234_567);

        // Activation is one-way
        assert!(store.patch(audience.id, &AudiencePatch::status(AudienceStatus::Processing)).is_none());
        assert_eq!(store.get(audience.id).unwrap().status, AudienceStatus::Active);
    }

    #[test]
    fn test_patch_name_changes_without_event() {
        let mut store = AudienceStore::new();
        let audience = store.create(draft("Old"));
        let patch = AudiencePatch {
            name: Some("New".to_string()),
            ..Default::default()
        };

        assert!(store.patch(audience.id, &patch).is_none());
        assert_eq!(store.get(audience.id).unwrap().name, "New");
    }

    #[test]
    fn test_bump_reach_only_for_active() {
        let mut store = AudienceStore::with_audiences(seed_audiences());

        let event = store.bump_reach(AudienceId(1), 5_000).unwrap();
        assert!(matches!(event.kind, AudienceEventKind::ReachUpdate { reach: 2_505_000 }));

        // Id 4 is still processing
        assert!(store.bump_reach(AudienceId(4), 5_000).is_none());
        assert_eq!(store.get(AudienceId(4)).unwrap().reach, 0);
    }

    #[test]
    fn test_filter_and_status_ids() {
        let store = AudienceStore::with_audiences(seed_audiences());

        assert_eq!(store.processing_ids(), vec![AudienceId(4), AudienceId(5)]);
        assert_eq!(store.active_ids().len(), 3);

        let lookalikes = store.filter(&AudienceFilter::search("lookalike"));
        assert_eq!(lookalikes.len(), 3);

        let processing = store.filter(&AudienceFilter::status(StatusFilter::Processing));
        assert!(processing.iter().all(|a| a.status == AudienceStatus::Processing));
        assert_eq!(processing.len(), 2);
    }
}
