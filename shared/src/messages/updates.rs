//! Live audience updates
//!
//! Every store mutation is published as an `AudienceEvent`. Clients receive
//! them as JSON over the WebSocket stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Audience, AudienceId, AudienceStatus};

/// What changed
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AudienceEventKind {
    AudienceCreated { audience: Audience },
    AudienceDeleted,
    StatusChange { status: AudienceStatus, reach: u64 },
    ReachUpdate { reach: u64 },
}

/// A single change to the audience store
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AudienceEvent {
    pub audience_id: AudienceId,
    #[serde(flatten)]
    pub kind: AudienceEventKind,
    pub timestamp: DateTime<Utc>,
}

impl AudienceEvent {
    pub fn new(audience_id: AudienceId, kind: AudienceEventKind) -> Self {
        Self {
            audience_id,
            kind,
            timestamp: Utc::now(),
        }
    }

    pub fn created(audience: &Audience) -> Self {
        Self::new(audience.id, AudienceEventKind::AudienceCreated { audience: audience.clone() })
    }

    pub fn deleted(audience_id: AudienceId) -> Self {
        Self::new(audience_id, AudienceEventKind::AudienceDeleted)
    }

    /// Build the event describing how `before` became `after`, if anything
    /// visible changed
    pub fn from_change(before: &Audience, after: &Audience) -> Option<Self> {
        if before.status != after.status {
            Some(Self::new(
                after.id,
                AudienceEventKind::StatusChange {
                    status: after.status,
                    reach: after.reach,
                },
            ))
        } else if before.reach != after.reach {
            Some(Self::new(after.id, AudienceEventKind::ReachUpdate { reach: after.reach }))
        } else {
            None
        }
    }

    /// Whether this event came from the lifecycle rather than a user action
    pub fn is_live_update(&self) -> bool {
        matches!(
            self.kind,
            AudienceEventKind::StatusChange { .. } | AudienceEventKind::ReachUpdate { .. }
        )
    }
}
