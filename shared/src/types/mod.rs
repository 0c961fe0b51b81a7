//! Core types used throughout the dashboard system

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::errors::{SharedError, SharedResult};

/// Global process ID singleton - set once at startup
static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Process identifier used to tag log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    /// Long-running dashboard server
    Dashboard,
    /// One-shot command line invocation
    Cli,
}

impl ProcessId {
    /// Initialize the global process ID for the dashboard server
    pub fn init_dashboard() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Dashboard)
    }

    /// Initialize the global process ID for a CLI command
    pub fn init_cli() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Cli)
    }

    /// Get the global process ID, falling back to `Dashboard` when no
    /// binary initialised it (library use and tests)
    pub fn current() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Dashboard)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessId::Dashboard => write!(f, "dashboard"),
            ProcessId::Cli => write!(f, "cli"),
        }
    }
}

/// Opaque audience identifier, unique for the lifetime of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudienceId(pub u64);

impl fmt::Display for AudienceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AudienceId {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(AudienceId)
            .map_err(|_| SharedError::InvalidAudienceId { input: s.to_string() })
    }
}

/// Lifecycle status of an audience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudienceStatus {
    Processing,
    Active,
    Error,
}

impl AudienceStatus {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            AudienceStatus::Processing => "processing",
            AudienceStatus::Active => "active",
            AudienceStatus::Error => "error",
        }
    }

    /// Capitalised label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            AudienceStatus::Processing => "Processing",
            AudienceStatus::Active => "Active",
            AudienceStatus::Error => "Error",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// Only `processing` may change state, and never back to `processing`.
    pub fn can_transition_to(&self, next: AudienceStatus) -> bool {
        match (self, next) {
            (current, next) if *current == next => true,
            (AudienceStatus::Processing, AudienceStatus::Active) => true,
            (AudienceStatus::Processing, AudienceStatus::Error) => true,
            _ => false,
        }
    }
}

impl fmt::Display for AudienceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AudienceStatus {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "processing" => Ok(AudienceStatus::Processing),
            "active" => Ok(AudienceStatus::Active),
            "error" => Ok(AudienceStatus::Error),
            _ => Err(SharedError::UnknownStatus { input: s.to_string() }),
        }
    }
}

/// Where an audience was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudienceSource {
    #[serde(rename = "Customer List", alias = "customer-list")]
    CustomerList,
    #[serde(rename = "Lookalike Audience", alias = "lookalike-audience")]
    LookalikeAudience,
}

impl AudienceSource {
    /// Display name, also used in exports
    pub fn as_str(&self) -> &'static str {
        match self {
            AudienceSource::CustomerList => "Customer List",
            AudienceSource::LookalikeAudience => "Lookalike Audience",
        }
    }
}

impl fmt::Display for AudienceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AudienceSource {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customer list" | "customer-list" => Ok(AudienceSource::CustomerList),
            "lookalike audience" | "lookalike-audience" | "lookalike" => Ok(AudienceSource::LookalikeAudience),
            _ => Err(SharedError::UnknownSource { input: s.to_string() }),
        }
    }
}

/// Smallest selectable audience size, in percent
pub const MIN_SIZE_PERCENT: f64 = 1.0;
/// Largest selectable audience size, in percent
pub const MAX_SIZE_PERCENT: f64 = 10.0;
/// Size slider granularity, in percent
pub const SIZE_STEP_PERCENT: f64 = 0.5;

/// Render a size ratio as the percentage string stored on an audience.
///
/// Whole numbers drop the fraction (`5%`), half steps keep one digit (`5.5%`).
/// Values outside `[1, 10]` or off the 0.5 grid are rejected.
pub fn format_size_percent(value: f64) -> SharedResult<String> {
    let steps = value / SIZE_STEP_PERCENT;
    if !(MIN_SIZE_PERCENT..=MAX_SIZE_PERCENT).contains(&value) || (steps - steps.round()).abs() > f64::EPSILON {
        return Err(SharedError::InvalidSize { value });
    }

    if value.fract() == 0.0 {
        Ok(format!("{}%", value as u64))
    } else {
        Ok(format!("{value:.1}%"))
    }
}

/// A named marketing segment managed by the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audience {
    pub id: AudienceId,
    pub name: String,
    pub source: AudienceSource,
    /// Percentage string fixed at creation, e.g. `5%`
    pub size: String,
    /// Display-formatted creation date, e.g. `Jun 16, 2025`
    pub created: String,
    pub status: AudienceStatus,
    #[serde(default)]
    pub reach: u64,
}

impl Audience {
    /// Merge a patch into this audience.
    ///
    /// Status changes the lifecycle forbids are dropped, and reach is only
    /// accepted once the audience is active. Returns true if anything changed.
    pub fn apply_patch(&mut self, patch: &AudiencePatch) -> bool {
        let mut changed = false;

        if let Some(name) = &patch.name {
            if *name != self.name {
                self.name = name.clone();
                changed = true;
            }
        }

        if let Some(status) = patch.status {
            if status != self.status && self.status.can_transition_to(status) {
                self.status = status;
                changed = true;
            }
        }

        if let Some(reach) = patch.reach {
            if self.status == AudienceStatus::Active && reach != self.reach {
                self.reach = reach;
                changed = true;
            }
        }

        changed
    }
}

/// Partial update merged into an existing audience
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudiencePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AudienceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reach: Option<u64>,
}

impl AudiencePatch {
    pub fn status(status: AudienceStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }

    pub fn activate(reach: u64) -> Self {
        Self {
            status: Some(AudienceStatus::Active),
            reach: Some(reach),
            ..Default::default()
        }
    }

    pub fn reach(reach: u64) -> Self {
        Self { reach: Some(reach), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.status.is_none() && self.reach.is_none()
    }
}

/// Aggregates recomputed from the store on every read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceStats {
    pub total_reach: u64,
    pub processing: usize,
    pub active: usize,
    pub error: usize,
    pub total: usize,
}
