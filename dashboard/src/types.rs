//! Type definitions for the dashboard
//!
//! Data types, enums and request/response structs used by the dashboard that
//! are not service traits.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use shared::{AudienceId, AudienceSource, AudienceStatus, SharedError};

/// Default slider position for new audiences, in percent
pub const DEFAULT_SIZE_PERCENT: f64 = 5.0;

fn default_size_percent() -> f64 {
    DEFAULT_SIZE_PERCENT
}

/// A customer list file handed over by the browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub file_name: String,
    /// Decoded file text
    pub content: String,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }
}

/// Input of the create-audience workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAudienceRequest {
    pub name: String,
    pub source: AudienceSource,
    #[serde(default = "default_size_percent")]
    pub size_percent: f64,
    /// Seed list for lookalike audiences
    #[serde(default)]
    pub customer_list_id: Option<String>,
    /// Required for customer-list audiences
    #[serde(default)]
    pub upload: Option<UploadedFile>,
}

impl CreateAudienceRequest {
    pub fn customer_list(name: impl Into<String>, upload: UploadedFile) -> Self {
        Self {
            name: name.into(),
            source: AudienceSource::CustomerList,
            size_percent: DEFAULT_SIZE_PERCENT,
            customer_list_id: None,
            upload: Some(upload),
        }
    }

    pub fn lookalike(name: impl Into<String>, customer_list_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: AudienceSource::LookalikeAudience,
            size_percent: DEFAULT_SIZE_PERCENT,
            customer_list_id: Some(customer_list_id.into()),
            upload: None,
        }
    }

    pub fn with_size(mut self, size_percent: f64) -> Self {
        self.size_percent = size_percent;
        self
    }
}

/// Receipt returned by the upload collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub file_name: String,
    pub size_bytes: usize,
    pub stored_at: DateTime<Utc>,
}

/// Status filter of the audience list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Processing,
    Error,
}

impl StatusFilter {
    pub fn matches(&self, status: AudienceStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == AudienceStatus::Active,
            StatusFilter::Processing => status == AudienceStatus::Processing,
            StatusFilter::Error => status == AudienceStatus::Error,
        }
    }
}

/// Listing query: name search plus status filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudienceFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: StatusFilter,
}

impl AudienceFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            status: StatusFilter::All,
        }
    }

    pub fn status(status: StatusFilter) -> Self {
        Self { search: None, status }
    }

    /// Case-insensitive name match combined with the status filter
    pub fn matches(&self, name: &str, status: AudienceStatus) -> bool {
        let name_matches = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => name.to_lowercase().contains(&term.to_lowercase()),
            _ => true,
        };
        name_matches && self.status.matches(status)
    }
}

/// One data row of an uploaded CSV, keyed by header in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRow {
    cells: Vec<(String, String)>,
}

impl CsvRow {
    pub fn new(cells: Vec<(String, String)>) -> Self {
        Self { cells }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, value)| value.as_str())
    }

    /// Rewrite every value, keeping headers and column order
    pub fn map_values<F>(self, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        let cells = self
            .cells
            .into_iter()
            .map(|(header, value)| {
                let value = f(&value);
                (header, value)
            })
            .collect();
        Self { cells }
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for CsvRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (header, value) in &self.cells {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

/// Outcome of validating an uploaded CSV
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CsvValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Vec<CsvRow>>,
}

impl CsvValidation {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![message.into()],
            preview: None,
        }
    }
}

/// Outcome of validating a create-audience request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormValidation {
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<CsvValidation>,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A seed list a lookalike audience can be expanded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CustomerList {
    pub id: &'static str,
    pub name: &'static str,
    pub users: &'static str,
}

/// One point of a single-audience performance timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub date: String,
    pub reach: u64,
    pub engagement: u64,
    pub conversions: u64,
}

/// Direction of a comparison metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// One metric compared across two audiences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetric {
    pub metric: String,
    pub first: f64,
    pub second: f64,
    /// Signed difference in percent
    pub difference: f64,
    pub trend: Trend,
}

impl ComparisonMetric {
    /// Rates render as plain percentages, everything else as a count
    pub fn is_rate(&self) -> bool {
        self.metric.contains("Rate") || self.metric.contains("Engagement") || self.metric.contains("Conversion")
    }
}

/// One point of the two-audience performance timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonPoint {
    pub date: String,
    pub first: u32,
    pub second: u32,
}

/// CSV template variants offered for download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateType {
    CustomerList,
    Lookalike,
}

impl TemplateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::CustomerList => "customer-list",
            TemplateType::Lookalike => "lookalike",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TemplateType {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customer-list" | "customer_list" => Ok(TemplateType::CustomerList),
            "lookalike" | "lookalike-audience" => Ok(TemplateType::Lookalike),
            _ => Err(SharedError::UnknownTemplate { input: s.to_string() }),
        }
    }
}

/// Export output format. `Pdf` produces a printable HTML document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Pdf,
}

/// A generated download: file name, MIME type and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8";
pub const HTML_CONTENT_TYPE: &str = "text/html;charset=utf-8";

impl ExportArtifact {
    pub fn csv(filename: impl Into<String>, body: String) -> Self {
        Self {
            filename: filename.into(),
            content_type: CSV_CONTENT_TYPE,
            body,
        }
    }

    pub fn html(filename: impl Into<String>, body: String) -> Self {
        Self {
            filename: filename.into(),
            content_type: HTML_CONTENT_TYPE,
            body,
        }
    }
}

/// Live-update channel state shown next to the stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LiveStatus {
    pub is_connected: bool,
    pub last_update: Option<DateTime<Utc>>,
    pub pending_activations: usize,
}

/// Body of `/api/stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    #[serde(flatten)]
    pub stats: shared::AudienceStats,
    #[serde(flatten)]
    pub live: LiveStatus,
}

/// Map an id lookup to the audience ids of a two-way comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSelection {
    pub first: Option<AudienceId>,
    pub second: Option<AudienceId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matches_name_and_status() {
        let filter = AudienceFilter::search("LOYAL");
        assert!(filter.matches("Loyal Customers Lookalike", AudienceStatus::Active));
        assert!(!filter.matches("New Customer Lookalike", AudienceStatus::Active));

        let filter = AudienceFilter {
            search: Some("lookalike".to_string()),
            status: StatusFilter::Processing,
        };
        assert!(filter.matches("New Customer Lookalike", AudienceStatus::Processing));
        assert!(!filter.matches("Loyal Customers Lookalike", AudienceStatus::Active));

        // Blank search matches everything
        assert!(AudienceFilter::search("   ").matches("anything", AudienceStatus::Error));
    }

    #[test]
    fn test_csv_row_serializes_in_header_order() {
        let row = CsvRow::new(vec![
            ("MADID".to_string(), "MAD1".to_string()),
            ("Email".to_string(), "a@b.co".to_string()),
        ]);

        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"MADID":"MAD1","Email":"a@b.co"}"#);
        assert_eq!(row.get("Email"), Some("a@b.co"));
        assert_eq!(row.get("Phone"), None);
    }

    #[test]
    fn test_create_request_defaults() {
        let request: CreateAudienceRequest = serde_json::from_str(
            r#"{"name":"Test Audience","source":"customer-list","upload":{"file_name":"a.csv","content":"x"}}"#,
        )
        .unwrap();

        assert_eq!(request.source, AudienceSource::CustomerList);
        assert_eq!(request.size_percent, DEFAULT_SIZE_PERCENT);
        assert!(request.customer_list_id.is_none());
    }

    #[test]
    fn test_template_type_parsing() {
        assert_eq!("customer-list".parse::<TemplateType>().unwrap(), TemplateType::CustomerList);
        assert_eq!("Lookalike".parse::<TemplateType>().unwrap(), TemplateType::Lookalike);
        assert!("other".parse::<TemplateType>().is_err());
    }
}
