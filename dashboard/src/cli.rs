//! Command line interface
//!
//! `serve` runs the HTTP dashboard; the other subcommands run the CSV and
//! export pipelines once against local files and the seeded store.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use shared::{Audience, AudienceId, ProcessId, process_warn};

use crate::config::{DEFAULT_BIND_ADDRESS, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_OUTPUT_DIR, DashboardConfig, LifecycleTiming};
use crate::core::csv_import::READ_FAILURE_MESSAGE;
use crate::core::export::{export_audience_report, export_audiences, export_comparison};
use crate::core::templates::template_artifact;
use crate::core::{display_cell, validate_csv_bytes};
use crate::error::DashboardResult;
use crate::traits::ExportWriter;
use crate::types::{CsvValidation, ExportFormat, TemplateType};

const BYTES_PER_MB: usize = 1024 * 1024;

/// Lookalike audience dashboard
#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(about = "Create, compare and export lookalike audiences")]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP dashboard (default)
    Serve(ServeArgs),

    /// Validate a customer-list CSV and print the result as JSON
    Validate {
        /// CSV file to check
        file: PathBuf,
    },

    /// Write a CSV template
    Template {
        #[arg(value_enum)]
        kind: TemplateType,

        /// Directory to write into
        #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,
    },

    /// Export audiences, a report or a comparison from the seeded store
    Export(ExportArgs),
}

impl Command {
    pub fn process_id(&self) -> &'static ProcessId {
        match self {
            Command::Serve(_) => ProcessId::init_dashboard(),
            _ => ProcessId::init_cli(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address for the HTTP server
    #[arg(long, default_value = DEFAULT_BIND_ADDRESS)]
    pub bind: SocketAddr,

    /// Shortest simulated processing time
    #[arg(long, default_value_t = LifecycleTiming::default().activation_delay_min_ms)]
    pub activation_delay_min_ms: u64,

    /// Longest simulated processing time
    #[arg(long, default_value_t = LifecycleTiming::default().activation_delay_max_ms)]
    pub activation_delay_max_ms: u64,

    /// Period of the live reach updates
    #[arg(long, default_value_t = LifecycleTiming::default().perturb_interval_ms)]
    pub perturb_interval_ms: u64,

    /// Chance that a live update tick changes an audience
    #[arg(long, default_value_t = LifecycleTiming::default().perturb_probability)]
    pub perturb_probability: f64,

    /// Largest accepted upload in megabytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES / BYTES_PER_MB)]
    pub max_upload_mb: usize,

    /// Start with an empty store instead of the fixture audiences
    #[arg(long)]
    pub no_seed: bool,
}

impl Default for ServeArgs {
    fn default() -> Self {
        let config = DashboardConfig::default();
        Self {
            bind: config.bind_address,
            activation_delay_min_ms: config.lifecycle.activation_delay_min_ms,
            activation_delay_max_ms: config.lifecycle.activation_delay_max_ms,
            perturb_interval_ms: config.lifecycle.perturb_interval_ms,
            perturb_probability: config.lifecycle.perturb_probability,
            max_upload_mb: config.max_upload_bytes / BYTES_PER_MB,
            no_seed: !config.seed_fixtures,
        }
    }
}

impl From<&ServeArgs> for DashboardConfig {
    fn from(args: &ServeArgs) -> Self {
        Self {
            bind_address: args.bind,
            lifecycle: LifecycleTiming {
                activation_delay_min_ms: args.activation_delay_min_ms,
                activation_delay_max_ms: args.activation_delay_max_ms,
                perturb_interval_ms: args.perturb_interval_ms,
                perturb_probability: args.perturb_probability,
                ..LifecycleTiming::default()
            },
            max_upload_bytes: args.max_upload_mb.saturating_mul(BYTES_PER_MB),
            seed_fixtures: !args.no_seed,
        }
    }
}

/// What the export command produces
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    Audiences,
    Report,
    Comparison,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[arg(value_enum)]
    pub target: ExportTarget,

    /// csv, or pdf for a printable HTML document
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// Audience for `report`
    #[arg(long)]
    pub id: Option<u64>,

    /// First audience of a comparison
    #[arg(long)]
    pub first: Option<u64>,

    /// Second audience of a comparison
    #[arg(long)]
    pub second: Option<u64>,

    /// Add match, engagement and conversion rates to the audience CSV
    #[arg(long)]
    pub include_performance: bool,

    /// Directory to write into
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,
}

/// Read and validate a CSV file. Unreadable files are reported, not raised.
pub async fn run_validate(path: &Path) -> CsvValidation {
    match tokio::fs::read(path).await {
        Ok(bytes) => validate_csv_bytes(&bytes),
        Err(e) => {
            process_warn!(ProcessId::current(), "Could not read {}: {}", path.display(), e);
            CsvValidation::failed(READ_FAILURE_MESSAGE)
        }
    }
}

/// Shorten preview values for terminal output
pub fn preview_for_display(validation: CsvValidation) -> CsvValidation {
    CsvValidation {
        preview: validation
            .preview
            .map(|rows| rows.into_iter().map(|row| row.map_values(display_cell)).collect()),
        ..validation
    }
}

/// Write the template for `kind`
pub async fn run_template<W>(kind: TemplateType, writer: &W) -> DashboardResult<PathBuf>
where
    W: ExportWriter,
{
    writer.write_artifact(&template_artifact(kind)).await
}

/// Run the export pipeline over `audiences` and write the artifact
pub async fn run_export<W>(args: &ExportArgs, audiences: &[Audience], writer: &W, date: NaiveDate) -> DashboardResult<PathBuf>
where
    W: ExportWriter,
{
    let find = |id: Option<u64>| id.and_then(|id| audiences.iter().find(|a| a.id == AudienceId(id)));

    let artifact = match args.target {
        ExportTarget::Audiences => export_audiences(audiences, args.include_performance, args.format, date)?,
        ExportTarget::Report => export_audience_report(find(args.id), date)?,
        ExportTarget::Comparison => export_comparison(find(args.first), find(args.second), args.format, date)?,
    };

    writer.write_artifact(&artifact).await
}
