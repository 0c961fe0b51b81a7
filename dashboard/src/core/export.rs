//! Export pipeline: CSV and printable HTML serializers
//!
//! Serializers are pure functions over already-loaded data. The `export_*`
//! entry points add the precondition checks and file naming and return an
//! `ExportArtifact` that callers deliver (HTTP download or file write).

use chrono::NaiveDate;
use std::borrow::Cow;
use std::fmt::Write as _;

use shared::Audience;

use crate::core::fixtures::{self, CONVERSION_RATE, ENGAGEMENT_RATE, MATCH_RATE};
use crate::error::{DashboardError, DashboardResult};
use crate::types::{ComparisonMetric, ComparisonPoint, ExportArtifact, ExportFormat, PerformancePoint};

const AUDIENCE_HEADERS: [&str; 7] = ["ID", "Name", "Source", "Size", "Status", "Created", "Reach"];
const PERFORMANCE_HEADERS: [&str; 3] = ["Match Rate", "Engagement Rate", "Conversion Rate"];

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Abbreviate large counts: `999`, `1.5K`, `2.1M`
pub fn format_number(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

/// One decimal with an explicit `+` for positive values: `+13.5`, `-5.6`
pub fn format_signed(value: f64) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{sign}{value:.1}")
}

/// Signed percentage: `+13.5%`, `-5.6%`, `0.0%`
pub fn format_percentage(value: f64) -> String {
    format!("{}%", format_signed(value))
}

/// Thousands-separated integer: `2,500,000`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Metric value as shown in comparisons: rates as `87.3%`, counts abbreviated
pub fn format_metric_value(metric: &ComparisonMetric, value: f64) -> String {
    if metric.is_rate() {
        format!("{value}%")
    } else {
        format_number(value.max(0.0).round() as u64)
    }
}

/// Quote a CSV field when it contains a separator, quote or line break
pub fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn csv_line<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = Cow<'a, str>>,
{
    fields.into_iter().collect::<Vec<_>>().join(",")
}

/// Entity-escape text interpolated into HTML
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// CSV serializers
// ---------------------------------------------------------------------------

/// Header row plus one row per audience
pub fn audiences_csv(audiences: &[Audience], include_performance: bool) -> String {
    let mut headers: Vec<&str> = AUDIENCE_HEADERS.to_vec();
    if include_performance {
        headers.extend(PERFORMANCE_HEADERS);
    }

    let mut lines = vec![csv_line(headers.into_iter().map(Cow::Borrowed))];
    for audience in audiences {
        let mut fields: Vec<Cow<'_, str>> = vec![
            Cow::Owned(audience.id.to_string()),
            csv_field(&audience.name),
            csv_field(audience.source.as_str()),
            csv_field(&audience.size),
            Cow::Borrowed(audience.status.as_str()),
            csv_field(&audience.created),
            Cow::Owned(format_number(audience.reach)),
        ];
        if include_performance {
            fields.extend([MATCH_RATE, ENGAGEMENT_RATE, CONVERSION_RATE].map(Cow::Borrowed));
        }
        lines.push(csv_line(fields));
    }
    lines.join("\n")
}

/// Timeline rows; empty input yields empty output
pub fn performance_csv(rows: &[PerformancePoint]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut lines = vec!["Date,Reach,Engagement,Conversions".to_string()];
    lines.extend(rows.iter().map(|row| {
        csv_line([
            csv_field(&row.date),
            Cow::Owned(row.reach.to_string()),
            Cow::Owned(row.engagement.to_string()),
            Cow::Owned(row.conversions.to_string()),
        ])
    }));
    lines.join("\n")
}

/// `Metric,<name1>,<name2>,Difference (%),Trend` plus one line per metric
pub fn comparison_csv(first: &Audience, second: &Audience, metrics: &[ComparisonMetric]) -> String {
    let mut lines = vec![csv_line([
        Cow::Borrowed("Metric"),
        csv_field(&first.name),
        csv_field(&second.name),
        Cow::Borrowed("Difference (%)"),
        Cow::Borrowed("Trend"),
    ])];

    for metric in metrics {
        lines.push(csv_line([
            csv_field(&metric.metric),
            Cow::Owned(format_metric_value(metric, metric.first)),
            Cow::Owned(format_metric_value(metric, metric.second)),
            Cow::Owned(format_signed(metric.difference)),
            Cow::Owned(metric.trend.to_string()),
        ]));
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// HTML serializers
// ---------------------------------------------------------------------------

const REPORT_STYLE: &str = "
      body { font-family: 'Open Sans', Arial, sans-serif; margin: 40px; color: #374151; line-height: 1.6; }
      .header { border-bottom: 3px solid #00997B; padding-bottom: 20px; margin-bottom: 30px; }
      .title { font-size: 28px; font-weight: bold; color: #00997B; margin: 0; }
      .subtitle { color: #6B7280; margin: 5px 0; }
      .metrics-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin: 30px 0; }
      .metric-card { background: #F9FAFB; padding: 20px; border-radius: 8px; border-left: 4px solid #00997B; }
      .metric-label { font-size: 14px; color: #6B7280; margin-bottom: 5px; }
      .metric-value { font-size: 24px; font-weight: bold; color: #111827; }
      .section { margin: 40px 0; }
      .section-title { font-size: 20px; font-weight: 600; color: #111827; margin-bottom: 15px; }
      .table { width: 100%; border-collapse: collapse; margin: 20px 0; }
      .table th, .table td { border: 1px solid #E5E7EB; padding: 12px; text-align: left; }
      .table th { background: #F9FAFB; font-weight: 600; }
      .trend-up { color: #059669; }
      .trend-down { color: #DC2626; }
      .trend-stable { color: #6B7280; }
      .footer { margin-top: 50px; padding-top: 20px; border-top: 1px solid #E5E7EB; font-size: 12px; color: #6B7280; }
      .status-badge { display: inline-block; padding: 4px 12px; border-radius: 12px; font-size: 12px; font-weight: 500; }
      .status-active { background: #D1FAE5; color: #065F46; }
      .status-processing { background: #FEF3C7; color: #92400E; }
      .status-error { background: #FEE2E2; color: #991B1B; }
";

fn report_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

fn open_document(out: &mut String, title: &str, heading: &str, generated_on: NaiveDate) {
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>{title}</title>\n  <style>{REPORT_STYLE}  </style>\n</head>\n<body>\n  <div class=\"header\">\n    <h1 class=\"title\">{heading}</h1>\n    <div class=\"subtitle\">Generated on {date}</div>\n  </div>\n",
        title = escape_html(title),
        heading = escape_html(heading),
        date = report_date(generated_on),
    );
}

fn close_document(out: &mut String) {
    out.push_str(
        "  <div class=\"footer\">\n    <p>This report was generated automatically by the Audience Management System.</p>\n    <p>For questions or support, please contact your system administrator.</p>\n  </div>\n</body>\n</html>\n",
    );
}

fn status_badge(audience: &Audience) -> String {
    format!(
        "<span class=\"status-badge status-{}\">{}</span>",
        audience.status.as_str(),
        audience.status.label()
    )
}

fn metric_card(out: &mut String, label: &str, value: &str) {
    let _ = write!(
        out,
        "      <div class=\"metric-card\">\n        <div class=\"metric-label\">{}</div>\n        <div class=\"metric-value\">{}</div>\n      </div>\n",
        escape_html(label),
        escape_html(value)
    );
}

/// Printable single-audience report: overview, key metrics, performance table
pub fn audience_report_html(audience: &Audience, timeline: &[PerformancePoint], generated_on: NaiveDate) -> String {
    let mut out = String::new();
    open_document(
        &mut out,
        &format!("Audience Report - {}", audience.name),
        "Audience Performance Report",
        generated_on,
    );

    let _ = write!(
        out,
        "  <div class=\"section\">\n    <h2 class=\"section-title\">Audience Overview</h2>\n    <table class=\"table\">\n      <tr><td><strong>Audience Name</strong></td><td>{name}</td></tr>\n      <tr><td><strong>Source</strong></td><td>{source}</td></tr>\n      <tr><td><strong>Size</strong></td><td>{size}</td></tr>\n      <tr><td><strong>Status</strong></td><td>{badge}</td></tr>\n      <tr><td><strong>Created</strong></td><td>{created}</td></tr>\n    </table>\n  </div>\n",
        name = escape_html(&audience.name),
        source = escape_html(audience.source.as_str()),
        size = escape_html(&audience.size),
        badge = status_badge(audience),
        created = escape_html(&audience.created),
    );

    out.push_str("  <div class=\"section\">\n    <h2 class=\"section-title\">Key Performance Metrics</h2>\n    <div class=\"metrics-grid\">\n");
    metric_card(&mut out, "Total Reach", &format_thousands(audience.reach));
    metric_card(&mut out, "Match Rate", MATCH_RATE);
    metric_card(&mut out, "Engagement Rate", ENGAGEMENT_RATE);
    metric_card(&mut out, "Conversion Rate", CONVERSION_RATE);
    out.push_str("    </div>\n  </div>\n");

    out.push_str("  <div class=\"section\">\n    <h2 class=\"section-title\">Performance Data</h2>\n    <table class=\"table\">\n      <thead>\n        <tr><th>Date</th><th>Reach</th><th>Engagement</th><th>Conversions</th></tr>\n      </thead>\n      <tbody>\n");
    for row in timeline {
        let _ = writeln!(
            out,
            "        <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&row.date),
            format_thousands(row.reach),
            format_thousands(row.engagement),
            format_thousands(row.conversions)
        );
    }
    out.push_str("      </tbody>\n    </table>\n  </div>\n");

    close_document(&mut out);
    out
}

/// Printable two-audience comparison: overview, metrics, performance table
pub fn comparison_report_html(
    first: &Audience,
    second: &Audience,
    metrics: &[ComparisonMetric],
    timeline: &[ComparisonPoint],
    generated_on: NaiveDate,
) -> String {
    let mut out = String::new();
    open_document(
        &mut out,
        &format!("Audience Comparison - {} vs {}", first.name, second.name),
        "Audience Comparison Report",
        generated_on,
    );

    let first_name = escape_html(&first.name);
    let second_name = escape_html(&second.name);

    let _ = write!(
        out,
        "  <div class=\"section\">\n    <h2 class=\"section-title\">Audience Overview</h2>\n    <table class=\"table\">\n      <thead>\n        <tr><th></th><th>{first_name}</th><th>{second_name}</th></tr>\n      </thead>\n      <tbody>\n"
    );
    let overview_rows: [(&str, String, String); 5] = [
        ("Source", escape_html(first.source.as_str()), escape_html(second.source.as_str())),
        ("Size", escape_html(&first.size), escape_html(&second.size)),
        ("Status", status_badge(first), status_badge(second)),
        ("Created", escape_html(&first.created), escape_html(&second.created)),
        ("Reach", format_thousands(first.reach), format_thousands(second.reach)),
    ];
    for (label, a, b) in overview_rows {
        let _ = writeln!(out, "        <tr><td><strong>{label}</strong></td><td>{a}</td><td>{b}</td></tr>");
    }
    out.push_str("      </tbody>\n    </table>\n  </div>\n");

    let _ = write!(
        out,
        "  <div class=\"section\">\n    <h2 class=\"section-title\">Key Metrics Comparison</h2>\n    <table class=\"table\">\n      <thead>\n        <tr><th>Metric</th><th>{first_name}</th><th>{second_name}</th><th>Difference</th><th>Trend</th></tr>\n      </thead>\n      <tbody>\n"
    );
    for metric in metrics {
        let _ = writeln!(
            out,
            "        <tr><td>{}</td><td>{}</td><td>{}</td><td class=\"trend-{trend}\">{}</td><td class=\"trend-{trend}\">{trend}</td></tr>",
            escape_html(&metric.metric),
            escape_html(&format_metric_value(metric, metric.first)),
            escape_html(&format_metric_value(metric, metric.second)),
            format_percentage(metric.difference),
            trend = metric.trend,
        );
    }
    out.push_str("      </tbody>\n    </table>\n  </div>\n");

    let _ = write!(
        out,
        "  <div class=\"section\">\n    <h2 class=\"section-title\">Performance Over Time</h2>\n    <table class=\"table\">\n      <thead>\n        <tr><th>Date</th><th>{first_name}</th><th>{second_name}</th></tr>\n      </thead>\n      <tbody>\n"
    );
    for point in timeline {
        let _ = writeln!(
            out,
            "        <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&point.date),
            point.first,
            point.second
        );
    }
    out.push_str("      </tbody>\n    </table>\n  </div>\n");

    close_document(&mut out);
    out
}

// ---------------------------------------------------------------------------
// File naming
// ---------------------------------------------------------------------------

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Replace characters that cannot appear in a file name
pub fn sanitize_filename_component(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

pub fn audiences_export_filename(date: NaiveDate) -> String {
    format!("audiences-export-{}.csv", iso_date(date))
}

pub fn audience_report_filename(name: &str, date: NaiveDate) -> String {
    format!("audience-report-{}-{}.pdf", sanitize_filename_component(name), iso_date(date))
}

pub fn comparison_filename(format: ExportFormat, date: NaiveDate) -> String {
    let extension = match format {
        ExportFormat::Csv => "csv",
        ExportFormat::Pdf => "pdf",
    };
    format!("audience-comparison-{}.{extension}", iso_date(date))
}

// ---------------------------------------------------------------------------
// Pipeline entry points
// ---------------------------------------------------------------------------

/// Export the audience list. CSV covers every audience; the printable
/// format reports on the first one.
pub fn export_audiences(
    audiences: &[Audience],
    include_performance: bool,
    format: ExportFormat,
    date: NaiveDate,
) -> DashboardResult<ExportArtifact> {
    let first = audiences.first().ok_or_else(|| DashboardError::nothing_to_export("No audiences available to export"))?;

    match format {
        ExportFormat::Csv => Ok(ExportArtifact::csv(
            audiences_export_filename(date),
            audiences_csv(audiences, include_performance),
        )),
        ExportFormat::Pdf => export_audience_report(Some(first), date),
    }
}

/// Export the printable report of one selected audience
pub fn export_audience_report(audience: Option<&Audience>, date: NaiveDate) -> DashboardResult<ExportArtifact> {
    let audience = audience.ok_or_else(|| DashboardError::nothing_to_export("Select an audience to export"))?;

    Ok(ExportArtifact::html(
        audience_report_filename(&audience.name, date),
        audience_report_html(audience, &fixtures::performance_timeline(), date),
    ))
}

/// Export a comparison of two distinct selected audiences
pub fn export_comparison(
    first: Option<&Audience>,
    second: Option<&Audience>,
    format: ExportFormat,
    date: NaiveDate,
) -> DashboardResult<ExportArtifact> {
    let (Some(first), Some(second)) = (first, second) else {
        return Err(DashboardError::nothing_to_export("Select two audiences to compare"));
    };
    if first.id == second.id {
        return Err(DashboardError::nothing_to_export("Select two different audiences to compare"));
    }

    let metrics = fixtures::comparison_metrics();
    let filename = comparison_filename(format, date);
    Ok(match format {
        ExportFormat::Csv => ExportArtifact::csv(filename, comparison_csv(first, second, &metrics)),
        ExportFormat::Pdf => ExportArtifact::html(
            filename,
            comparison_report_html(first, second, &metrics, &fixtures::comparison_timeline(), date),
        ),
    })
}
