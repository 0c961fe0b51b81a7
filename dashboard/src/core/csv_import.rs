//! Customer-list CSV validation
//!
//! Naive comma splitting (no quoting support), a fixed required header set,
//! email shape checks on the first rows and a short preview. Problems are
//! reported as messages in the result, never as errors.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::{CsvRow, CsvValidation};

/// Columns every customer list must carry
pub const REQUIRED_HEADERS: [&str; 2] = ["MADID", "Email"];

/// Column whose values are checked for email shape
pub const EMAIL_HEADER: &str = "Email";

/// Number of data rows whose emails are checked
pub const EMAIL_CHECK_ROWS: usize = 5;

/// Number of data rows returned as preview
pub const PREVIEW_ROWS: usize = 3;

/// Preview cells longer than this are shortened for display
pub const DISPLAY_CELL_WIDTH: usize = 20;

pub const TOO_FEW_LINES_MESSAGE: &str = "CSV file must contain at least a header row and one data row";
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse CSV file. Please check the file format.";
pub const READ_FAILURE_MESSAGE: &str = "Failed to read the file. Please try again.";

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Whether `value` looks like `local@domain.tld` with no whitespace
pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Validate raw upload bytes. Undecodable content is a parse failure.
pub fn validate_csv_bytes(bytes: &[u8]) -> CsvValidation {
    match std::str::from_utf8(bytes) {
        Ok(text) => validate_csv(text),
        Err(_) => CsvValidation::failed(PARSE_FAILURE_MESSAGE),
    }
}

/// Validate decoded CSV text
pub fn validate_csv(text: &str) -> CsvValidation {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();

    if lines.len() < 2 {
        return CsvValidation::failed(TOO_FEW_LINES_MESSAGE);
    }

    let mut errors = Vec::new();
    let headers: Vec<String> = split_line(lines[0]);

    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h == required))
        .collect();
    if !missing.is_empty() {
        errors.push(format!("Missing required columns: {}", missing.join(", ")));
    }

    let data_rows: Vec<Vec<String>> = lines[1..]
        .iter()
        .take(EMAIL_CHECK_ROWS)
        .map(|line| split_line(line))
        .collect();

    if let Some(email_index) = headers.iter().position(|h| h == EMAIL_HEADER) {
        for (index, columns) in data_rows.iter().enumerate() {
            let Some(email) = columns.get(email_index).filter(|e| !e.is_empty()) else {
                continue;
            };
            if !is_valid_email(email) {
                // Row numbers count the header as row 1
                errors.push(format!("Invalid email format in row {}: {}", index + 2, email));
            }
        }
    }

    let preview = data_rows
        .iter()
        .take(PREVIEW_ROWS)
        .map(|columns| {
            CsvRow::new(
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| (header.clone(), columns.get(i).cloned().unwrap_or_default()))
                    .collect(),
            )
        })
        .collect();

    CsvValidation {
        valid: errors.is_empty(),
        errors,
        preview: Some(preview),
    }
}

fn split_line(line: &str) -> Vec<String> {
    line.split(',').map(|cell| cell.trim().to_string()).collect()
}

/// Shorten a preview value for display
pub fn display_cell(value: &str) -> String {
    if value.chars().count() > DISPLAY_CELL_WIDTH {
        let truncated: String = value.chars().take(DISPLAY_CELL_WIDTH).collect();
        format!("{truncated}...")
    } else {
        value.to_string()
    }
}
