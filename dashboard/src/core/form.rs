//! Create-audience form validation
//!
//! Runs before any store mutation. Problems are collected as messages;
//! an empty list means the request may proceed.

use shared::{AudienceSource, format_size_percent};

use crate::core::csv_import::validate_csv;
use crate::core::fixtures::find_customer_list;
use crate::types::{CreateAudienceRequest, FormValidation};

/// Longest accepted audience name, in characters
pub const MAX_NAME_CHARS: usize = 100;

pub const NAME_REQUIRED_MESSAGE: &str = "Audience name is required";
pub const NAME_TOO_LONG_MESSAGE: &str = "Audience name must be less than 100 characters";
pub const UPLOAD_REQUIRED_MESSAGE: &str = "Please upload a CSV file";
pub const CUSTOMER_LIST_REQUIRED_MESSAGE: &str = "Please select a source customer list";
pub const INVALID_SIZE_MESSAGE: &str = "Audience size must be between 1% and 10% in 0.5% steps";
pub const NOT_CSV_MESSAGE: &str = "Only .csv files are accepted";

const BYTES_PER_MB: usize = 1024 * 1024;

fn file_too_large_message(max_upload_bytes: usize) -> String {
    format!("File exceeds the {}MB limit", max_upload_bytes / BYTES_PER_MB)
}

/// Validate a create request against the form rules and, for customer-list
/// audiences, the uploaded file contents
pub fn validate_create_request(request: &CreateAudienceRequest, max_upload_bytes: usize) -> FormValidation {
    let mut result = FormValidation::default();

    let name = request.name.trim();
    if name.is_empty() {
        result.errors.push(NAME_REQUIRED_MESSAGE.to_string());
    } else if name.chars().count() > MAX_NAME_CHARS {
        result.errors.push(NAME_TOO_LONG_MESSAGE.to_string());
    }

    match request.source {
        AudienceSource::CustomerList => match &request.upload {
            None => result.errors.push(UPLOAD_REQUIRED_MESSAGE.to_string()),
            Some(upload) => {
                if !upload.file_name.to_lowercase().ends_with(".csv") {
                    result.errors.push(NOT_CSV_MESSAGE.to_string());
                } else if upload.size_bytes() > max_upload_bytes {
                    result.errors.push(file_too_large_message(max_upload_bytes));
                } else {
                    let csv = validate_csv(&upload.content);
                    result.errors.extend(csv.errors.iter().cloned());
                    result.csv = Some(csv);
                }
            }
        },
        AudienceSource::LookalikeAudience => {
            let known = request.customer_list_id.as_deref().and_then(find_customer_list).is_some();
            if !known {
                result.errors.push(CUSTOMER_LIST_REQUIRED_MESSAGE.to_string());
            }
        }
    }

    if format_size_percent(request.size_percent).is_err() {
        result.errors.push(INVALID_SIZE_MESSAGE.to_string());
    }

    result
}
