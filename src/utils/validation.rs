use crate::utils::error::{CareError, Result};
use chrono::NaiveDate;

pub const FIELD_SEPARATOR: char = '|';

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(CareError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CareError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.iter().any(|a| a.eq_ignore_ascii_case(value)) {
        return Ok(());
    }
    Err(CareError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: format!("Valid values: {}", allowed.join(", ")),
    })
}

/// Text that ends up in a store field: non-blank, no separator, no newline.
pub fn validate_field_text(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CareError::InvalidField {
            field: field_name.to_string(),
            reason: "cannot be empty".to_string(),
        });
    }
    if value.contains(FIELD_SEPARATOR) {
        return Err(CareError::InvalidField {
            field: field_name.to_string(),
            reason: format!("cannot contain '{}'", FIELD_SEPARATOR),
        });
    }
    if value.contains(['\n', '\r']) {
        return Err(CareError::InvalidField {
            field: field_name.to_string(),
            reason: "cannot span multiple lines".to_string(),
        });
    }
    Ok(())
}

/// Strict `YYYY-MM-DD`. chrono alone accepts unpadded months and days.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn require_iso_date(value: &str) -> Result<NaiveDate> {
    parse_iso_date(value).ok_or_else(|| CareError::InvalidDate {
        value: value.trim().to_string(),
    })
}
