//! Request validation. Failures are format errors and never reach storage.

use crate::error::AppError;
use crate::field::Field;
use regex::Regex;
use std::sync::OnceLock;

/// Default upper bound for free-text columns.
pub const MAX_TEXT: usize = 255;

pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"))
}

pub fn required(col: &str, v: &str) -> Result<(), AppError> {
    if v.trim().is_empty() {
        return Err(AppError::Format(format!("{} is required", col)));
    }
    max_length(col, v, MAX_TEXT)
}

pub fn max_length(col: &str, v: &str, max: usize) -> Result<(), AppError> {
    if v.chars().count() > max {
        return Err(AppError::Format(format!(
            "{} must be at most {} characters",
            col, max
        )));
    }
    Ok(())
}

pub fn uuid_format(col: &str, v: &str) -> Result<(), AppError> {
    if uuid::Uuid::parse_str(v).is_err() {
        return Err(AppError::Format(format!("{} must be a valid UUID", col)));
    }
    Ok(())
}

/// Empty string is accepted as "no value" for optional text such as email.
pub fn email(col: &str, v: &str) -> Result<(), AppError> {
    if !v.is_empty() && !email_regex().is_match(v) {
        return Err(AppError::Format(format!("{} must be a valid email", col)));
    }
    max_length(col, v, MAX_TEXT)
}

/// Lowercase hyphenated form of any UUID spelling `Uuid::parse_str` accepts.
pub fn canonical_uuid(col: &str, v: &str) -> Result<String, AppError> {
    uuid::Uuid::parse_str(v)
        .map(|u| u.hyphenated().to_string())
        .map_err(|_| AppError::Format(format!("{} must be a valid UUID", col)))
}

pub fn optional_uuid(col: &str, v: Option<&str>) -> Result<(), AppError> {
    match v {
        Some(s) => uuid_format(col, s),
        None => Ok(()),
    }
}

pub fn optional_email(col: &str, v: Option<&str>) -> Result<(), AppError> {
    match v {
        Some(s) => email(col, s),
        None => Ok(()),
    }
}

/// Present non-null text must be non-empty.
pub fn present_required(col: &str, f: &Field<String>) -> Result<(), AppError> {
    match f.as_present() {
        Some(v) => required(col, v),
        None => Ok(()),
    }
}

pub fn present_text(col: &str, f: &Field<String>) -> Result<(), AppError> {
    match f.as_present() {
        Some(v) => max_length(col, v, MAX_TEXT),
        None => Ok(()),
    }
}

pub fn present_optional_text(col: &str, f: &Field<Option<String>>) -> Result<(), AppError> {
    match f.as_present() {
        Some(v) => max_length(col, v.as_deref().unwrap_or(""), MAX_TEXT),
        None => Ok(()),
    }
}

pub fn present_uuid(col: &str, f: &Field<Option<String>>) -> Result<(), AppError> {
    match f.as_present() {
        Some(v) => optional_uuid(col, v.as_deref()),
        None => Ok(()),
    }
}

/// List filters allow at most one criterion.
pub fn single_criterion(criteria: &[(&str, Option<&str>)]) -> Result<(), AppError> {
    let present: Vec<&str> = criteria
        .iter()
        .filter(|(_, v)| v.is_some())
        .map(|(k, _)| *k)
        .collect();
    if present.len() > 1 {
        return Err(AppError::Format(format!(
            "only one filter may be given, got: {}",
            present.join(", ")
        )));
    }
    for (col, v) in criteria {
        if let Some(v) = v {
            required(col, v)?;
        }
    }
    Ok(())
}
