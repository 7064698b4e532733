use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9()\-. ]{7,20}$").expect("phone pattern compiles")
});

/// Server-side checks on request payloads, run before anything touches the database.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

pub fn required(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(())
}

pub fn email(field: &str, value: Option<&str>) -> Result<(), AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) if !EMAIL_RE.is_match(v) => Err(AppError::BadRequest(format!(
            "{} must be a valid email address",
            field
        ))),
        _ => Ok(()),
    }
}

pub fn phone(field: &str, value: Option<&str>) -> Result<(), AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) if !PHONE_RE.is_match(v) => Err(AppError::BadRequest(format!(
            "{} must be a valid phone number",
            field
        ))),
        _ => Ok(()),
    }
}

pub fn percent(field: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(AppError::BadRequest(format!(
            "{} must be between 0 and 100",
            field
        )));
    }
    Ok(())
}

/// Upper bounds on money and quantities, so computed amounts stay finite.
pub const MAX_RATE: f64 = 1_000_000.0;
pub const MAX_QUANTITY: f64 = 100_000.0;
pub const MAX_AMOUNT: f64 = 100_000_000.0;

pub fn bounded(field: &str, value: Option<f64>, max: f64) -> Result<(), AppError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 || v > max => Err(AppError::BadRequest(format!(
            "{} must be between 0 and {}",
            field, max
        ))),
        _ => Ok(()),
    }
}

pub fn in_range(field: &str, value: Option<i64>, min: i64, max: i64) -> Result<(), AppError> {
    match value {
        Some(v) if v < min || v > max => Err(AppError::BadRequest(format!(
            "{} must be between {} and {}",
            field, min, max
        ))),
        _ => Ok(()),
    }
}

/// Blank optional strings are stored as NULL.
pub fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
