//! Field validators shared by the write services
//!
//! Every check returns a field-level `AppError::Validation` so callers can
//! point the user at the offending input.

use crate::errors::{AppError, Result};
use regex_lite::Regex;
use sea_orm::prelude::Decimal;
use std::sync::LazyLock;
use validator::ValidateEmail;

static ISSN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}-[0-9]{3}[0-9xX]").expect("valid ISSN pattern"));

static DOI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"10.\d{4,9}/[-._;()/:a-zA-Z0-9]+").expect("valid DOI pattern"));

static ORCID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{4}-\d{4}-\d{3}(\d|X)$").expect("valid ORCID pattern"));

static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug pattern"));

/// Trimmed value, rejected when blank
pub fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::invalid(field, "This field cannot be blank."));
    }
    Ok(value.to_string())
}

/// Trimmed optional value; blank becomes `None`
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn issn(value: &str) -> Result<()> {
    if ISSN.is_match(value) {
        Ok(())
    } else {
        Err(AppError::invalid("issn", "Invalid ISSN format."))
    }
}

pub fn doi(value: &str) -> Result<()> {
    if DOI.is_match(value) {
        Ok(())
    } else {
        Err(AppError::invalid("doi", "Invalid DOI format."))
    }
}

pub fn orcid(value: &str) -> Result<()> {
    if ORCID.is_match(value) {
        Ok(())
    } else {
        Err(AppError::invalid("orcid", "Invalid ORCID format."))
    }
}

pub fn slug(value: &str) -> Result<()> {
    if SLUG.is_match(value) {
        Ok(())
    } else {
        Err(AppError::invalid(
            "slug",
            "Use only letters, digits, underscores or hyphens.",
        ))
    }
}

/// Optional e-mail address; blank is stored as an empty string
pub fn email(value: Option<String>) -> Result<String> {
    match blank_to_none(value) {
        Some(email) if email.validate_email() => Ok(email),
        Some(_) => Err(AppError::invalid("email", "Enter a valid email address.")),
        None => Ok(String::new()),
    }
}

pub fn non_negative_decimal(field: &str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::invalid(field, "The value must be greater than or equal to 0."));
    }
    Ok(())
}

pub fn non_negative(field: &str, value: i32) -> Result<()> {
    if value < 0 {
        return Err(AppError::invalid(field, "The value must be greater than or equal to 0."));
    }
    Ok(())
}
