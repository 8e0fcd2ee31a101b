//! Record format validation.
//!
//! Operates on normalized records only. Checks run in a fixed order (name,
//! surname, then email) and the first failing check determines the reported
//! reason, so exactly one reason is surfaced per record.

use std::sync::LazyLock;

use regex::Regex;

use userload_model::{NormalizedRecord, RejectReason};

/// One or more letters and/or whitespace characters.
static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\s]+$").expect("invalid name regex"));

/// Local part, "@", then a domain containing at least one dot. No embedded
/// whitespace anywhere. Deliverability is out of scope.
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// Check a normalized record against the name and email format rules.
///
/// # Errors
///
/// Returns the [`RejectReason`] of the first failing check. Pure function,
/// no side effects.
pub fn validate(record: &NormalizedRecord) -> Result<(), RejectReason> {
    if !is_valid_name(&record.name) || !is_valid_name(&record.surname) {
        return Err(RejectReason::InvalidName);
    }
    if !EMAIL_REGEX.is_match(&record.email) {
        return Err(RejectReason::InvalidEmail);
    }
    Ok(())
}

fn is_valid_name(value: &str) -> bool {
    // The regex alone would accept whitespace-only strings.
    !value.trim().is_empty() && NAME_REGEX.is_match(value)
}
