//! Per-row outcome classification.

use std::fmt;

use serde::Serialize;

/// Why the validator rejected a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    /// Name or surname is empty or contains characters other than letters
    /// and whitespace.
    InvalidName,
    /// Email is empty or fails the address syntax check.
    InvalidEmail,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName => write!(f, "invalid name"),
            Self::InvalidEmail => write!(f, "invalid email"),
        }
    }
}

/// Classification of one input row after pipeline processing.
///
/// Produced exactly once per row and used for reporting; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum RowOutcome {
    /// Row was accepted and written (or would have been, in a dry run).
    Inserted,
    /// A stored user with the same normalized email already exists.
    SkippedDuplicate,
    /// Row failed format validation.
    SkippedInvalid(RejectReason),
    /// Row had fewer than three usable fields.
    SkippedMalformed,
    /// A row-local storage failure; the run continues.
    Failed(String),
}

impl fmt::Display for RowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedInvalid(reason) => write!(f, "skipped: {reason}"),
            Self::SkippedDuplicate => write!(f, "skipped: duplicate email"),
            Self::SkippedMalformed => write!(f, "skipped: malformed row"),
            Self::Inserted => write!(f, "inserted"),
            Self::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_display() {
        assert_eq!(RowOutcome::Inserted.to_string(), "inserted");
        assert_eq!(
            RowOutcome::SkippedInvalid(RejectReason::InvalidEmail).to_string(),
            "skipped: invalid email"
        );
        assert_eq!(
            RowOutcome::SkippedMalformed.to_string(),
            "skipped: malformed row"
        );
    }

    #[test]
    fn outcome_serializes_with_kind_tag() {
        let json = serde_json::to_value(RowOutcome::SkippedInvalid(RejectReason::InvalidName))
            .unwrap();
        assert_eq!(json["kind"], "SkippedInvalid");
        assert_eq!(json["detail"], "InvalidName");
    }
}
