//! Deterministic record normalization.
//!
//! Runs before validation, so rejection messages, duplicate checks, and
//! storage all see the same shape. Normalizing an already-normalized record
//! yields an identical record.

use userload_model::{CandidateRecord, NormalizedRecord};

/// Normalize a candidate record.
///
/// Name and surname are trimmed and title-cased per whitespace-separated
/// word; the email is trimmed and lowercased entirely. No validation is
/// performed here.
#[must_use]
pub fn normalize(record: &CandidateRecord) -> NormalizedRecord {
    NormalizedRecord {
        name: title_case(record.name.trim()),
        surname: title_case(record.surname.trim()),
        email: record.email.trim().to_lowercase(),
    }
}

/// Lowercase the input, then uppercase the first letter of each
/// whitespace-separated word. Internal whitespace is preserved as-is.
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for ch in value.chars() {
        if ch.is_whitespace() {
            out.push(ch);
            at_word_start = true;
        } else if at_word_start {
            out.push(single_char(ch, ch.to_uppercase()));
            at_word_start = false;
        } else {
            out.push(single_char(ch, ch.to_lowercase()));
        }
    }
    out
}

// Multi-char case mappings ('ß' -> "SS") are left untouched: expanding them
// would make the transform non-idempotent.
fn single_char(original: char, mut mapped: impl Iterator<Item = char>) -> char {
    match (mapped.next(), mapped.next()) {
        (Some(ch), None) => ch,
        _ => original,
    }
}
