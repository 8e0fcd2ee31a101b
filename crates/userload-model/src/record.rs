//! Record shapes passed between pipeline stages.

/// One non-header line of the source file, split into fields.
///
/// Carries no structure of its own: rows may be short, over-long, or blank.
pub type RawRow = Vec<String>;

/// A structurally complete record taken verbatim from a [`RawRow`].
///
/// Fields are untrimmed and un-cased; only arity has been checked. Exists
/// transiently between parsing and normalization, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    pub name: String,
    pub surname: String,
    pub email: String,
}

/// A record after normalization: name/surname trimmed and title-cased,
/// email trimmed and lowercased.
///
/// Duplicate detection and storage operate on this shape only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub name: String,
    pub surname: String,
    pub email: String,
}
