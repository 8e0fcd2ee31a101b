//! The storage seam the pipeline depends on.

use async_trait::async_trait;

use userload_model::NormalizedRecord;

use crate::error::Result;

/// What happened to an attempted insert.
///
/// The uniqueness race is an ordinary variant rather than an error, so
/// callers cannot accidentally ignore the duplicate case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written.
    Inserted,
    /// Storage raised its email uniqueness constraint; a concurrent writer
    /// got there between the duplicate check and this insert.
    DuplicateEmail,
}

/// Storage operations the pipeline needs.
///
/// Passed into the pipeline by the caller, so tests can substitute an
/// in-memory implementation.
#[async_trait]
pub trait UserStore {
    /// True when a stored user with this exact (normalized, lowercased)
    /// email already exists. Read-only.
    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Insert an accepted record. Must be called with post-normalization
    /// values only.
    async fn insert(&self, record: &NormalizedRecord) -> Result<InsertOutcome>;
}
