//! Storage error types.

use thiserror::Error;

/// Errors raised by storage operations.
///
/// Most variants are row-local: the pipeline logs them and moves on. Only
/// errors for which [`StoreError::is_connection_lost`] returns true abort
/// the run.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not open a connection to the database.
    #[error("failed to connect to {host}:{port}/{database}: {source}")]
    Connect {
        host: String,
        port: u16,
        database: String,
        #[source]
        source: sqlx::Error,
    },

    /// Creating the users table failed.
    #[error("failed to create users table: {source}")]
    Schema {
        #[source]
        source: sqlx::Error,
    },

    /// The duplicate-check query failed.
    #[error("duplicate check failed for {email}: {source}")]
    Exists {
        email: String,
        #[source]
        source: sqlx::Error,
    },

    /// An insert failed for a reason other than the email uniqueness
    /// constraint.
    #[error("insert failed for {email}: {source}")]
    Insert {
        email: String,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    /// True when the underlying failure indicates the connection itself is
    /// unusable rather than a problem with one statement.
    #[must_use]
    pub fn is_connection_lost(&self) -> bool {
        let source = match self {
            Self::Connect { source, .. }
            | Self::Schema { source }
            | Self::Exists { source, .. }
            | Self::Insert { source, .. } => source,
        };
        matches!(
            source,
            sqlx::Error::Io(_) | sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut
        )
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
