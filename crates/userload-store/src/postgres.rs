//! PostgreSQL-backed [`UserStore`].

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::debug;

use userload_model::NormalizedRecord;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::store::{InsertOutcome, UserStore};

const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    surname VARCHAR(100) NOT NULL,
    email VARCHAR(100) UNIQUE NOT NULL
)";

/// A pooled PostgreSQL connection handle.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Connect to the configured database.
    ///
    /// The pool is capped at one connection: rows are processed strictly one
    /// at a time and every storage call is a blocking round-trip from the
    /// pipeline's point of view.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connect`] when the database is unreachable or
    /// the credentials are rejected.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(config.connect_options())
            .await
            .map_err(|source| StoreError::Connect {
                host: config.host.clone(),
                port: config.port,
                database: config.database.clone(),
                source,
            })?;
        debug!(
            host = %config.host,
            database = %config.database,
            "connected to database"
        );
        Ok(Self { pool })
    }

    /// Idempotently create the users table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Schema`] when the DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_USERS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|source| StoreError::Schema { source })?;
        debug!("users table ensured");
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn email_exists(&self, email: &str) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|source| StoreError::Exists {
                email: email.to_string(),
                source,
            })
    }

    async fn insert(&self, record: &NormalizedRecord) -> Result<InsertOutcome> {
        let result = sqlx::query("INSERT INTO users (name, surname, email) VALUES ($1, $2, $3)")
            .bind(&record.name)
            .bind(&record.surname)
            .bind(&record.email)
            .execute(&self.pool)
            .await;
        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            // A concurrent writer can win the race between the duplicate
            // check and this insert; the constraint is the backstop.
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Ok(InsertOutcome::DuplicateEmail)
            }
            Err(source) => Err(StoreError::Insert {
                email: record.email.clone(),
                source,
            }),
        }
    }
}
