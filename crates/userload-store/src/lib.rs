pub mod config;
pub mod error;
pub mod postgres;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use postgres::PgUserStore;
pub use store::{InsertOutcome, UserStore};
