//! Database primitives shared by the server binary and the test crates.

use sea_orm::{Database, DatabaseConnection};
use thiserror::Error;

mod store;

pub use store::SqlStore;

/// Shared connection handle alias.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing (set {0})")]
    MissingUrl(String),
    #[error(transparent)]
    Connect(#[from] sea_orm::DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

/// Environment-driven connection settings.
#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    env_key: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self::new("DATABASE_URL")
    }
}

impl DatabaseSettings {
    pub fn new(env_key: impl Into<String>) -> Self {
        Self {
            env_key: env_key.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn database_url(&self) -> DbResult<String> {
        std::env::var(&self.env_key).map_err(|_| DbError::MissingUrl(self.env_key.clone()))
    }
}

pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let url = settings.database_url()?;
    Ok(Database::connect(url).await?)
}
