//! Chirpy service core: access tokens, sessions, and the operations the
//! transport layer maps onto routes.

pub mod chirps;
pub mod config;
pub mod error;
pub mod extract;
pub mod session;
pub mod telemetry;
pub mod tokens;
pub mod users;
pub mod webhooks;

use std::sync::Arc;

use chirpy_db::Database;

use crate::config::Config;

pub use crate::error::{ApiError, Result};

pub type AppState = Arc<AppStateInner>;

/// Store handle and configuration, passed explicitly to every operation.
pub struct AppStateInner {
    pub db: Database,
    pub config: Config,
}

impl AppStateInner {
    /// Open (or create) the database named in `config`.
    pub fn open(config: Config) -> anyhow::Result<AppState> {
        let db = Database::open(&config.db_path)?;
        Ok(Arc::new(Self { db, config }))
    }
}
