//! Application state shared by every request handler.
//!
//! Holds no open connection: each request opens its own through
//! `open_db()`, so handlers never contend on an in-process lock and all
//! coordination happens inside SQLite.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::db;

pub struct CoreState {
    db_path: PathBuf,
    started_at: Instant,
}

impl CoreState {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            started_at: Instant::now(),
        }
    }

    /// Create the database directory if needed and bring the schema up
    /// to date. Call once at start-up, before serving requests.
    pub fn initialize(&self) -> Result<(), CoreError> {
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::DataDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        db::open_database(&self.db_path)?;
        tracing::info!(path = %self.db_path.display(), "Database ready");
        Ok(())
    }

    /// Open a connection for one request.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_connection(&self.db_path).map_err(CoreError::Database)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("Cannot create data directory {path:?}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
