//! Published-repository ledger - SQLite-backed dedup store.
//!
//! One table, append-only: a row exists for a repository id if and only if a
//! publish for that repository was confirmed successful. The ledger is the
//! sole source of the publish-once guarantee across restarts.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

/// Durable record of which repositories have been announced.
pub struct PublishedStore {
    conn: Connection,
}

impl PublishedStore {
    /// Open or create the ledger at a specific path.
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context("Failed to create database directory")?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        let store = Self { conn };
        store.initialize()?;

        info!("Published-repository ledger opened at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory ledger (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Create the schema if it is not already present.
    fn initialize(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS published_repos (
                    id INTEGER PRIMARY KEY,
                    name TEXT,
                    created_at TEXT
                );
                "#,
            )
            .context("Failed to initialize database schema")?;

        debug!("Database schema initialized");
        Ok(())
    }

    /// True if a publish for this repository id has been recorded.
    pub fn exists(&self, id: i64) -> Result<bool> {
        let row: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM published_repos WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query published repository")?;

        Ok(row.is_some())
    }

    /// Record a confirmed publish.
    ///
    /// `INSERT OR IGNORE` keeps a duplicate insert a harmless no-op; the
    /// loop never intentionally records the same id twice, but a crash
    /// replay must not corrupt the ledger.
    pub fn record(&self, id: i64, name: &str, created_at: &DateTime<Utc>) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO published_repos (id, name, created_at) VALUES (?1, ?2, ?3)",
                params![id, name, created_at.to_rfc3339()],
            )
            .context("Failed to record published repository")?;

        debug!("Recorded published repository: {} (id {})", name, id);
        Ok(())
    }

    /// Number of repositories ever published. Diagnostic only.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM published_repos", [], |row| row.get(0))
            .context("Failed to count published repositories")?;

        Ok(count as u64)
    }
}
