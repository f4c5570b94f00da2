//! SQLite-backed key-value store.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! migrations are run before any other operation.  Every record lives in the
//! single `kv_store` table.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::kv::KeyValueStore;
use crate::migrations;

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/pocket-coach/pocket-coach.db`
    /// - macOS:   `~/Library/Application Support/app.pocketcoach.pocket-coach/pocket-coach.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\pocketcoach\pocket-coach\data\pocket-coach.db`
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("app", "pocketcoach", "pocket-coach").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("pocket-coach.db");

        tracing::info!(path = %db_path.display(), "opening database");

        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run_migrations(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn()
            .ok()
            .and_then(|conn| conn.path().map(PathBuf::from))
            .filter(|p| !p.as_os_str().is_empty())
    }
}

#[async_trait]
impl KeyValueStore for Database {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()?
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(db: &Database) -> i64 {
        db.conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        let db = Database::open_at(&path).expect("should open");
        assert!(db.path().is_some());
        assert_eq!(count(&db), 0);
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("test.db");

        {
            let db = Database::open_at(&path).unwrap();
            db.set_item("@pocketcoach/onboarding_done", "true").await.unwrap();
            db.set_item("@pocketcoach/onboarding_done", "false").await.unwrap();
        }

        let db = Database::open_at(&path).unwrap();
        assert_eq!(
            db.get_item("@pocketcoach/onboarding_done").await.unwrap().as_deref(),
            Some("false")
        );
        assert_eq!(count(&db), 1);
    }

    #[tokio::test]
    async fn remove_deletes_key() {
        let db = Database::open_in_memory().unwrap();
        db.set_item("k", "v").await.unwrap();
        db.remove_item("k").await.unwrap();
        assert_eq!(db.get_item("k").await.unwrap(), None);
        assert!(db.path().is_none());
    }
}
