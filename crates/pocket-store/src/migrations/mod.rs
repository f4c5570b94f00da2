//! Schema migrations, tracked through `PRAGMA user_version`.
//!
//! Each entry in [`MIGRATIONS`] moves the schema to its version number.
//! Pending entries run in order whenever a database is opened.

pub mod v001_initial;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Result, StoreError};

type Step = fn(&Connection) -> rusqlite::Result<()>;

const MIGRATIONS: &[(u32, &str, Step)] = &[(1, "v001_initial", v001_initial::up)];

/// Bring `conn` up to the newest schema version.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let version: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    debug!(version, latest = latest_version(), "schema version");

    for &(target, name, step) in MIGRATIONS.iter().filter(|(v, _, _)| *v > version) {
        info!(migration = name, "applying migration");
        step(conn).map_err(|e| StoreError::Migration(format!("{name}: {e}")))?;
        conn.pragma_update(None, "user_version", target)?;
    }

    Ok(())
}

pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|(v, _, _)| *v).unwrap_or(0)
}
