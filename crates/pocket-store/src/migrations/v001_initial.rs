//! v001 -- Initial schema creation.
//!
//! A single namespaced key-value table holding every persisted record.

use rusqlite::Connection;

const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS kv_store (
    key        TEXT PRIMARY KEY NOT NULL,   -- e.g. @pocketcoach/user_profile
    value      TEXT NOT NULL,               -- literal, integer or JSON text
    updated_at TEXT NOT NULL                -- RFC-3339
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
