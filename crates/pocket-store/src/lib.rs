//! # pocket-store
//!
//! Local persistence for Pocket Coach.
//!
//! Records are kept as strings in a namespaced key-value store.  The crate
//! exposes the [`KeyValueStore`] adapter trait with an in-memory and a
//! SQLite-backed implementation, and the typed [`Storage`] layer that
//! serializes profile, coach, session and daily-counter records on top of it.

pub mod clock;
pub mod database;
pub mod kv;
pub mod migrations;
pub mod storage;

mod error;

pub use clock::{Clock, FixedClock, SystemClock};
pub use database::Database;
pub use error::StoreError;
pub use kv::{KeyValueStore, MemoryStore};
pub use storage::{keys, Storage};
