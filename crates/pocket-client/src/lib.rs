//! # pocket-client
//!
//! Application core for Pocket Coach: the loaded [`AppState`], the chat
//! reply client, the subscription boundary and the user-facing flows built
//! on them.  The `pocket-coach` binary drives all of it from a terminal.

pub mod ai_client;
pub mod analytics;
pub mod cli;
pub mod commands;
pub mod config;
pub mod entitlements;
pub mod error;
pub mod purchases;
pub mod state;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use pocket_store::{Database, Storage, SystemClock};

use crate::ai_client::ChatClient;
use crate::config::{ClientConfig, Platform};
use crate::error::Result;
use crate::purchases::{init_purchases, UnconfiguredPurchases};
use crate::state::AppState;

/// Install the global tracing subscriber.  `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pocket_client=debug,pocket_store=info,warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Wire the production collaborators from `config` into an unloaded
/// [`AppState`].
pub async fn build_state(config: &ClientConfig) -> Result<AppState> {
    let db = match &config.database_path {
        Some(path) => Database::open_at(path)?,
        None => Database::new()?,
    };
    info!(path = ?db.path(), "Database ready");

    let storage = Storage::new(Arc::new(db), Arc::new(SystemClock));

    // No native subscription SDK is linked into this build, so the provider
    // stays unconfigured whatever keys are present.
    let purchases = init_purchases(Arc::new(UnconfiguredPurchases), config, Platform::current()).await;

    let chat = ChatClient::new(config);
    info!(real = chat.is_real(), model = %config.openai_model, "Chat client ready");

    Ok(AppState::new(storage, purchases, Arc::new(chat)))
}
