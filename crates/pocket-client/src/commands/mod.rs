//! User-facing flows driven by the front-end.
//!
//! Each sub-module adds an `impl AppState` block for one screen's worth of
//! behaviour: these compose the core mutators with analytics and the
//! external providers.

pub mod chat;
pub mod coaches;
pub mod paywall;
pub mod profile;
