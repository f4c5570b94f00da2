//! # pocket-shared
//!
//! Domain types shared by the Pocket Coach store and client crates: user
//! profile, coaches, chat transcripts, the built-in coach catalog, and the
//! entitlement snapshot handed back by the purchase provider.

pub mod catalog;
pub mod constants;
pub mod entitlement;
pub mod error;
pub mod types;

pub use error::CoachError;
pub use types::*;
