use thiserror::Error;

use pocket_shared::CoachError;
use pocket_store::StoreError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Purchase error: {0}")]
    Purchase(#[from] PurchaseError),

    #[error("Invalid coach: {0}")]
    Coach(#[from] CoachError),

    #[error("Coach not found: {0}")]
    CoachNotFound(String),

    #[error("Coach id already in use: {0}")]
    DuplicateCoachId(String),
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Completion API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("Purchases are not configured")]
    NotConfigured,

    #[error("Unknown package: {0}")]
    UnknownPackage(String),

    #[error("Purchase cancelled")]
    Cancelled,

    #[error("Purchase provider error: {0}")]
    Provider(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
