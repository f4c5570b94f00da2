use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoachError {
    #[error("Coach name must not be empty")]
    MissingName,

    #[error("Unknown coach category: {0}")]
    UnknownCategory(String),
}
