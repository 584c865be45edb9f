//! Error types shared between the backend and its clients

use thiserror::Error;

/// Failure to parse a closed-set value from its wire form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Invalid status: {0}")]
    UnknownStatus(String),
}
