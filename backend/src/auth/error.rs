//! Authentication failure taxonomy
//!
//! Every variant except `Internal` is a definite policy outcome and is never
//! retried. The variants stay distinct inside the process for logging; at the
//! HTTP boundary they collapse into a generic unauthorized/forbidden signal.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Bad signature, malformed structure, or past expiry
    #[error("invalid token")]
    InvalidToken,

    #[error("wrong token kind")]
    WrongTokenKind,

    #[error("token revoked")]
    TokenRevoked,

    /// The token is valid but the principal's role is not entitled
    #[error("forbidden")]
    Forbidden,

    #[error("principal not found")]
    PrincipalNotFound,

    /// Credential store or ledger unreachable, or token signing failed
    #[error("auth infrastructure failure")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Stable label for logs and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidToken => "invalid_token",
            AuthError::WrongTokenKind => "wrong_token_kind",
            AuthError::TokenRevoked => "token_revoked",
            AuthError::Forbidden => "forbidden",
            AuthError::PrincipalNotFound => "principal_not_found",
            AuthError::Internal(_) => "internal",
        }
    }
}
