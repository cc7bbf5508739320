//! Authentication and authorization logic.
//!
//! Provides password hashing, session tokens, and the credential store
//! shared by the feed and the neighbourhood realms.

pub mod credentials;
pub mod jwt;
pub mod password;

use thiserror::Error;

use crate::store::StoreError;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are never distinguished.
    #[error("Invalid credentials")]
    CredentialError,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Identity already exists: {0}")]
    Conflict(String),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}
