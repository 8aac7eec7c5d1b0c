use thiserror::Error;

use store::StoreError;

/// Auth failure taxonomy. Display strings are deliberately generic:
/// which field, secret, or sub-step failed is logged, never returned.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already registered")]
    DuplicateEmail,

    #[error("session revoked")]
    RevokedOrStale,

    #[error("malformed credential")]
    Malformed,

    #[error("credential expired")]
    Expired,

    #[error("invalid credential signature")]
    InvalidSignature,

    #[error("credential issuance failed")]
    Issuance,

    #[error("password hashing failed")]
    Hashing,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, AuthError>;
