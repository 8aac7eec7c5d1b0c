//! Authentication core: credential codec, password verifier, and the
//! service that orchestrates them against a user store.

mod error;
mod password;

pub mod jwt;
pub mod service;

pub use error::{AuthError, Result};
pub use jwt::{AccessClaims, RefreshClaims};
pub use password::{hash_password, verify_password};
pub use service::{AuthService, TokenPair};
