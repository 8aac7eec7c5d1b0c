use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

/// Claims carried by a short-lived access credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user id)
    pub sub: i64,
    /// Issued at (unix timestamp)
    pub iat: i64,
    /// Expiration time (unix timestamp)
    pub exp: i64,
}

/// Claims carried by a refresh credential. `token_version` is compared
/// against the user's current stored version at renewal time; a mismatch
/// means every credential issued under the old version is dead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: i64,
    pub token_version: i64,
    pub iat: i64,
    pub exp: i64,
}

fn timestamps(expires_in_seconds: i64) -> (i64, i64) {
    let now = Utc::now();
    (
        now.timestamp(),
        (now + Duration::seconds(expires_in_seconds)).timestamp(),
    )
}

/// Sign an access credential for `user_id`.
pub fn issue_access(user_id: i64, secret: &str, expires_in_seconds: i64) -> Result<String> {
    let (iat, exp) = timestamps(expires_in_seconds);
    let claims = AccessClaims {
        sub: user_id,
        iat,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::Issuance)
}

/// Sign a refresh credential for `user_id`, stamped with the user's
/// current token version. Must be signed with the refresh secret, never
/// the access secret.
pub fn issue_refresh(
    user_id: i64,
    token_version: i64,
    secret: &str,
    expires_in_seconds: i64,
) -> Result<String> {
    let (iat, exp) = timestamps(expires_in_seconds);
    let claims = RefreshClaims {
        sub: user_id,
        token_version,
        iat,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::Issuance)
}

/// Verify an access credential. Pure signature + expiry check, no I/O.
pub fn verify_access(token: &str, secret: &str) -> Result<AccessClaims> {
    verify(token, secret)
}

/// Verify a refresh credential. Signature + expiry only; the token
/// version cross-check against the store is the service's job.
pub fn verify_refresh(token: &str, secret: &str) -> Result<RefreshClaims> {
    verify(token, secret)
}

fn verify<C: serde::de::DeserializeOwned>(token: &str, secret: &str) -> Result<C> {
    // Zero leeway so expiry is exact rather than "within a minute".
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<C>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| map_decode_error(&e))
}

fn map_decode_error(e: &jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_access_secret";

    #[test]
    fn issue_and_verify_access() {
        let token = issue_access(42, SECRET, 900).unwrap();
        let claims = verify_access(&token, SECRET).unwrap();

        assert_eq!(claims.sub, 42);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_carries_token_version() {
        let token = issue_refresh(42, 7, "refresh_secret", 3600).unwrap();
        let claims = verify_refresh(&token, "refresh_secret").unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.token_version, 7);
    }

    #[test]
    fn wrong_secret_is_invalid_signature() {
        let token = issue_access(42, SECRET, 900).unwrap();
        let err = verify_access(&token, "another_secret").unwrap_err();

        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn access_token_rejected_by_refresh_secret() {
        // The two secrets partition the credential space: an access
        // token never verifies as a refresh token.
        let token = issue_access(42, SECRET, 900).unwrap();
        let err = verify_refresh(&token, "refresh_secret").unwrap_err();

        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn expired_token_is_expired() {
        let token = issue_access(42, SECRET, -1).unwrap();
        let err = verify_access(&token, SECRET).unwrap_err();

        assert!(matches!(err, AuthError::Expired));
    }

    #[test]
    fn garbage_is_malformed() {
        let err = verify_access("not.a.jwt", SECRET).unwrap_err();
        assert!(matches!(err, AuthError::Malformed));

        let err = verify_access("", SECRET).unwrap_err();
        assert!(matches!(err, AuthError::Malformed));
    }
}
