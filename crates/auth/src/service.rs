use std::sync::Arc;

use crate::{
    error::{AuthError, Result},
    jwt,
    password::{hash_password, verify_password},
};
use store::{User, UserStore};

/// An access/refresh credential pair. The access token goes back in the
/// response body; the refresh token belongs in the transport cookie and
/// must never appear in a body.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Orchestrates register/login/refresh/revoke against a user store.
///
/// Holds both signing secrets: the access secret signs short-lived
/// tokens, the refresh secret signs the longer-lived revocable ones.
/// A leak of either cannot mint credentials of the other kind.
pub struct AuthService {
    store: Arc<dyn UserStore>,
    access_secret: String,
    refresh_secret: String,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        access_secret: String,
        refresh_secret: String,
        access_ttl_seconds: i64,
        refresh_ttl_seconds: i64,
    ) -> Self {
        Self {
            store,
            access_secret,
            refresh_secret,
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    /// Register a new user. Returns a bare success flag: duplicate
    /// email and hashing failure both collapse to `false` so the caller
    /// learns nothing about which accounts exist. Causes are logged.
    pub async fn register(&self, email: &str, password: &str) -> bool {
        match self.try_register(email, password).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "registration failed");
                false
            }
        }
    }

    async fn try_register(&self, email: &str, password: &str) -> Result<()> {
        // Argon2 is CPU-bound by design; keep it off the async workers.
        let password = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|_| AuthError::Hashing)??;

        self.store.insert(email, &hash).await?;
        Ok(())
    }

    /// Authenticate by email and password, issuing a fresh credential
    /// pair. Unknown email and wrong password return the identical
    /// `InvalidCredentials` to prevent user enumeration.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = password.to_owned();
        let stored_hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|_| AuthError::Hashing)?;

        let valid = match verified {
            Ok(valid) => valid,
            Err(e) => {
                tracing::error!(error = %e, user_id = user.id, "password verification failed");
                false
            }
        };

        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_pair(&user)
    }

    /// Exchange a refresh credential for a new pair.
    ///
    /// The embedded token version must match the user's current one; a
    /// mismatch means the credential was revoked (or the user is gone)
    /// and fails with `RevokedOrStale`. On success the refresh token is
    /// rotated alongside the access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let claims = jwt::verify_refresh(refresh_token, &self.refresh_secret)?;

        let user = self
            .store
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::RevokedOrStale)?;

        if user.token_version != claims.token_version {
            return Err(AuthError::RevokedOrStale);
        }

        self.issue_pair(&user)
    }

    /// Invalidate every outstanding refresh credential for the user in
    /// one store write. The only revocation primitive; there is no
    /// per-token blacklist.
    pub async fn revoke_all_sessions(&self, user_id: i64) -> bool {
        match self.store.increment_token_version(user_id).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, user_id, "session revocation failed");
                false
            }
        }
    }

    /// Verify an access credential. Pure check against the access
    /// secret, no store lookup; used by the access gate.
    pub fn verify_access(&self, token: &str) -> Result<jwt::AccessClaims> {
        jwt::verify_access(token, &self.access_secret)
    }

    fn issue_pair(&self, user: &User) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: jwt::issue_access(user.id, &self.access_secret, self.access_ttl_seconds)?,
            refresh_token: jwt::issue_refresh(
                user.id,
                user.token_version,
                &self.refresh_secret,
                self.refresh_ttl_seconds,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryUserStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryUserStore::new()),
            "access_secret".to_string(),
            "refresh_secret".to_string(),
            900,
            604_800,
        )
    }

    #[tokio::test]
    async fn register_then_login() {
        let service = service();

        assert!(service.register("alice@example.com", "secret123").await);

        let tokens = service.login("alice@example.com", "secret123").await.unwrap();
        let claims = service.verify_access(&tokens.access_token).unwrap();
        assert_eq!(claims.sub, 1);
    }

    #[tokio::test]
    async fn duplicate_register_returns_false_and_keeps_record() {
        let service = service();

        assert!(service.register("alice@example.com", "secret123").await);
        assert!(!service.register("alice@example.com", "other_password").await);

        // The original credentials still work; the second attempt
        // changed nothing.
        assert!(service.login("alice@example.com", "secret123").await.is_ok());
        let err = service
            .login("alice@example.com", "other_password")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn bad_password_and_unknown_email_are_indistinguishable() {
        let service = service();
        service.register("alice@example.com", "secret123").await;

        let wrong_password = service
            .login("alice@example.com", "wrong")
            .await
            .unwrap_err();
        let unknown_email = service
            .login("nobody@example.com", "secret123")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn refresh_issues_new_pair() {
        let service = service();
        service.register("alice@example.com", "secret123").await;
        let tokens = service.login("alice@example.com", "secret123").await.unwrap();

        let renewed = service.refresh(&tokens.refresh_token).await.unwrap();
        let claims = service.verify_access(&renewed.access_token).unwrap();
        assert_eq!(claims.sub, 1);
        // Rotation: a new refresh token comes back too.
        assert!(!renewed.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn revoke_invalidates_earlier_refresh_tokens() {
        let service = service();
        service.register("alice@example.com", "secret123").await;
        let before = service.login("alice@example.com", "secret123").await.unwrap();

        assert!(service.revoke_all_sessions(1).await);

        // Issued before the revocation: dead, despite unexpired jwt.
        let err = service.refresh(&before.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::RevokedOrStale));

        // Issued after: carries the new version, works.
        let after = service.login("alice@example.com", "secret123").await.unwrap();
        assert!(service.refresh(&after.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn refresh_rejects_forged_and_expired_tokens() {
        let service = service();
        service.register("alice@example.com", "secret123").await;

        let forged = jwt::issue_refresh(1, 0, "some_other_secret", 3600).unwrap();
        assert!(matches!(
            service.refresh(&forged).await.unwrap_err(),
            AuthError::InvalidSignature
        ));

        let expired = jwt::issue_refresh(1, 0, "refresh_secret", -1).unwrap();
        assert!(matches!(
            service.refresh(&expired).await.unwrap_err(),
            AuthError::Expired
        ));
    }

    #[tokio::test]
    async fn revoke_unknown_user_returns_false() {
        let service = service();
        assert!(!service.revoke_all_sessions(999).await);
    }
}
