use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Identity attached to a request once the access gate has verified its
/// bearer token.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Identity {
    pub user_id: i64,
}

/// The one rejection the gate ever produces. Missing header, malformed
/// header, expired token, and forged token all look the same from the
/// outside; the distinction is logged, not returned.
fn unauthenticated() -> Response {
    let error = ErrorResponse {
        error: "not authenticated".to_string(),
    };
    (StatusCode::UNAUTHORIZED, Json(error)).into_response()
}

/// Access gate: verifies the `Authorization: Bearer <token>` header
/// against the access secret and attaches the caller's identity.
///
/// Pure signature + expiry check, no store lookup, and no
/// refresh-on-the-fly: an expired access token always rejects and the
/// caller must go through the refresh flow.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(unauthenticated)?;

    let claims = state.auth_service.verify_access(token).map_err(|e| {
        tracing::debug!(error = %e, "access token rejected");
        unauthenticated()
    })?;

    request.extensions_mut().insert(Identity {
        user_id: claims.sub,
    });

    Ok(next.run(request).await)
}

/// Extractor for the verified identity.
/// Use in handlers behind the `require_auth` layer.
impl<S> axum::extract::FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .ok_or_else(unauthenticated)
    }
}
