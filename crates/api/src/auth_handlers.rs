use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;
use crate::middleware::{ErrorResponse, Identity};

/// Cookie carrying the refresh credential. HttpOnly and scoped to the
/// refresh endpoint, so client script never sees it and it is only ever
/// transmitted where it is needed.
pub const REFRESH_COOKIE_NAME: &str = "jid";
const REFRESH_COOKIE_PATH: &str = "/auth/refresh";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub ok: bool,
    pub access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: i64,
}

fn refresh_cookie(value: String) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE_NAME, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path(REFRESH_COOKIE_PATH)
        .build()
}

fn unauthorized(message: &str) -> Response {
    let error = ErrorResponse {
        error: message.to_string(),
    };
    (StatusCode::UNAUTHORIZED, Json(error)).into_response()
}

/// Always 200 with a bare flag: status codes must not reveal whether an
/// email is already registered.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Json<OkResponse> {
    let ok = state
        .auth_service
        .register(&payload.email, &payload.password)
        .await;
    Json(OkResponse { ok })
}

/// Access token in the body, refresh token in the `jid` cookie.
/// The refresh token never appears in a response body.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), Response> {
    match state
        .auth_service
        .login(&payload.email, &payload.password)
        .await
    {
        Ok(tokens) => {
            let jar = jar.add(refresh_cookie(tokens.refresh_token));
            Ok((
                jar,
                Json(LoginResponse {
                    access_token: tokens.access_token,
                }),
            ))
        }
        Err(e) => {
            tracing::debug!(error = %e, "login rejected");
            Err(unauthorized("invalid email or password"))
        }
    }
}

/// Exchange the `jid` cookie for a fresh access token, rotating the
/// cookie along the way.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<RefreshResponse>), Response> {
    let token = jar
        .get(REFRESH_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .ok_or_else(|| unauthorized("not authenticated"))?;

    match state.auth_service.refresh(&token).await {
        Ok(tokens) => {
            let jar = jar.add(refresh_cookie(tokens.refresh_token));
            Ok((
                jar,
                Json(RefreshResponse {
                    ok: true,
                    access_token: tokens.access_token,
                }),
            ))
        }
        Err(e) => {
            tracing::debug!(error = %e, "refresh rejected");
            Err(unauthorized("not authenticated"))
        }
    }
}

/// Clear the refresh cookie. Outstanding refresh tokens stay valid
/// until they expire or the user revokes; this only forgets the copy in
/// this browser.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<OkResponse>) {
    let jar = jar.remove(refresh_cookie(String::new()));
    (jar, Json(OkResponse { ok: true }))
}

/// The protected-resource check: echoes the authenticated user id.
pub async fn me(identity: Identity) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: identity.user_id,
    })
}

/// Invalidate every outstanding refresh token for the caller.
pub async fn revoke(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Json<OkResponse> {
    let ok = state.auth_service.revoke_all_sessions(identity.user_id).await;
    Json(OkResponse { ok })
}
