use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{AppState, auth_handlers, middleware as auth_middleware};

pub fn router(state: Arc<AppState>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(|| async { "authkit API running" }))
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/login", post(auth_handlers::login))
        .route("/auth/refresh", post(auth_handlers::refresh))
        .route("/auth/logout", post(auth_handlers::logout));

    // Protected routes behind the access gate
    let protected_routes = Router::new()
        .route("/auth/me", get(auth_handlers::me))
        .route("/auth/revoke", post(auth_handlers::revoke))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
