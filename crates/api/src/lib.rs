//! HTTP surface for the auth core: handlers, access-gate middleware,
//! and the router wiring them together.

pub mod auth_handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use state::AppState;
