//! HTTP routes
//!
//! The function endpoints live under `/.netlify/functions` so the admin UI
//! can talk to this server exactly as it talks to the hosted functions.

pub mod health;
pub mod me;
pub mod upload_blobs;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Prefix shared by all function endpoints
pub const FUNCTIONS_PREFIX: &str = "/.netlify/functions";

/// Build the application router
pub fn app(state: AppState) -> Router {
    let functions = Router::new()
        .merge(me::router())
        .merge(upload_blobs::router(state.config().server.max_upload_bytes));

    Router::new()
        .route("/health", get(health::health_check))
        .nest(FUNCTIONS_PREFIX, functions)
        .with_state(state)
}
