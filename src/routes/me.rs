//! User info function
//!
//! `GET /.netlify/functions/me` returns the public profile of the caller.

use axum::{
    extract::State,
    http::{HeaderMap, Method},
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::UserProfile;
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: UserProfile,
}

/// Create the user info router
pub fn router() -> Router<AppState> {
    Router::new().route("/me", any(me))
}

async fn me(
    method: Method,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>> {
    if method != Method::GET {
        return Err(AppError::MethodNotAllowed);
    }

    let user = state.auth().lookup(&headers).ok_or(AppError::Unauthorized)?;

    Ok(Json(MeResponse {
        user: UserProfile::from(&user),
    }))
}
