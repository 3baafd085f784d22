//! Upload function
//!
//! `POST /.netlify/functions/uploadBlobs` writes one store snapshot.
//!
//! Body: `{"storeName": "...", "key": "...", "data": <any JSON>}`. The key
//! must be the one configured for the store. An existing snapshot under the
//! same key is overwritten.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method},
    routing::any,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::storage::{snapshot_key, JSON_CONTENT_TYPE};
use crate::uploader::{UploadAck, UploadRequest};

/// Create the upload router
///
/// Snapshots are sent in one JSON body, so the body limit is raised from
/// axum's 2 MB default to `max_body_bytes`.
pub fn router(max_body_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/uploadBlobs", any(upload_blobs))
        .layer(DefaultBodyLimit::max(max_body_bytes))
}

async fn upload_blobs(
    method: Method,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadAck>> {
    if method != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }

    let user = state.auth().lookup(&headers).ok_or(AppError::Unauthorized)?;

    let request: UploadRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?;

    let store = request.store_name;
    if request.key != store.key() {
        return Err(AppError::BadRequest(format!(
            "Invalid key '{}' for store '{}', expected '{}'",
            request.key,
            store,
            store.key()
        )));
    }

    let payload = serde_json::to_vec(&request.data)?;
    let object_key = snapshot_key(store, &request.key);
    let metadata = state
        .store()
        .put(&object_key, payload, JSON_CONTENT_TYPE)
        .await?;

    tracing::info!(
        user = %user.username,
        store = %store,
        key = %request.key,
        object_key = %object_key,
        size = metadata.size,
        "Snapshot stored"
    );

    Ok(Json(UploadAck {
        message: format!("Successfully uploaded {}/{}", store, request.key),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
