//! Upload endpoint client
//!
//! Defines the endpoint trait and the HTTP implementation that talks to
//! `/.netlify/functions/uploadBlobs`.

use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;

use crate::auth::SESSION_COOKIE;

use super::types::{UploadAck, UploadRequest, UploaderError, GENERIC_UPLOAD_FAILED};

/// Path of the upload function, relative to the server base URL
pub const UPLOAD_BLOBS_PATH: &str = "/.netlify/functions/uploadBlobs";

/// Something that accepts store snapshots
#[async_trait]
pub trait UploadEndpoint: Send + Sync {
    /// Persist `request.data` under `request.key` in `request.store_name`
    async fn upload(&self, request: &UploadRequest) -> Result<UploadAck, UploaderError>;
}

/// HTTP client for the upload function
#[derive(Clone)]
pub struct HttpUploadClient {
    client: reqwest::Client,
    url: String,
    session_token: Option<String>,
}

impl HttpUploadClient {
    /// Create a client for the server at `base_url`, e.g. `http://localhost:3000`
    pub fn new(base_url: &str) -> Result<Self, UploaderError> {
        let base = base_url.trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(UploaderError::InvalidUrl(base_url.to_string()));
        }

        // No timeout: a stalled upload holds its slot until the server answers
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| UploaderError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: format!("{}{}", base, UPLOAD_BLOBS_PATH),
            session_token: None,
        })
    }

    /// Send `token` as the session cookie on every request
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Error body of a rejected upload
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Message for a non-2xx answer; the body may be anything, e.g. a proxy page
fn rejection_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_UPLOAD_FAILED.to_string())
}

#[async_trait]
impl UploadEndpoint for HttpUploadClient {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadAck, UploaderError> {
        let mut builder = self.client.post(&self.url).json(request);
        if let Some(token) = &self.session_token {
            builder = builder.header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| UploaderError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| UploaderError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(UploaderError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body),
            });
        }

        serde_json::from_slice(&body)
            .map_err(|e| UploaderError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}
