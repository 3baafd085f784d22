//! Upload types shared by the orchestrator, its client and the upload endpoint

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::stores::StoreName;

/// Content type a selected file must declare
pub const JSON_MIME_TYPE: &str = "application/json";

/// Fallback message when the endpoint rejects an upload without saying why
pub const GENERIC_UPLOAD_FAILED: &str = "Upload failed";

// ============================================================================
// Wire Types
// ============================================================================

/// Body of an upload request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub store_name: StoreName,
    pub key: String,
    pub data: serde_json::Value,
}

/// Success body returned by the upload endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadAck {
    pub message: String,
    /// ISO-8601 time the snapshot was written
    pub timestamp: String,
}

// ============================================================================
// Results
// ============================================================================

/// Outcome of uploading one store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub store_name: StoreName,
    pub key: String,
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Byte length of the serialized payload as sent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_size: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    pub fn succeeded(store: StoreName, ack: UploadAck, data_size: usize) -> Self {
        Self {
            store_name: store,
            key: store.key().to_string(),
            success: true,
            message: Some(ack.message),
            timestamp: Some(ack.timestamp),
            data_size: Some(data_size),
            error: None,
        }
    }

    pub fn failed(store: StoreName, error: impl Into<String>) -> Self {
        Self {
            store_name: store,
            key: store.key().to_string(),
            success: false,
            message: None,
            timestamp: None,
            data_size: None,
            error: Some(error.into()),
        }
    }
}

// ============================================================================
// Selected Files
// ============================================================================

/// A file picked for one store slot
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    content_type: String,
    source: FileSource,
}

#[derive(Debug, Clone)]
enum FileSource {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

impl SelectedFile {
    /// Select a file on disk; the declared type is guessed from its extension
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let content_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            name,
            content_type,
            source: FileSource::Path(path),
        }
    }

    /// Select in-memory content with an explicitly declared type
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            name: name.into(),
            content_type: content_type.into(),
            source: FileSource::Memory(Arc::from(bytes)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn is_json(&self) -> bool {
        self.content_type == JSON_MIME_TYPE
    }

    /// Read the full text content
    pub async fn text(&self) -> Result<String, UploaderError> {
        match &self.source {
            FileSource::Path(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| UploaderError::Read {
                        name: self.name.clone(),
                        message: e.to_string(),
                    })
            }
            FileSource::Memory(bytes) => {
                String::from_utf8(bytes.to_vec()).map_err(|e| UploaderError::Read {
                    name: self.name.clone(),
                    message: e.to_string(),
                })
            }
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum UploaderError {
    #[error("Please select a JSON file")]
    InvalidFileType { store: StoreName, content_type: String },

    #[error("Please select at least one file")]
    NoFilesSelected,

    #[error("Failed to read {name}: {message}")]
    Read { name: String, message: String },

    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The endpoint answered with a non-2xx status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Upload error: {0}")]
    Batch(String),
}
