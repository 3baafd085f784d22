//! Authentication
//!
//! Resolves the caller of a request to a session user. How a request proves
//! its identity is up to the [`AuthLookup`] implementation; the server ships
//! with [`SessionTable`], a static token table.

mod session_table;

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

pub use session_table::{SessionTable, SESSION_COOKIE};

/// Resolves the current user of a request
pub trait AuthLookup: Send + Sync {
    /// Returns `None` when the request carries no valid session
    fn lookup(&self, headers: &HeaderMap) -> Option<SessionUser>;
}

/// Everything known about an authenticated caller
///
/// Fields beyond `id`, `username` and `role` are kept in `extra` and must
/// never be echoed back to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub role: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Public projection of a session user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub role: String,
}

impl From<&SessionUser> for UserProfile {
    fn from(user: &SessionUser) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Failed to read session file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid session file: {0}")]
    Parse(#[from] serde_json::Error),
}
