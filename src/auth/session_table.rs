//! Static session table
//!
//! Maps opaque session tokens to users. Tokens are read from an
//! `Authorization: Bearer <token>` header or from the `session` cookie.

use std::collections::HashMap;
use std::path::Path;

use axum::http::{header, HeaderMap};

use super::{AuthError, AuthLookup, SessionUser};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Token → user table
#[derive(Debug, Clone, Default)]
pub struct SessionTable {
    sessions: HashMap<String, SessionUser>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from a JSON object of `{ "<token>": { id, username, role, ... } }`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| AuthError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let sessions: HashMap<String, SessionUser> = serde_json::from_str(json)?;
        Ok(Self { sessions })
    }

    pub fn with_session(mut self, token: impl Into<String>, user: SessionUser) -> Self {
        self.sessions.insert(token.into(), user);
        self
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl AuthLookup for SessionTable {
    fn lookup(&self, headers: &HeaderMap) -> Option<SessionUser> {
        let token = bearer_token(headers).or_else(|| cookie_token(headers))?;
        self.sessions.get(token).cloned()
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token)
        .filter(|token| !token.is_empty())
}
