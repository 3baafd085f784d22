//! Blob Admin
//!
//! Administrative service for uploading and restoring the JSON snapshots
//! (`records`, `users`, `stats`) kept in an S3-compatible blob store.
//!
//! # Modules
//!
//! - `routes`: HTTP function endpoints (`me`, `uploadBlobs`) and health check
//! - `uploader`: client-side upload orchestrator and endpoint client
//! - `auth`: session lookup for incoming requests
//! - `storage`: S3 and in-memory blob backends
//! - `stores`: the fixed store → key catalog

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;
pub mod stores;
pub mod uploader;
