//! Snapshot Upload Module
//!
//! Client side of the admin interface:
//! - per-store file selection with JSON type checking
//! - concurrent upload of every selected store
//! - per-store result aggregation
//!
//! Flow:
//! 1. Select up to one JSON file per store (`records`, `users`, `stats`)
//! 2. `upload_all` reads, parses and posts every selection in parallel
//! 3. Results are matched back to stores by name and key

pub mod client;
pub mod orchestrator;
pub mod types;

pub use client::{HttpUploadClient, UploadEndpoint, UPLOAD_BLOBS_PATH};
pub use orchestrator::{upload_store, BlobUploader};
pub use types::*;
