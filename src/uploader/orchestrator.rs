//! Upload orchestrator
//!
//! Holds the per-store file selections of one admin session and runs upload
//! cycles. A cycle fans out one task per selected store, waits for every task
//! to settle, and replaces the result list in one step. A failing store never
//! cancels its siblings.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::stores::StoreName;

use super::client::UploadEndpoint;
use super::types::{SelectedFile, UploadRequest, UploadResult, UploaderError};

/// Controller for the three store slots
pub struct BlobUploader {
    endpoint: Arc<dyn UploadEndpoint>,
    files: BTreeMap<StoreName, SelectedFile>,
    uploading: bool,
    results: Vec<UploadResult>,
    error: Option<String>,
}

impl BlobUploader {
    pub fn new(endpoint: Arc<dyn UploadEndpoint>) -> Self {
        Self {
            endpoint,
            files: BTreeMap::new(),
            uploading: false,
            results: Vec::new(),
            error: None,
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Select a file for a store slot
    ///
    /// Files not declared as JSON are rejected: the shared error is set and
    /// the slot keeps its previous selection.
    pub fn select_file(&mut self, store: StoreName, file: SelectedFile) -> Result<(), UploaderError> {
        if !file.is_json() {
            let err = UploaderError::InvalidFileType {
                store,
                content_type: file.content_type().to_string(),
            };
            tracing::warn!(
                store = %store,
                file = %file.name(),
                content_type = %file.content_type(),
                "Rejected non-JSON file"
            );
            self.error = Some(err.to_string());
            return Err(err);
        }

        tracing::debug!(store = %store, file = %file.name(), "Selected file");
        self.files.insert(store, file);
        self.error = None;
        Ok(())
    }

    pub fn selection(&self, store: StoreName) -> Option<&SelectedFile> {
        self.files.get(&store)
    }

    pub fn has_selection(&self) -> bool {
        !self.files.is_empty()
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Results of the last completed cycle
    pub fn results(&self) -> &[UploadResult] {
        &self.results
    }

    pub fn result_for(&self, store: StoreName) -> Option<&UploadResult> {
        self.results.iter().find(|r| r.store_name == store)
    }

    /// Shared error message, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // ========================================================================
    // Upload Cycle
    // ========================================================================

    /// Upload every selected store concurrently
    ///
    /// Per-store failures are reported in the results, not as an `Err`. An
    /// `Err` means nothing was uploaded (no selection) or the batch could not
    /// be collected; in both cases the shared error is set.
    pub async fn upload_all(&mut self) -> Result<&[UploadResult], UploaderError> {
        if self.files.is_empty() {
            let err = UploaderError::NoFilesSelected;
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.error = None;
        self.results.clear();

        let mut tasks = JoinSet::new();
        for (&store, file) in &self.files {
            let endpoint = Arc::clone(&self.endpoint);
            let file = file.clone();
            tasks.spawn(upload_store(endpoint, store, file));
        }

        tracing::info!(stores = tasks.len(), "Starting upload cycle");
        let mut cycle = CycleGuard::start(&mut self.uploading, &mut self.error);
        let outcome = join_results(tasks).await;
        cycle.settled = true;
        drop(cycle);

        match outcome {
            Ok(results) => {
                let failed = results.iter().filter(|r| !r.success).count();
                tracing::info!(
                    uploaded = results.len() - failed,
                    failed,
                    "Upload cycle complete"
                );
                self.results = results;
                Ok(&self.results)
            }
            Err(err) => {
                tracing::error!("Upload cycle failed: {}", err);
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

/// Keeps `uploading` set while a cycle runs
///
/// Dropping the `upload_all` future mid-cycle aborts the remaining tasks
/// with the join set and leaves a batch error behind.
struct CycleGuard<'a> {
    uploading: &'a mut bool,
    error: &'a mut Option<String>,
    settled: bool,
}

impl<'a> CycleGuard<'a> {
    fn start(uploading: &'a mut bool, error: &'a mut Option<String>) -> Self {
        *uploading = true;
        Self {
            uploading,
            error,
            settled: false,
        }
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        *self.uploading = false;
        if !self.settled {
            tracing::warn!("Upload cycle cancelled");
            *self.error = Some(UploaderError::Batch("upload cycle cancelled".to_string()).to_string());
        }
    }
}

/// Wait for every task, then hand back all results at once
async fn join_results(mut tasks: JoinSet<UploadResult>) -> Result<Vec<UploadResult>, UploaderError> {
    let mut results = Vec::with_capacity(tasks.len());
    let mut failure = None;

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => {
                failure.get_or_insert_with(|| e.to_string());
            }
        }
    }

    if let Some(detail) = failure {
        return Err(UploaderError::Batch(detail));
    }

    results.sort_by_key(|r| r.store_name);
    Ok(results)
}

/// Upload one store, turning every failure into a failed result
pub async fn upload_store(
    endpoint: Arc<dyn UploadEndpoint>,
    store: StoreName,
    file: SelectedFile,
) -> UploadResult {
    match try_upload(endpoint.as_ref(), store, &file).await {
        Ok(result) => {
            tracing::info!(
                store = %store,
                key = store.key(),
                size = result.data_size.unwrap_or(0),
                "Store uploaded"
            );
            result
        }
        Err(e) => {
            tracing::warn!(store = %store, key = store.key(), file = %file.name(), "Upload failed: {}", e);
            UploadResult::failed(store, e.to_string())
        }
    }
}

async fn try_upload(
    endpoint: &dyn UploadEndpoint,
    store: StoreName,
    file: &SelectedFile,
) -> Result<UploadResult, UploaderError> {
    let text = file.text().await?;
    let data: serde_json::Value = serde_json::from_str(&text)?;
    let data_size = serde_json::to_vec(&data)?.len();

    let request = UploadRequest {
        store_name: store,
        key: store.key().to_string(),
        data,
    };
    let ack = endpoint.upload(&request).await?;

    Ok(UploadResult::succeeded(store, ack, data_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uploader::types::{UploadAck, JSON_MIME_TYPE};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records requests and answers per store
    #[derive(Default)]
    struct MockEndpoint {
        requests: Mutex<Vec<UploadRequest>>,
        rejections: HashMap<StoreName, (u16, String)>,
        panic_on: Option<StoreName>,
        stall_on: Option<StoreName>,
    }

    impl MockEndpoint {
        fn rejecting(store: StoreName, status: u16, message: &str) -> Self {
            let mut rejections = HashMap::new();
            rejections.insert(store, (status, message.to_string()));
            Self {
                rejections,
                ..Default::default()
            }
        }

        fn requests(&self) -> Vec<UploadRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UploadEndpoint for MockEndpoint {
        async fn upload(&self, request: &UploadRequest) -> Result<UploadAck, UploaderError> {
            self.requests.lock().unwrap().push(request.clone());

            if self.panic_on == Some(request.store_name) {
                panic!("endpoint blew up");
            }

            if self.stall_on == Some(request.store_name) {
                std::future::pending::<()>().await;
            }

            if let Some((status, message)) = self.rejections.get(&request.store_name) {
                return Err(UploaderError::Rejected {
                    status: *status,
                    message: message.clone(),
                });
            }

            Ok(UploadAck {
                message: format!("Successfully uploaded {}/{}", request.store_name, request.key),
                timestamp: "2026-10-16T12:00:00.000Z".to_string(),
            })
        }
    }

    fn json_file(name: &str, content: &str) -> SelectedFile {
        SelectedFile::from_bytes(name, JSON_MIME_TYPE, content.as_bytes().to_vec())
    }

    fn uploader(endpoint: &Arc<MockEndpoint>) -> BlobUploader {
        BlobUploader::new(endpoint.clone() as Arc<dyn UploadEndpoint>)
    }

    #[test]
    fn test_starts_idle() {
        let endpoint = Arc::new(MockEndpoint::default());
        let uploader = uploader(&endpoint);

        assert!(!uploader.has_selection());
        assert!(!uploader.is_uploading());
        assert!(uploader.results().is_empty());
        assert!(uploader.error().is_none());
    }

    #[test]
    fn test_non_json_selection_is_rejected_for_every_slot() {
        let endpoint = Arc::new(MockEndpoint::default());
        let mut uploader = uploader(&endpoint);

        for store in StoreName::ALL {
            let csv = SelectedFile::from_bytes("data.csv", "text/csv", b"a,b".to_vec());
            let result = uploader.select_file(store, csv);

            assert!(matches!(result, Err(UploaderError::InvalidFileType { .. })));
            assert!(uploader.selection(store).is_none());
            assert_eq!(uploader.error(), Some("Please select a JSON file"));
        }
    }

    #[test]
    fn test_rejection_keeps_previous_selection() {
        let endpoint = Arc::new(MockEndpoint::default());
        let mut uploader = uploader(&endpoint);

        uploader.select_file(StoreName::Users, json_file("users.json", "[]")).unwrap();
        let txt = SelectedFile::from_bytes("notes.txt", "text/plain", b"hi".to_vec());
        assert!(uploader.select_file(StoreName::Users, txt).is_err());

        assert_eq!(uploader.selection(StoreName::Users).unwrap().name(), "users.json");
        assert!(uploader.error().is_some());
    }

    #[test]
    fn test_valid_selection_clears_error() {
        let endpoint = Arc::new(MockEndpoint::default());
        let mut uploader = uploader(&endpoint);

        let txt = SelectedFile::from_bytes("notes.txt", "text/plain", b"hi".to_vec());
        let _ = uploader.select_file(StoreName::Stats, txt);
        assert!(uploader.error().is_some());

        uploader.select_file(StoreName::Stats, json_file("logs.json", "[]")).unwrap();
        assert!(uploader.error().is_none());
        assert!(uploader.has_selection());
    }

    #[tokio::test]
    async fn test_empty_submission_makes_no_requests() {
        let endpoint = Arc::new(MockEndpoint::default());
        let mut uploader = uploader(&endpoint);

        let result = uploader.upload_all().await;

        assert!(matches!(result, Err(UploaderError::NoFilesSelected)));
        assert_eq!(uploader.error(), Some("Please select at least one file"));
        assert!(endpoint.requests().is_empty());
        assert!(!uploader.is_uploading());
    }

    #[tokio::test]
    async fn test_single_records_upload() {
        let endpoint = Arc::new(MockEndpoint::default());
        let mut uploader = uploader(&endpoint);

        // 10 bytes of JSON
        uploader
            .select_file(StoreName::Records, json_file("data.json", r#"{"a":1234}"#))
            .unwrap();
        let results = uploader.upload_all().await.unwrap().to_vec();

        assert_eq!(
            results,
            vec![UploadResult {
                store_name: StoreName::Records,
                key: "data".to_string(),
                success: true,
                message: Some("Successfully uploaded records/data".to_string()),
                timestamp: Some("2026-10-16T12:00:00.000Z".to_string()),
                data_size: Some(10),
                error: None,
            }]
        );
        assert!(!uploader.is_uploading());
        assert!(uploader.error().is_none());

        let requests = endpoint.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].key, "data");
        assert_eq!(requests[0].data, serde_json::json!({"a": 1234}));
    }

    #[tokio::test]
    async fn test_all_three_stores() {
        let endpoint = Arc::new(MockEndpoint::default());
        let mut uploader = uploader(&endpoint);

        uploader.select_file(StoreName::Records, json_file("r.json", "[1]")).unwrap();
        uploader.select_file(StoreName::Users, json_file("u.json", "[2]")).unwrap();
        uploader.select_file(StoreName::Stats, json_file("s.json", "[3]")).unwrap();

        let results = uploader.upload_all().await.unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.success));
        assert_eq!(endpoint.requests().len(), 3);

        for store in StoreName::ALL {
            let result = uploader.result_for(store).unwrap();
            assert_eq!(result.key, store.key());
        }
    }

    #[tokio::test]
    async fn test_invalid_json_fails_only_its_slot() {
        let endpoint = Arc::new(MockEndpoint::default());
        let mut uploader = uploader(&endpoint);

        uploader.select_file(StoreName::Users, json_file("users.json", "{not json")).unwrap();
        uploader.select_file(StoreName::Stats, json_file("logs.json", "[]")).unwrap();

        uploader.upload_all().await.unwrap();

        let users = uploader.result_for(StoreName::Users).unwrap();
        assert!(!users.success);
        assert_eq!(users.key, "all_users");
        assert!(users.error.as_deref().unwrap().starts_with("Invalid JSON"));
        assert!(users.data_size.is_none());

        assert!(uploader.result_for(StoreName::Stats).unwrap().success);

        // Nothing reached the endpoint for the broken slot
        let requests = endpoint.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].store_name, StoreName::Stats);
    }

    #[tokio::test]
    async fn test_endpoint_failure_does_not_block_siblings() {
        let endpoint = Arc::new(MockEndpoint::rejecting(
            StoreName::Records,
            500,
            "Failed to upload blob",
        ));
        let mut uploader = uploader(&endpoint);

        uploader.select_file(StoreName::Records, json_file("r.json", "{}")).unwrap();
        uploader.select_file(StoreName::Users, json_file("u.json", "[]")).unwrap();

        let results = uploader.upload_all().await.unwrap();
        assert_eq!(results.len(), 2);

        let records = uploader.result_for(StoreName::Records).unwrap();
        assert!(!records.success);
        assert_eq!(records.error.as_deref(), Some("Failed to upload blob"));

        assert!(uploader.result_for(StoreName::Users).unwrap().success);
        assert!(uploader.error().is_none());
    }

    #[tokio::test]
    async fn test_data_size_counts_serialized_bytes() {
        let endpoint = Arc::new(MockEndpoint::default());
        let mut uploader = uploader(&endpoint);

        let pretty = "{\n  \"a\" : [ 1, 2 ],\n  \"name\": \"Zoë\"\n}\n";
        uploader.select_file(StoreName::Stats, json_file("logs.json", pretty)).unwrap();
        uploader.upload_all().await.unwrap();

        let sent = &endpoint.requests()[0].data;
        let expected = serde_json::to_vec(sent).unwrap().len();
        let result = uploader.result_for(StoreName::Stats).unwrap();
        assert_eq!(result.data_size, Some(expected));
        // {"a":[1,2],"name":"Zoë"} where ë is two bytes
        assert_eq!(expected, 25);
    }

    #[tokio::test]
    async fn test_resubmit_replaces_results() {
        let endpoint = Arc::new(MockEndpoint::default());
        let mut uploader = uploader(&endpoint);

        uploader.select_file(StoreName::Records, json_file("r.json", "[]")).unwrap();
        uploader.upload_all().await.unwrap();
        uploader.upload_all().await.unwrap();

        assert_eq!(uploader.results().len(), 1);
        assert_eq!(endpoint.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_panicking_task_sets_batch_error() {
        let endpoint = Arc::new(MockEndpoint {
            panic_on: Some(StoreName::Users),
            ..Default::default()
        });
        let mut uploader = uploader(&endpoint);

        uploader.select_file(StoreName::Records, json_file("r.json", "[]")).unwrap();
        uploader.select_file(StoreName::Users, json_file("u.json", "[]")).unwrap();

        let result = uploader.upload_all().await;

        assert!(matches!(result, Err(UploaderError::Batch(_))));
        assert!(uploader.error().unwrap().starts_with("Upload error:"));
        assert!(uploader.results().is_empty());
        assert!(!uploader.is_uploading());
    }

    #[tokio::test]
    async fn test_dropped_cycle_clears_uploading() {
        let endpoint = Arc::new(MockEndpoint {
            stall_on: Some(StoreName::Stats),
            ..Default::default()
        });
        let mut uploader = uploader(&endpoint);

        uploader.select_file(StoreName::Records, json_file("r.json", "[]")).unwrap();
        uploader.select_file(StoreName::Stats, json_file("s.json", "[]")).unwrap();

        let cycle = tokio::time::timeout(Duration::from_millis(100), uploader.upload_all()).await;
        assert!(cycle.is_err());

        assert!(!uploader.is_uploading());
        assert!(uploader.results().is_empty());
        assert_eq!(uploader.error(), Some("Upload error: upload cycle cancelled"));
        assert_eq!(uploader.selection(StoreName::Stats).unwrap().name(), "s.json");
    }
}
