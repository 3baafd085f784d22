//! S3-compatible storage client
//!
//! Wraps the AWS SDK for S3-compatible storage access.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    Client,
};
use chrono::Utc;

use crate::config::StorageConfig;
use crate::error::StorageError;

use super::types::ObjectMetadata;
use super::BlobStore;

/// S3-compatible storage client
#[derive(Clone)]
pub struct S3Client {
    client: Client,
    bucket: String,
}

impl S3Client {
    /// Create a new S3 client from configuration
    pub async fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "blob-admin",
        );

        let region = config
            .region
            .clone()
            .unwrap_or_else(|| "us-east-1".to_string());

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint)
            .region(Region::new(region))
            .credentials_provider(credentials)
            .force_path_style(true) // Required for MinIO and other S3-compatible services
            .build();

        let client = Client::from_conf(s3_config);

        let bucket = config.bucket.clone();
        match client.head_bucket().bucket(&bucket).send().await {
            Ok(_) => {
                tracing::info!("Connected to S3 bucket: {}", bucket);
            }
            Err(e) => {
                tracing::warn!(
                    "Could not verify bucket {}: {}. Will attempt operations anyway.",
                    bucket,
                    e
                );
            }
        }

        Ok(Self { client, bucket })
    }
}

/// Classify an SDK error message
fn map_sdk_error(key: &str, action: &str, message: String) -> StorageError {
    if message.contains("403") || message.contains("AccessDenied") {
        StorageError::AccessDenied(key.to_string())
    } else {
        StorageError::SdkError(format!("Failed to {} {}: {}", action, key, message))
    }
}

#[async_trait]
impl BlobStore for S3Client {
    fn backend(&self) -> &'static str {
        "s3"
    }

    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<ObjectMetadata, StorageError> {
        let size = data.len() as i64;

        let response = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| map_sdk_error(key, "put object", e.to_string()))?;

        Ok(ObjectMetadata {
            key: key.to_string(),
            size,
            last_modified: Some(Utc::now()),
            content_type: Some(content_type.to_string()),
            etag: response.e_tag().map(|s| s.to_string()),
        })
    }
}
