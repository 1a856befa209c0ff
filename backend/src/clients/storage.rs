//! Object storage client for file uploads (S3)

use crate::config::StorageConfig;
use anyhow::{Context, Result};
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use tracing::debug;

/// S3 storage client
///
/// The underlying SDK client is internally reference-counted, so clones
/// are cheap.
#[derive(Clone)]
pub struct StorageClient {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl StorageClient {
    /// Create the storage client from configuration
    ///
    /// Returns `None` when no bucket is configured; the upload endpoint
    /// then reports uploads as unavailable.
    pub async fn new(config: &StorageConfig) -> Option<Self> {
        let bucket = config.bucket.clone()?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let aws_config = loader.load().await;

        Some(Self {
            client: aws_sdk_s3::Client::new(&aws_config),
            bucket,
        })
    }

    /// Upload a local file under the given object key, returning its URL
    pub async fn upload_file(&self, local_file: &Path, file_name: &str) -> Result<String> {
        debug!("Uploading {} to S3 as {}", local_file.display(), file_name);

        let body = ByteStream::from_path(local_file)
            .await
            .context("Failed to read upload from disk")?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(file_name)
            .body(body)
            .send()
            .await
            .context("S3 upload failed")?;

        let download_url = format!("https://{}.s3.amazonaws.com/{}", self.bucket, file_name);
        debug!("Uploaded {} with download url {}", file_name, download_url);

        Ok(download_url)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_requires_bucket() {
        let client = StorageClient::new(&StorageConfig::default()).await;
        assert!(client.is_none());
    }
}
