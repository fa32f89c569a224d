use crate::config::StorageConfig;
use async_trait::async_trait;
use chrono::Utc;
use playlist_primitives::{AudioFile, StorageUri};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);
const MOCK_UPLOAD_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum StorageServiceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upload failed: status={status} body={body}")]
    BadStatus { status: StatusCode, body: String },

    #[error("pinning service credentials are not configured")]
    NotConfigured,

    #[error("failed to read audio file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Capability to resolve a local audio file into a content-addressed
/// storage reference.
#[async_trait]
pub trait TrackUploader: Send + Sync {
    async fn upload(&self, file: &AudioFile) -> Result<StorageUri, StorageServiceError>;

    /// Durable playback URL for an uploaded reference, when one exists.
    /// The mock fallback has none; callers then derive a transient
    /// locator from the local file instead.
    fn playback_url(&self, uri: &StorageUri) -> Option<String>;
}

/// Real pinning-service client (Pinata-compatible surface)
#[derive(Debug)]
pub struct PinningUploader {
    client: reqwest::Client,
    config: StorageConfig,
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

impl PinningUploader {
    pub fn new(config: StorageConfig) -> Result<Self, StorageServiceError> {
        if !config.is_configured() {
            return Err(StorageServiceError::NotConfigured);
        }
        let client = reqwest::Client::builder().timeout(UPLOAD_TIMEOUT).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl TrackUploader for PinningUploader {
    async fn upload(&self, file: &AudioFile) -> Result<StorageUri, StorageServiceError> {
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|e| StorageServiceError::Io {
                path: file.path.clone(),
                source: e,
            })?;

        let metadata = json!({
            "name": file.name,
            "keyvalues": {
                "type": "audio",
                "uploadedAt": Utc::now().to_rfc3339(),
            }
        });
        let options = json!({ "cidVersion": 0 });

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file.name.clone()))
            .text("pinataMetadata", metadata.to_string())
            .text("pinataOptions", options.to_string());

        // Credentials are guaranteed by the constructor
        let (api_key, secret_key) = match (&self.config.api_key, &self.config.secret_key) {
            (Some(api_key), Some(secret_key)) => (api_key, secret_key),
            _ => return Err(StorageServiceError::NotConfigured),
        };

        tracing::debug!(file = %file.name, "uploading to pinning service");
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("pinata_api_key", api_key.as_str())
            .header("pinata_secret_api_key", secret_key.as_str())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageServiceError::BadStatus { status, body });
        }

        let pinned: PinResponse = response.json().await?;
        tracing::info!(file = %file.name, hash = %pinned.ipfs_hash, "file pinned");
        Ok(StorageUri::from_hash(pinned.ipfs_hash))
    }

    fn playback_url(&self, uri: &StorageUri) -> Option<String> {
        uri.is_content_addressed()
            .then(|| self.config.gateway_url(uri))
    }
}

/// Development fallback used when no pinning credentials are present.
///
/// Produces `mock-ipfs://` references that only identify the file by
/// name; nothing is actually stored, so there is no playback URL and
/// the upload delay is simulated.
pub struct MockUploader {
    delay: Duration,
}

impl MockUploader {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockUploader {
    fn default() -> Self {
        Self::new(MOCK_UPLOAD_DELAY)
    }
}

#[async_trait]
impl TrackUploader for MockUploader {
    async fn upload(&self, file: &AudioFile) -> Result<StorageUri, StorageServiceError> {
        tokio::time::sleep(self.delay).await;
        Ok(StorageUri::mock(&file.name))
    }

    fn playback_url(&self, _uri: &StorageUri) -> Option<String> {
        None
    }
}

/// Pick the uploader matching the configuration: the real client when
/// credentials are present, the mock fallback otherwise.
pub fn uploader_for(config: &StorageConfig) -> Result<Arc<dyn TrackUploader>, StorageServiceError> {
    if config.is_configured() {
        Ok(Arc::new(PinningUploader::new(config.clone())?))
    } else {
        tracing::info!("pinning credentials absent, falling back to mock uploads");
        Ok(Arc::new(MockUploader::default()))
    }
}
