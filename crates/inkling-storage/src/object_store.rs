//! HTTP object store speaking the GCS JSON/media API.
//!
//! Uploads go through the media endpoint
//! (`POST {endpoint}/upload/storage/v1/b/{bucket}/o?uploadType=media&name={path}`)
//! and downloads through
//! (`GET {endpoint}/storage/v1/b/{bucket}/o/{object}?alt=media`).
//! Objects are addressed publicly as `https://{host}/{bucket}/{path}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use inkling_core::defaults::{STORAGE_ENDPOINT, STORAGE_HOST, STORAGE_TIMEOUT_SECS};
use inkling_core::{Error, Result};

/// Storage backend trait for different storage providers.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload data to the given blob path. Returns the public URL.
    async fn put(&self, data: &[u8], path: &str, content_type: &str) -> Result<String>;

    /// Download an object by its public URL.
    async fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// Configuration for [`HttpObjectStore`].
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Bucket all objects live in.
    pub bucket: String,
    /// API endpoint for uploads and downloads.
    pub endpoint: String,
    /// Host used in public object URLs, and accepted when parsing them.
    pub public_host: String,
    /// Bearer token, sent when present.
    pub token: Option<String>,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

impl StorageConfig {
    /// Create a configuration for the given bucket with default endpoints.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            endpoint: STORAGE_ENDPOINT.to_string(),
            public_host: STORAGE_HOST.to_string(),
            token: None,
            timeout_secs: STORAGE_TIMEOUT_SECS,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// `BUCKET_NAME` is required; `STORAGE_ENDPOINT`, `STORAGE_PUBLIC_HOST`
    /// and `STORAGE_TOKEN` override their defaults when set.
    pub fn from_env() -> Result<Self> {
        let bucket = std::env::var("BUCKET_NAME")
            .map_err(|_| Error::Config("BUCKET_NAME must be set in the environment".to_string()))?;

        let mut config = Self::new(bucket);
        if let Ok(endpoint) = std::env::var("STORAGE_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(host) = std::env::var("STORAGE_PUBLIC_HOST") {
            config.public_host = host;
        }
        config.token = std::env::var("STORAGE_TOKEN").ok();
        Ok(config)
    }
}

/// Object store talking the GCS JSON/media API over HTTP.
pub struct HttpObjectStore {
    client: Client,
    config: StorageConfig,
}

impl HttpObjectStore {
    /// Create a new store with the given configuration.
    pub fn new(config: StorageConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Public URL for an object in the configured bucket.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "https://{}/{}/{}",
            self.config.public_host, self.config.bucket, path
        )
    }

    fn transport_error(op: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(format!("storage {} timed out: {}", op, e))
        } else {
            Error::Upstream(format!("storage {} failed: {}", op, e))
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(&self, data: &[u8], path: &str, content_type: &str) -> Result<String> {
        debug!(
            subsystem = "storage",
            blob_path = %path,
            size = data.len(),
            content_type = %content_type,
            "object_store: upload"
        );

        let url = format!(
            "{}/upload/storage/v1/b/{}/o",
            self.config.endpoint.trim_end_matches('/'),
            self.config.bucket
        );
        let mut request = self
            .client
            .post(&url)
            .query(&[("uploadType", "media"), ("name", path)])
            .header("Content-Type", content_type)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .body(data.to_vec());
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Self::transport_error("upload", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                subsystem = "storage",
                blob_path = %path,
                status = %status,
                "object_store: upload rejected"
            );
            return Err(Error::Upstream(format!(
                "storage upload returned {}: {}",
                status, body
            )));
        }

        Ok(self.public_url(path))
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let (bucket, object) = parse_object_url(url, &self.config.public_host)?;

        debug!(
            subsystem = "storage",
            bucket = %bucket,
            object = %object,
            "object_store: download"
        );

        let download_url = format!(
            "{}/storage/v1/b/{}/o/{}",
            self.config.endpoint.trim_end_matches('/'),
            bucket,
            urlencoding::encode(&object)
        );
        let mut request = self
            .client
            .get(&download_url)
            .query(&[("alt", "media")])
            .timeout(Duration::from_secs(self.config.timeout_secs));
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Self::transport_error("download", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "storage download returned {} for {}",
                status, url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::transport_error("download", e))?;
        Ok(bytes.to_vec())
    }
}

/// Split a public object URL into `(bucket, object)`.
///
/// Accepts only `https://{expected_host}/{bucket}/{object}`; anything else
/// is rejected before a network call is made.
pub fn parse_object_url(url: &str, expected_host: &str) -> Result<(String, String)> {
    let rest = url.strip_prefix("https://").ok_or_else(|| {
        Error::InvalidUrl(format!("URL must start with https://{}", expected_host))
    })?;

    let (host, path) = rest.split_once('/').ok_or_else(|| {
        Error::InvalidUrl("Invalid object URL; expected /<bucket>/<object>".to_string())
    })?;
    if host != expected_host {
        return Err(Error::InvalidUrl(format!(
            "URL must start with https://{}",
            expected_host
        )));
    }

    match path.split_once('/') {
        Some((bucket, object)) if !bucket.is_empty() && !object.is_empty() => {
            Ok((bucket.to_string(), object.to_string()))
        }
        _ => Err(Error::InvalidUrl(
            "Invalid object URL; expected /<bucket>/<object>".to_string(),
        )),
    }
}
