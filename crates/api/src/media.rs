//! Hosted media storage.
//!
//! Uploaded images live with an external provider; the API only needs to
//! remove assets by their public id. [`MediaStore`] is the seam handlers use,
//! [`CloudinaryClient`] the signed REST implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::MediaConfig;

/// Default provider endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// HTTP request timeout for a single provider call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Media provider error ({status}): {body}")]
    Provider { status: u16, body: String },

    /// The provider answered but did not delete the asset.
    #[error("Media provider refused deletion: {0}")]
    Rejected(String),
}

/// Outcome of a delete call the provider accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaDeletion {
    Deleted,
    NotFound,
    /// Any other `result` value the provider reports.
    Other(String),
}

impl MediaDeletion {
    fn from_result(result: &str) -> Self {
        match result {
            "ok" => Self::Deleted,
            "not found" => Self::NotFound,
            other => Self::Other(other.to_string()),
        }
    }
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Remove the asset stored under `public_id`.
    async fn delete(&self, public_id: &str) -> Result<MediaDeletion, MediaError>;
}

// ---------------------------------------------------------------------------
// CloudinaryClient
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

pub struct CloudinaryClient {
    client: reqwest::Client,
    config: MediaConfig,
    api_base: String,
}

impl CloudinaryClient {
    pub fn new(config: MediaConfig) -> Result<Self, MediaError> {
        Self::with_api_base(config, DEFAULT_API_BASE.to_string())
    }

    /// Point the client at a different endpoint (staging, local mock).
    pub fn with_api_base(config: MediaConfig, api_base: String) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            config,
            api_base,
        })
    }

    fn destroy_url(&self) -> String {
        format!(
            "{}/{}/image/destroy",
            self.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }
}

/// SHA-256 request signature over the alphabetically ordered parameters
/// followed by the API secret.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    async fn delete(&self, public_id: &str) -> Result<MediaDeletion, MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("public_id", public_id), ("timestamp", &timestamp)],
            &self.config.api_secret,
        );

        let form = [
            ("public_id", public_id),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("signature", signature.as_str()),
            ("signature_algorithm", "sha256"),
        ];

        let response = self
            .client
            .post(self.destroy_url())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(MediaError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: DestroyResponse = response.json().await?;
        Ok(MediaDeletion::from_result(&parsed.result))
    }
}
