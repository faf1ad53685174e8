//! Signed image upload
//!
//! Three steps, in order, all-or-nothing:
//! 1. fetch a one-time signature from the backend (`GET /signature`),
//! 2. multipart-POST the raw file plus signature fields directly to the
//!    media host (upload credentials never live client-side),
//! 3. hand the resulting public URL back to the caller, which links it
//!    to a domain record (batch image or note image).
//!
//! A failure at any step aborts the flow with no partial state: the
//! media host is never contacted without a signature, and no domain
//! record is linked without a hosted URL.

use async_trait::async_trait;
use brinelog_common::api::UploadSignature;
use brinelog_common::config::ClientConfig;
use brinelog_common::{Error, Result};
use base64::Engine as _;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::transport::ResourceClient;

const MEDIA_TIMEOUT: Duration = Duration::from_secs(120);

/// Seam over `GET /signature?upload_preset=...`
#[async_trait]
pub trait SignatureSource: Send + Sync {
    async fn fetch_signature(&self, upload_preset: &str) -> Result<UploadSignature>;
}

#[async_trait]
impl SignatureSource for ResourceClient {
    async fn fetch_signature(&self, upload_preset: &str) -> Result<UploadSignature> {
        self.get(
            "/signature",
            &[("upload_preset", upload_preset.to_string())],
        )
        .await
    }
}

/// Everything the media host needs for one signed upload
#[derive(Debug, Clone)]
pub struct MediaUploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub upload_preset: String,
    pub timestamp: i64,
    pub signature: String,
    pub api_key: String,
}

/// Seam over the direct-to-media-host upload
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Upload and return the hosted public URL
    async fn upload(&self, request: MediaUploadRequest) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    secure_url: String,
}

/// Cloudinary-compatible media host over multipart HTTP
pub struct HttpMediaHost {
    http: reqwest::Client,
    upload_url: String,
}

impl HttpMediaHost {
    pub fn new(upload_url: impl Into<String>) -> Result<Self> {
        let upload_url = upload_url.into();
        if upload_url.is_empty() {
            return Err(Error::Config(
                "media upload URL not configured (set cloud_name or media_upload_url)".to_string(),
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(MEDIA_TIMEOUT)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self { http, upload_url })
    }
}

#[async_trait]
impl MediaHost for HttpMediaHost {
    async fn upload(&self, request: MediaUploadRequest) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(request.bytes)
            .file_name(request.file_name.clone());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", request.upload_preset)
            .text("timestamp", request.timestamp.to_string())
            .text("signature", request.signature)
            .text("api_key", request.api_key);

        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "media host rejected upload ({}): {}",
                status, body
            )));
        }

        let body: MediaUploadResponse = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("media host response: {}", e)))?;
        Ok(body.secure_url)
    }
}

/// Orchestrates the three-step signed upload
pub struct SignedUploadCoordinator {
    signatures: Arc<dyn SignatureSource>,
    media_host: Arc<dyn MediaHost>,
    upload_preset: String,
    api_key: String,
}

impl SignedUploadCoordinator {
    /// Wire the coordinator against the real backend and media host
    pub fn new(transport: Arc<ResourceClient>, config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_parts(
            transport,
            Arc::new(HttpMediaHost::new(config.media_upload_url.clone())?),
            &config.upload_preset,
            &config.api_key,
        ))
    }

    /// Explicit seams, used by tests and alternative hosts
    pub fn with_parts(
        signatures: Arc<dyn SignatureSource>,
        media_host: Arc<dyn MediaHost>,
        upload_preset: &str,
        api_key: &str,
    ) -> Self {
        Self {
            signatures,
            media_host,
            upload_preset: upload_preset.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Run steps 1 and 2; the caller performs step 3 (linking the URL)
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        // Step 1: signature. Failure aborts before the media host is
        // ever contacted.
        let signature = self.signatures.fetch_signature(&self.upload_preset).await?;

        tracing::debug!(file_name, timestamp = signature.timestamp, "signature obtained");

        // Step 2: direct upload.
        let url = self
            .media_host
            .upload(MediaUploadRequest {
                file_name: file_name.to_string(),
                bytes,
                upload_preset: self.upload_preset.clone(),
                timestamp: signature.timestamp,
                signature: signature.signature,
                api_key: self.api_key.clone(),
            })
            .await?;

        tracing::info!(file_name, url = %url, "image uploaded");
        Ok(url)
    }
}

/// Local preview derived from the raw file, never from the network
#[derive(Debug, Clone)]
pub struct LocalPreview {
    pub file_name: String,
    /// `data:` URL the shell can render immediately
    pub data_url: String,
}

impl LocalPreview {
    fn derive(file_name: &str, bytes: &[u8]) -> Self {
        let mime = match file_name.rsplit('.').next() {
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            _ => "application/octet-stream",
        };
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self {
            file_name: file_name.to_string(),
            data_url: format!("data:{};base64,{}", mime, encoded),
        }
    }
}

/// Preview-and-guard state machine around one upload control
///
/// The preview appears on selection and stays visible through all three
/// protocol steps. It is discarded on failure, on explicit [`clear`],
/// or on success when `auto_clear` is set (edit surfaces that move the
/// image into a grid). One upload at a time: a selection arriving while
/// one is in flight is rejected, matching the disabled control.
///
/// [`clear`]: UploadControl::clear
pub struct UploadControl {
    coordinator: Arc<SignedUploadCoordinator>,
    auto_clear: bool,
    uploading: bool,
    preview: Option<LocalPreview>,
}

impl UploadControl {
    pub fn new(coordinator: Arc<SignedUploadCoordinator>, auto_clear: bool) -> Self {
        Self {
            coordinator,
            auto_clear,
            uploading: false,
            preview: None,
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn preview(&self) -> Option<&LocalPreview> {
        self.preview.as_ref()
    }

    /// Select a file and run the full upload
    ///
    /// Returns the hosted URL for the caller to link (step 3).
    pub async fn select_file(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        self.begin_selection(file_name, &bytes)?;
        let outcome = self.coordinator.upload(file_name, bytes).await;
        self.finish_selection(&outcome);
        outcome
    }

    /// Guard + immediate local preview (state transition only)
    fn begin_selection(&mut self, file_name: &str, bytes: &[u8]) -> Result<()> {
        if self.uploading {
            return Err(Error::InvalidInput(
                "an upload is already in progress".to_string(),
            ));
        }
        self.preview = Some(LocalPreview::derive(file_name, bytes));
        self.uploading = true;
        Ok(())
    }

    fn finish_selection(&mut self, outcome: &Result<String>) {
        self.uploading = false;
        match outcome {
            Ok(_) => {
                if self.auto_clear {
                    self.preview = None;
                }
            }
            Err(e) => {
                tracing::error!("upload failed: {}", e);
                self.preview = None;
            }
        }
    }

    /// Explicit user cancellation of the preview. Refused mid-upload
    /// (the clear affordance is hidden while uploading).
    pub fn clear(&mut self) -> bool {
        if self.uploading {
            return false;
        }
        self.preview = None;
        true
    }
}
