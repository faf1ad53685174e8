//! Typed transport to the backend REST API
//!
//! Every outbound call attaches the `X-Admin-Password` header when a
//! credential is present in the store (read per call). A 401 response
//! publishes `ClientEvent::AuthorizationRequired` on the bus exactly once
//! for that call, then still resolves the call as an error so the
//! caller's local error path runs. Nothing here retries or replays.

use brinelog_common::config::ClientConfig;
use brinelog_common::events::{ClientEvent, EventBus};
use brinelog_common::{Error, Result};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::credentials::CredentialStore;

/// Credential header consumed by the backend's admin guard
pub const ADMIN_PASSWORD_HEADER: &str = "X-Admin-Password";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend error body shape (`{"detail": "..."}`)
#[derive(serde::Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Thin typed HTTP client for the backend
pub struct ResourceClient {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialStore,
    events: EventBus,
}

impl ResourceClient {
    pub fn new(config: &ClientConfig, events: EventBus) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: CredentialStore::new(config.credential_file.clone()),
            events,
        })
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Persist a credential supplied by the login surface
    ///
    /// Future calls pick it up automatically; the call that triggered the
    /// authorization-required event is not replayed.
    pub fn store_credential(&self, credential: &str) -> Result<()> {
        self.credentials.store(credential)?;
        self.events.emit(ClientEvent::CredentialStored {
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }

    pub fn clear_credential(&self) -> Result<()> {
        self.credentials.clear()?;
        self.events.emit(ClientEvent::CredentialCleared {
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.send(Method::GET, path, query, None::<&()>).await?;
        decode_json(path, response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, &[], Some(body)).await?;
        decode_json(path, response).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PATCH, path, &[], Some(body)).await?;
        decode_json(path, response).await
    }

    /// DELETE, discarding the acknowledgement body
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, &[], None::<&()>).await?;
        Ok(())
    }

    /// DELETE that returns a body (clearing a note's image returns the
    /// updated note)
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::DELETE, path, &[], None::<&()>).await?;
        decode_json(path, response).await
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);

        if !query.is_empty() {
            request = request.query(query);
        }
        // Lazily read per call; the file is the source of truth
        if let Some(credential) = self.credentials.load() {
            request = request.header(ADMIN_PASSWORD_HEADER, credential);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, path, "issuing request");

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = extract_detail(response).await;
        Err(self.failure_for(path, status, detail))
    }

    /// Map a non-success status to the error taxonomy, emitting the
    /// authorization-required event for 401 (once per failing call).
    fn failure_for(&self, path: &str, status: StatusCode, detail: String) -> Error {
        match status {
            StatusCode::UNAUTHORIZED => {
                self.events.emit(ClientEvent::AuthorizationRequired {
                    path: path.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                Error::AuthorizationRequired
            }
            StatusCode::NOT_FOUND => Error::NotFound(detail),
            s if s.is_client_error() => Error::Validation(detail),
            s => Error::Transport(format!("{}: {}", s, detail)),
        }
    }
}

/// Pull the human-readable message out of a FastAPI-style error body
async fn extract_detail(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.detail)
        .unwrap_or_else(|_| {
            if text.is_empty() {
                status.to_string()
            } else {
                text
            }
        })
}

async fn decode_json<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| Error::Transport(format!("decoding {} response failed: {}", path, e)))
}
