//! HTTP client for the collaborator endpoints (`/api/upload`, `/api/preview`,
//! `/api/export-json`).
//!
//! Views depend on the `SkillSheetApi` trait so the transport can be swapped
//! in tests. No retries and no timeout: every call settles exactly once.

pub mod trigger;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::SkillSheetRecord;

pub use trigger::{TriggerControl, TriggerGuard};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ClientError {
    /// The server-supplied message, when there is one to show the user.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// The three collaborator calls made by the views.
#[async_trait]
pub trait SkillSheetApi: Send + Sync {
    async fn upload(&self, filename: &str, contents: Bytes)
        -> Result<SkillSheetRecord, ClientError>;

    async fn preview(&self, record: &SkillSheetRecord) -> Result<SkillSheetRecord, ClientError>;

    async fn export_json(&self, record: &SkillSheetRecord) -> Result<Bytes, ClientError>;
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Passes 2xx responses through; turns anything else into `ClientError::Api`.
    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&text)
            .ok()
            .map(|e| e.error.message);
        warn!("API returned {status}: {text}");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SkillSheetApi for HttpClient {
    async fn upload(
        &self,
        filename: &str,
        contents: Bytes,
    ) -> Result<SkillSheetRecord, ClientError> {
        debug!("Uploading {filename} ({} bytes)", contents.len());
        let part = Part::bytes(contents.to_vec())
            .file_name(filename.to_string())
            .mime_str("application/json")?;
        let response = self
            .http
            .post(self.url("/api/upload"))
            .multipart(Form::new().part("file", part))
            .send()
            .await?;
        let body = Self::check(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn preview(&self, record: &SkillSheetRecord) -> Result<SkillSheetRecord, ClientError> {
        let response = self
            .http
            .post(self.url("/api/preview"))
            .json(record)
            .send()
            .await?;
        let body = Self::check(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn export_json(&self, record: &SkillSheetRecord) -> Result<Bytes, ClientError> {
        let response = self
            .http
            .post(self.url("/api/export-json"))
            .json(record)
            .send()
            .await?;
        Ok(Self::check(response).await?.bytes().await?)
    }
}
