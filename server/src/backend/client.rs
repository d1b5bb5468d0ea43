use crate::backend::model::{DetectResponse, HealthResponse};
use crate::ingest::upload::ImageUpload;
use anyhow::Context;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// HTTP client for the external detection backend.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building detection backend client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends the image as the `file` part of a multipart `POST /detect`.
    pub async fn detect(&self, upload: &ImageUpload) -> Result<DetectResponse, BackendError> {
        let part = Part::bytes(upload.data.clone())
            .file_name(upload.filename.clone())
            .mime_str(&upload.content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/detect", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<DetectResponse>().await?)
    }

    pub async fn health(&self) -> Result<HealthResponse, BackendError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<HealthResponse>().await?)
    }
}
