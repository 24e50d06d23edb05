//! Background-removal service client.
//!
//! The removal service is an external collaborator: it takes image bytes and
//! returns background-stripped image bytes, or fails. The [`BackgroundRemover`]
//! trait keeps the rest of the codebase service-agnostic; the production
//! implementation is [`HttpRemover`], which POSTs a multipart body with the
//! image and authenticates with an API-key header.
//!
//! Failures are surfaced as-is to the user — there is no retry logic. The
//! session's single-flight gate ([`crate::session::EditSession::begin_removal`])
//! ensures one submission is outstanding at a time.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemovalError {
    #[error("removal service is not configured (set the endpoint and API key)")]
    NotConfigured,
    #[error("removal service returned {status}: {message}")]
    Service { status: u16, message: String },
    #[error("removal request failed: {0}")]
    Transport(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for background-removal collaborators.
pub trait BackgroundRemover {
    /// Strip the background from `image`, returning the processed image
    /// bytes. `filename` travels along in the multipart body so the service
    /// can infer the input format.
    fn remove(&self, image: &[u8], filename: &str) -> Result<Vec<u8>, RemovalError>;
}

/// HTTP implementation: multipart POST with an `X-Api-Key` header.
pub struct HttpRemover {
    endpoint: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl HttpRemover {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemovalError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemovalError::Transport(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client,
        })
    }
}

impl BackgroundRemover for HttpRemover {
    fn remove(&self, image: &[u8], filename: &str) -> Result<Vec<u8>, RemovalError> {
        let part = reqwest::blocking::multipart::Part::bytes(image.to_vec())
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| RemovalError::Transport(e.to_string()))?;
        let form = reqwest::blocking::multipart::Form::new().part("image_file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Api-Key", &self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| RemovalError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Surface the service's own message, capped to a terminal line
            let mut message = response.text().unwrap_or_default();
            message.truncate(200);
            return Err(RemovalError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| RemovalError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
