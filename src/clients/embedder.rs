//! Client for the embedding microservice.
//!
//! The service takes `{"text": …}` and answers `{"embedding": [f32…]}`.
//! Failures always propagate; a missing embedding is the caller's decision
//! to handle, never a silent zero vector.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const EMBED_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum EmbedderError {
    #[error("failed to build embedder client: {0}")]
    Build(String),
    #[error("embedding input is empty")]
    EmptyInput,
    #[error("embedder request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("embedder returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("embedder returned {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Turns a short text into a fixed-length vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError>;
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// Reqwest-based [`Embedder`] talking to the configured endpoint.
#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    url: Url,
    dimensions: Option<usize>,
}

impl HttpEmbedder {
    /// Builds a client for `url`. When `dimensions` is set, responses of any
    /// other length are rejected.
    pub fn new(url: &str, dimensions: Option<usize>) -> Result<Self, EmbedderError> {
        Ok(Self {
            client: Client::builder()
                .timeout(EMBED_TIMEOUT)
                .build()
                .map_err(|e| EmbedderError::Build(e.to_string()))?,
            url: Url::parse(url).map_err(|e| EmbedderError::Build(e.to_string()))?,
            dimensions,
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        if text.trim().is_empty() {
            return Err(EmbedderError::EmptyInput);
        }

        let response = self
            .client
            .post(self.url.clone())
            .json(&EmbedRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedderError::Status { status, body });
        }

        let payload: EmbedResponse = response.json().await?;

        if let Some(expected) = self.dimensions
            && payload.embedding.len() != expected
        {
            return Err(EmbedderError::DimensionMismatch {
                expected,
                actual: payload.embedding.len(),
            });
        }

        Ok(payload.embedding)
    }
}
