//! Turning free-form user questions into answers from the processed store.

pub mod request;
pub mod resolver;
pub mod retrieval;

use thiserror::Error;

use crate::clients::embedder::EmbedderError;
use crate::clients::llm::LlmError;
use crate::repository::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("llm request failed: {0}")]
    Llm(#[from] LlmError),
    #[error("malformed request payload: {0}")]
    MalformedRequest(#[from] serde_json::Error),
    #[error("embedding failed: {0}")]
    Embedder(#[from] EmbedderError),
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("vector index error: {0}")]
    Index(String),
}
