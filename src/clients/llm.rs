//! Client for an OpenAI-compatible chat-completions API.
//!
//! Completions are requested at temperature 0 with a system and a user
//! message; the caller owns prompt content and response parsing.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("failed to build LLM client: {0}")]
    Build(String),
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("LLM returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("LLM response contained no choices")]
    EmptyResponse,
}

/// A model endpoint that answers a system+user prompt pair with text the
/// caller expects to be machine-parseable.
#[async_trait]
pub trait StructuredCompletion: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Reqwest-based [`StructuredCompletion`] implementation.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: Url,
    model: String,
    api_key: Option<String>,
}

impl ChatClient {
    pub fn new(base_url: &str, model: &str, api_key: Option<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::new(),
            base_url: Url::parse(base_url).map_err(|e| LlmError::Build(e.to_string()))?,
            model: model.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl StructuredCompletion for ChatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        );

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.0,
        };

        let mut builder = self.client.post(url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let payload: ChatResponse = response.json().await?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}
