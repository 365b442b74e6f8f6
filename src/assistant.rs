//! Text completion service used for procedural SQL.
//!
//! The pipeline talks to the assistant only through [`TextCompletionService`].
//! [`OllamaClient`] speaks the Ollama `/api/chat` protocol.

use crate::config::ConverterConfig;
use crate::error::{ConvertError, ServiceError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A stateless request/response text generator.
///
/// Implementations must be reentrant: the converter may issue calls from
/// several tasks at once.
#[async_trait]
pub trait TextCompletionService: Send + Sync {
    /// Send an ordered conversation and return the reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ServiceError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// Client for an Ollama-compatible chat endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl OllamaClient {
    /// Build a client. Every call fails once `timeout` elapses.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ConvertError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConvertError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            model: model.into(),
            timeout,
        })
    }

    pub fn from_config(config: &ConverterConfig) -> Result<Self, ConvertError> {
        Self::new(&config.endpoint, &config.model, config.timeout())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.endpoint.trim_end_matches('/'))
    }

    fn map_error(&self, e: reqwest::Error) -> ServiceError {
        if e.is_timeout() {
            ServiceError::Timeout(self.timeout.as_secs())
        } else if e.is_decode() {
            ServiceError::Decode(e.to_string())
        } else {
            ServiceError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl TextCompletionService for OllamaClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ServiceError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        debug!(model = %self.model, messages = messages.len(), "sending chat request");

        let response = self
            .http
            .post(self.chat_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await.map_err(|e| self.map_error(e))?;
        debug!(chars = reply.message.content.len(), "chat response received");
        Ok(reply.message.content)
    }
}
