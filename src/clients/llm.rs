//! Client for OpenAI-compatible chat completion endpoints.
//!
//! Every call is a single attempt: a transport failure, a non-2xx status or a
//! reply without text is returned to the caller as an [`LlmError`].

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT_ENCODING;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::LlmConfig;

const COMPLETIONS_PATH: &str = "/chat/completions";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM endpoint is not configured (base URL / API key missing)")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Anything that can turn a prompt into text. The HTTP client is the only
/// production implementation; tests substitute canned replies.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn ask(&self, prompt: &str, system: &str, temperature: f32) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Pulls `choices[0].message.content` out of a chat completion body.
fn extract_reply(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(LlmError::EmptyContent)
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    /// Builds the HTTP client. Missing credentials are not checked here; they
    /// surface as [`LlmError::NotConfigured`] on the first call.
    pub fn new(config: &LlmConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("alumni/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build LLM HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> Result<String, LlmError> {
        if self.base_url.is_empty() || self.api_key.is_empty() {
            return Err(LlmError::NotConfigured);
        }
        Ok(format!("{}{COMPLETIONS_PATH}", self.base_url))
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn ask(&self, prompt: &str, system: &str, temperature: f32) -> Result<String, LlmError> {
        let url = self.endpoint()?;

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature,
            stream: false,
        };

        // Uncompressed body only
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT_ENCODING, "identity")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let reply = extract_reply(&text)?;
        debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            reply_chars = reply.chars().count(),
            "LLM call succeeded"
        );

        Ok(reply)
    }
}
