//! Text-generation features layered over the alumni directory.
//!
//! Every operation except keyword expansion surfaces upstream failures as
//! [`AssistantError::Upstream`]; the directory itself keeps working when the
//! model is unreachable or unconfigured.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::clients::llm::{LlmError, TextGenerator};
use crate::config::LlmConfig;
use crate::db::Store;
use crate::models::alumni::AlumniCandidate;
use crate::services::{prompts, query_expansion};

/// Upper bound on rows handed to the ranking prompt.
pub const RANKED_SEARCH_LIMIT: u64 = 20;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Text generation unavailable: {0}")]
    Upstream(#[from] LlmError),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for AssistantError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SummaryRequest {
    pub name: String,
    pub major: String,
    pub work: String,
    pub bio: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DraftEmailRequest {
    pub topic: String,
    pub audience: String,
    pub style: String,
    pub points: Vec<String>,
}

impl Default for DraftEmailRequest {
    fn default() -> Self {
        Self {
            topic: prompts::DEFAULT_EMAIL_TOPIC.to_string(),
            audience: prompts::DEFAULT_EMAIL_AUDIENCE.to_string(),
            style: prompts::DEFAULT_EMAIL_STYLE.to_string(),
            points: Vec::new(),
        }
    }
}

/// Raw model ranking plus the candidates it was chosen from.
#[derive(Debug, Clone, Serialize)]
pub struct RankedSearch {
    pub ranked: Option<String>,
    pub candidates: Vec<AlumniCandidate>,
}

#[async_trait]
pub trait AssistantService: Send + Sync {
    async fn summarize(&self, request: SummaryRequest) -> Result<String, AssistantError>;

    async fn draft_email(&self, request: DraftEmailRequest) -> Result<String, AssistantError>;

    /// Runs a bounded substring search and asks the model to rank the hits.
    /// A blank query returns no candidates and skips the model.
    async fn ranked_search(&self, query: &str) -> Result<RankedSearch, AssistantError>;

    /// Never fails; see [`query_expansion::expand_query`].
    async fn expand(&self, query: &str) -> Vec<String>;
}

pub struct DefaultAssistantService {
    store: Store,
    generator: Arc<dyn TextGenerator>,
    system_prompt: String,
    temperature: f32,
}

impl DefaultAssistantService {
    #[must_use]
    pub fn new(store: Store, generator: Arc<dyn TextGenerator>, config: &LlmConfig) -> Self {
        Self {
            store,
            generator,
            system_prompt: config.system_prompt.clone(),
            temperature: config.temperature,
        }
    }

    async fn ask(&self, prompt: &str) -> Result<String, AssistantError> {
        self.generator
            .ask(prompt, &self.system_prompt, self.temperature)
            .await
            .map_err(|e| {
                warn!("Text generation failed: {e}");
                AssistantError::Upstream(e)
            })
    }
}

#[async_trait]
impl AssistantService for DefaultAssistantService {
    async fn summarize(&self, request: SummaryRequest) -> Result<String, AssistantError> {
        let prompt = prompts::summary_prompt(
            request.name.trim(),
            request.major.trim(),
            request.work.trim(),
            request.bio.trim(),
        );
        self.ask(&prompt).await
    }

    async fn draft_email(&self, request: DraftEmailRequest) -> Result<String, AssistantError> {
        let points: Vec<String> = request
            .points
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        let prompt =
            prompts::draft_email_prompt(&request.topic, &request.audience, &request.style, &points);
        self.ask(&prompt).await
    }

    async fn ranked_search(&self, query: &str) -> Result<RankedSearch, AssistantError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(RankedSearch {
                ranked: None,
                candidates: Vec::new(),
            });
        }

        let candidates: Vec<AlumniCandidate> = self
            .store
            .search_alumni(query, RANKED_SEARCH_LIMIT)
            .await?
            .into_iter()
            .map(AlumniCandidate::from)
            .collect();

        let prompt = prompts::ranked_search_prompt(query, &candidates, RANKED_SEARCH_LIMIT);
        let ranked = self.ask(&prompt).await?;

        info!(query, candidates = candidates.len(), "Ranked search completed");
        Ok(RankedSearch {
            ranked: Some(ranked),
            candidates,
        })
    }

    async fn expand(&self, query: &str) -> Vec<String> {
        query_expansion::expand_query(
            self.generator.as_ref(),
            query,
            &self.system_prompt,
            self.temperature,
        )
        .await
    }
}
