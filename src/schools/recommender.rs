//! Recommendation client: turns a profile into recommended schools.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::RecommendError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

use super::catalog::SchoolCatalog;
use super::model::{School, UserProfile};
use super::prompts::{parse_schools, recommendation_system_prompt, recommendation_user_prompt};

/// Anything that can recommend schools for a profile.
#[async_trait]
pub trait SchoolRecommender: Send + Sync {
    async fn recommend(&self, profile: &UserProfile) -> Result<Vec<School>, RecommendError>;
}

/// Configuration for LLM-backed recommendations.
#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    /// Maximum number of schools to return.
    pub max_results: usize,
    /// LLM temperature.
    pub temperature: f32,
    /// Max tokens for the LLM response.
    pub max_tokens: u32,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            temperature: 0.4,
            max_tokens: 2048,
        }
    }
}

/// Asks an LLM for recommendations and parses its JSON answer.
pub struct LlmRecommender {
    llm: Arc<dyn LlmProvider>,
    catalog: Option<SchoolCatalog>,
    config: RecommenderConfig,
}

impl LlmRecommender {
    pub fn new(llm: Arc<dyn LlmProvider>, config: RecommenderConfig) -> Self {
        Self {
            llm,
            catalog: None,
            config,
        }
    }

    /// Restrict recommendations to a curated list.
    pub fn with_catalog(mut self, catalog: SchoolCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    fn build_request(&self, profile: &UserProfile) -> CompletionRequest {
        CompletionRequest::new(vec![
            ChatMessage::system(recommendation_system_prompt(
                self.config.max_results,
                self.catalog.as_ref(),
            )),
            ChatMessage::user(recommendation_user_prompt(profile)),
        ])
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens)
        .with_json_output()
    }
}

#[async_trait]
impl SchoolRecommender for LlmRecommender {
    async fn recommend(&self, profile: &UserProfile) -> Result<Vec<School>, RecommendError> {
        info!(
            model = self.llm.model_name(),
            neighborhood = %profile.neighborhood,
            level = %profile.level,
            "Requesting school recommendations"
        );

        let response = self.llm.complete(self.build_request(profile)).await?;
        let schools = parse_schools(&response.content, self.config.max_results)?;

        info!(
            count = schools.len(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Received school recommendations"
        );

        Ok(schools)
    }
}
