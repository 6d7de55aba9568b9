//! Groq-backed narrator.

use super::{non_empty, prompts, Narrator, NarratorConfig, NarratorError};
use crate::cards::CardWriter;
use async_trait::async_trait;
use groq::{FinishReason, Groq, Message, Request};

/// Narrator that generates scenes, suggestions and cards through Groq.
///
/// Each call is a single request; failures are returned as-is and the caller
/// decides on fallbacks.
#[derive(Debug, Clone)]
pub struct GroqNarrator {
    client: Groq,
    config: NarratorConfig,
}

impl GroqNarrator {
    pub fn new(client: Groq) -> Self {
        Self {
            client,
            config: NarratorConfig::default(),
        }
    }

    /// Create a narrator from the `GROQ_*` environment variables.
    pub fn from_env() -> Result<Self, NarratorError> {
        Ok(Self::new(Groq::from_env()?))
    }

    pub fn with_config(mut self, config: NarratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &NarratorConfig {
        &self.config
    }

    async fn ask(&self, system: &str, prompt: String) -> Result<String, NarratorError> {
        let mut request = Request::new(vec![Message::user(prompt)])
            .with_system(system)
            .with_max_tokens(self.config.max_tokens);

        if let Some(ref model) = self.config.model {
            request = request.with_model(model);
        }

        if let Some(temp) = self.config.temperature {
            request = request.with_temperature(temp);
        }

        let response = self.client.complete(request).await?;
        tracing::debug!(
            id = %response.id,
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "narrator completion"
        );
        if response.finish_reason == FinishReason::Length {
            tracing::warn!(
                max_tokens = self.config.max_tokens,
                "narrator output hit the token limit"
            );
        }
        Ok(response.content)
    }

    fn storyteller_prompt(&self) -> &str {
        self.config
            .system_prompt
            .as_deref()
            .unwrap_or(prompts::STORYTELLER_PROMPT)
    }
}

#[async_trait]
impl Narrator for GroqNarrator {
    async fn generate_opening_scene(&self, player_name: &str) -> Result<String, NarratorError> {
        let text = self
            .ask(self.storyteller_prompt(), prompts::opening_scene(player_name))
            .await?;
        non_empty(text, "opening scene")
    }

    async fn continue_scene(&self, context: &str) -> Result<String, NarratorError> {
        let text = self
            .ask(self.storyteller_prompt(), prompts::continue_scene(context))
            .await?;
        non_empty(text, "scene")
    }

    async fn suggest_actions(&self, scene: &str) -> Result<String, NarratorError> {
        let text = self
            .ask(prompts::SUGGESTION_PROMPT, prompts::suggest_actions(scene))
            .await?;
        non_empty(text, "suggestion list")
    }
}

#[async_trait]
impl CardWriter for GroqNarrator {
    async fn generate_cards(
        &self,
        count: usize,
        inspiration: &[String],
    ) -> Result<String, NarratorError> {
        let text = self
            .ask(prompts::CARD_PROMPT, prompts::generate_cards(count, inspiration))
            .await?;
        non_empty(text, "card list")
    }
}
