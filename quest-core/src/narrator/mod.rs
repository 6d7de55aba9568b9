//! Narrative generation.
//!
//! The engine never writes prose itself. It hands a context string to a
//! [`Narrator`] and stores whatever comes back as the current scene. Narrators
//! are treated as unreliable: every call is attempted once and the engine
//! substitutes fallback text on error.

mod llm;
mod offline;
pub mod prompts;

pub use llm::GroqNarrator;
pub use offline::OfflineNarrator;

use async_trait::async_trait;
use thiserror::Error;

/// Scene used when the opening beat cannot be generated.
pub const FALLBACK_OPENING_SCENE: &str =
    "You wake at a quiet crossroads under a grey sky. Three roads lead away: \
     one toward a dark forest, one toward a distant town, one up into the hills.";

/// Scene used when a follow-up beat cannot be generated.
pub const FALLBACK_SCENE: &str =
    "The world holds its breath for a moment. Nothing seems to change, \
     but the road ahead is still waiting for you.";

/// Errors from a narrative generator.
#[derive(Debug, Error)]
pub enum NarratorError {
    #[error("Generator client error: {0}")]
    Client(#[from] groq::Error),

    #[error("Unusable generator output: {0}")]
    Format(String),
}

/// Source of scene prose and action suggestions.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// The first scene of a new game.
    async fn generate_opening_scene(&self, player_name: &str) -> Result<String, NarratorError>;

    /// The next scene, given what just happened.
    async fn continue_scene(&self, context: &str) -> Result<String, NarratorError>;

    /// Raw suggestion lines for a scene, one per line, fields split by `|`.
    ///
    /// See [`crate::suggestions::parse_suggestions`] for the format.
    async fn suggest_actions(&self, scene: &str) -> Result<String, NarratorError>;
}

/// Settings for LLM-backed narrators.
#[derive(Debug, Clone)]
pub struct NarratorConfig {
    /// Model override; the client default is used when `None`.
    pub model: Option<String>,

    /// Maximum tokens per generated beat.
    pub max_tokens: usize,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Custom system prompt for scene generation.
    pub system_prompt: Option<String>,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 512,
            temperature: Some(0.9),
            system_prompt: None,
        }
    }
}

impl NarratorConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = tokens;
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// Trim generator output, rejecting blank text.
pub(crate) fn non_empty(text: String, what: &str) -> Result<String, NarratorError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(NarratorError::Format(format!("empty {what}")))
    } else {
        Ok(trimmed.to_string())
    }
}
