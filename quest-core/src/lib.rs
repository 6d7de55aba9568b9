//! Turn-based narrative game engine with an LLM narrator.
//!
//! This crate provides:
//! - A small stat model and keyword-driven action classifier
//! - Probabilistic stat checks with an injectable random source
//! - A turn engine that records every resolved action
//! - Groq-backed and offline narrators, with fallbacks on failure
//! - A registry for running many sessions at once
//! - A card-matching variant of the same session shape
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use quest_core::{GroqNarrator, SessionConfig, TurnEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let narrator = Arc::new(GroqNarrator::from_env()?);
//!     let mut engine = TurnEngine::new(narrator, SessionConfig::default());
//!
//!     let start = engine.start_game("Ava").await?;
//!     println!("{}", start.event);
//!
//!     let turn = engine.respond_to_event("I sneak past the guards").await?;
//!     println!("{} (stat: {})", turn.outcome, turn.stat_used);
//!     Ok(())
//! }
//! ```

pub mod cards;
pub mod check;
pub mod classify;
pub mod engine;
pub mod narrator;
pub mod registry;
pub mod session;
pub mod stats;
pub mod suggestions;
pub mod testing;

// Primary public API
pub use cards::{CardError, CardGame, CardPool, CardWriter, RoundResult, RoundStart, Winner};
pub use check::{CheckOutcome, CheckResolver};
pub use engine::{EngineError, StartResponse, TurnEngine, TurnResponse};
pub use narrator::{GroqNarrator, Narrator, NarratorConfig, NarratorError, OfflineNarrator};
pub use registry::{RegistryError, SessionId, SessionRegistry};
pub use session::{SessionConfig, SessionState, TurnRecord};
pub use stats::{StatName, Stats};
pub use suggestions::ActionSuggestion;
pub use testing::{MockNarrator, TestHarness};
