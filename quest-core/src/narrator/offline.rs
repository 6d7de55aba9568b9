//! A narrator that needs no network.
//!
//! Cycles through canned scenes. Used by the CLI when no API key is
//! available, and handy for demos. One narrator may serve many sessions, so
//! the scene cursor is shared and only ever moves forward.

use super::{Narrator, NarratorError};
use crate::cards::CardWriter;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

const SCENES: [&str; 5] = [
    "A narrow trail winds between mossy boulders. Somewhere ahead, water is running.",
    "A wooden bridge sways over a gorge. A hooded figure waits on the far side.",
    "The trail opens onto a ruined watchtower. Scratches on the door look recent.",
    "Lanterns glow in a small market square. A merchant waves you over, smiling too widely.",
    "Dusk settles over a silent lake. Something glints beneath the surface near the shore.",
];

const SUGGESTIONS: &str = "\
1. Charge ahead before you lose your nerve | stat: courage | a faster path
2. Study your surroundings for clues | stat: wisdom | a hidden detail
3. Sneak around and trust to chance | stat: luck | an unexpected find";

#[derive(Debug, Default)]
pub struct OfflineNarrator {
    next: AtomicUsize,
}

impl OfflineNarrator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Narrator for OfflineNarrator {
    async fn generate_opening_scene(&self, player_name: &str) -> Result<String, NarratorError> {
        Ok(format!(
            "{player_name}, you stand at a crossroads at dawn. Three roads lead away \
             and a crow watches you from a signpost."
        ))
    }

    async fn continue_scene(&self, _context: &str) -> Result<String, NarratorError> {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        Ok(SCENES[index % SCENES.len()].to_string())
    }

    async fn suggest_actions(&self, _scene: &str) -> Result<String, NarratorError> {
        Ok(SUGGESTIONS.to_string())
    }
}

#[async_trait]
impl CardWriter for OfflineNarrator {
    async fn generate_cards(
        &self,
        count: usize,
        inspiration: &[String],
    ) -> Result<String, NarratorError> {
        Ok(inspiration
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, card)| format!("{}. {card}", i + 1))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
