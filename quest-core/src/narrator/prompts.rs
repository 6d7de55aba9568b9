//! Prompt text sent to LLM narrators.

/// System prompt for scene generation.
pub const STORYTELLER_PROMPT: &str = "You are the narrator of a text adventure RPG. \
Write in second person, present tense. Keep each scene to one or two short paragraphs. \
End every scene with a situation the player can act on. Never list choices for the player \
and never decide what the player does next. Stat checks are resolved by the game, not by \
you: when you are told a check succeeded or failed, narrate that result faithfully.";

/// System prompt for action suggestions.
pub const SUGGESTION_PROMPT: &str = "You suggest actions for a text adventure RPG. \
Reply with exactly three lines and nothing else. Each line has the form:\n\
1. <short action> | stat: <courage|wisdom|charisma|luck> | <reward if it works>\n\
Pick the stat the action relies on most.";

/// System prompt for the card game.
pub const CARD_PROMPT: &str = "You are a game master for a party card game where players \
answer a fill-in-the-blank question with the funniest card in their hand. \
Reply with a numbered list of answer cards, one per line, and nothing else.";

/// User prompt for the opening scene.
pub fn opening_scene(player_name: &str) -> String {
    format!(
        "A new adventure begins for a hero named {player_name}. \
         Describe the opening scene: where they are and what draws their attention."
    )
}

/// User prompt for the next scene.
pub fn continue_scene(context: &str) -> String {
    format!("{context}\n\nContinue the story with the next scene.")
}

/// User prompt for action suggestions.
pub fn suggest_actions(scene: &str) -> String {
    format!("Current scene:\n{scene}\n\nSuggest three actions.")
}

/// User prompt for new answer cards.
pub fn generate_cards(count: usize, inspiration: &[String]) -> String {
    format!(
        "Generate {count} new answer cards in the spirit of these: {}",
        inspiration.join(", ")
    )
}
