//! Line-oriented card game mode.
//!
//! Each round shows a prompt and the player's hand. The player answers with
//! card numbers (`1,3`) or card texts, separated by commas.

use crate::{CliConfig, Generators};
use quest_core::{CardGame, CardPool, RoundStart};
use std::io::{self, BufRead, Write};
use std::time::Instant;

const ANSWERS: &[&str] = &[
    "A very confused owl.",
    "Unpaid parking tickets.",
    "Grandma's secret recipe.",
    "A suspicious amount of glitter.",
    "The last slice of pizza.",
    "An interpretive dance.",
    "Three raccoons in a trench coat.",
    "A strongly worded letter.",
    "Socks with sandals.",
    "The Wi-Fi password.",
];

const QUESTIONS: &[&str] = &[
    "What's the secret to a happy life? ___",
    "What did I bring back from vacation? ___",
    "What's that smell? ___",
    "What ruined the family dinner? ___",
    "What's hiding under the bed? ___",
];

const COMMANDS: &str = "\
  #next   - Skip to the next round
  #quit   - Exit the game
  #help   - Show this help
  Anything else plays cards: numbers (1,3) or card texts, comma separated";

/// Run the card game until stdin closes or the player quits.
pub async fn run_cards(
    config: CliConfig,
    generators: Generators,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = default_pool()?;
    let mut game = match config.seed {
        Some(seed) => CardGame::seeded(generators.cards, pool, seed),
        None => CardGame::new(generators.cards, pool),
    };

    let start = game.start_game(&config.name, Instant::now()).await?;

    println!("=== Quest Cards ===");
    println!("Commands:");
    println!("{COMMANDS}");
    println!();
    print_round(&start);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(error = %e, "failed to read input");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "#quit" | "#exit" => {
                println!("Thanks for playing!");
                break;
            }
            "#help" => {
                println!("[HELP]");
                println!("{COMMANDS}");
            }
            "#next" => match game.next_round(Instant::now()) {
                Ok(round) => print_round(&round),
                Err(e) => println!("[ERROR] {e}"),
            },
            _ if line.starts_with('#') => {
                println!("[ERROR] Unknown command. Type #help for help.");
            }
            _ => {
                let hand = game.session().map(|s| s.hand.clone()).unwrap_or_default();
                let answers = match parse_selection(line, &hand) {
                    Ok(answers) => answers,
                    Err(e) => {
                        println!("[ERROR] {e}");
                        continue;
                    }
                };

                match game.play_round(&answers, Instant::now()).await {
                    Ok(result) => {
                        println!();
                        println!("{}", result.message);
                        println!("{}", result.score);
                        println!();
                        println!("Next question: {}", result.question);
                        print_hand(&result.cards);
                    }
                    Err(e) => println!("[ERROR] {e}"),
                }
            }
        }
        stdout.flush().ok();
    }

    Ok(())
}

fn default_pool() -> Result<CardPool, quest_core::CardError> {
    CardPool::new(
        ANSWERS.iter().map(|s| s.to_string()).collect(),
        QUESTIONS.iter().map(|s| s.to_string()).collect(),
    )
}

fn print_round(round: &RoundStart) {
    println!("{}", round.message);
    println!();
    println!("Question: {}", round.question);
    print_hand(&round.cards);
}

fn print_hand(cards: &[String]) {
    println!("Your hand:");
    for (i, card) in cards.iter().enumerate() {
        println!("  [{}] {}", i + 1, card);
    }
    println!();
}

/// Turn `1, 3` or card texts into the cards to play.
///
/// Numbers are 1-based positions in `hand`. Text entries are played as
/// typed; the game ignores ones that are not in the hand.
fn parse_selection(input: &str, hand: &[String]) -> Result<Vec<String>, String> {
    let mut answers = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.parse::<usize>() {
            Ok(n) if (1..=hand.len()).contains(&n) => answers.push(hand[n - 1].clone()),
            Ok(n) => return Err(format!("No card number {n} in your hand")),
            Err(_) => answers.push(part.to_string()),
        }
    }
    if answers.is_empty() {
        return Err("Pick at least one card".to_string());
    }
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand() -> Vec<String> {
        vec![
            "1. A very confused owl.".to_string(),
            "2. Socks with sandals.".to_string(),
            "3. The Wi-Fi password.".to_string(),
        ]
    }

    #[test]
    fn test_selection_by_number() {
        let picked = parse_selection("1, 3", &hand()).unwrap();
        assert_eq!(
            picked,
            vec!["1. A very confused owl.", "3. The Wi-Fi password."]
        );
    }

    #[test]
    fn test_selection_by_text() {
        let picked = parse_selection("2. Socks with sandals.", &hand()).unwrap();
        assert_eq!(picked, vec!["2. Socks with sandals."]);
    }

    #[test]
    fn test_selection_out_of_range() {
        assert!(parse_selection("4", &hand()).is_err());
        assert!(parse_selection("0", &hand()).is_err());
    }

    #[test]
    fn test_selection_empty() {
        assert!(parse_selection(" , ", &hand()).is_err());
    }

    #[test]
    fn test_default_pool_is_valid() {
        let pool = default_pool().unwrap();
        assert_eq!(pool.answers().len(), ANSWERS.len());
        assert_eq!(pool.questions().len(), QUESTIONS.len());
    }
}
