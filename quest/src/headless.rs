//! Line-oriented adventure mode.
//!
//! - Lines starting with `#` are commands (quit, status, history, suggest, new, dump)
//! - Any other line is a player action

use crate::{CliConfig, Generators};
use quest_core::{SessionConfig, SessionState, TurnEngine, TurnResponse};
use std::io::{self, BufRead, Write};

const COMMANDS: &str = "\
  #quit        - Exit the game
  #status      - Show stats, location and inventory
  #history     - List every resolved turn
  #suggest     - Ask the narrator for action ideas
  #new <name>  - Start over with a new character
  #dump        - Print the session as JSON
  #help        - Show this help";

/// Run the adventure until stdin closes or the player quits.
pub async fn run_headless(
    config: CliConfig,
    generators: Generators,
) -> Result<(), Box<dyn std::error::Error>> {
    let session_config = SessionConfig::default();
    let mut engine = match config.seed {
        Some(seed) => TurnEngine::seeded(generators.narrator, session_config, seed),
        None => TurnEngine::new(generators.narrator, session_config),
    };

    let start = engine.start_game(&config.name).await?;

    println!("=== Quest ===");
    println!("{}", start.message);
    println!();
    println!("{}", start.event);
    println!();
    println!("Commands:");
    println!("{COMMANDS}");
    println!();
    println!("Enter your actions (one per line):");
    println!();

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

        if let Some(command) = line.strip_prefix('#') {
            let (name, rest) = match command.split_once(char::is_whitespace) {
                Some((name, rest)) => (name, rest.trim()),
                None => (command, ""),
            };
            match name {
                "quit" | "exit" => {
                    println!("Farewell!");
                    break;
                }
                "status" => match engine.session() {
                    Some(session) => print_status(session),
                    None => println!("[ERROR] No game in progress. Use #new <name>."),
                },
                "history" => match engine.session() {
                    Some(session) => print_history(session),
                    None => println!("[ERROR] No game in progress. Use #new <name>."),
                },
                "suggest" => match engine.suggest_actions().await {
                    Ok(suggestions) if suggestions.is_empty() => {
                        println!("[SUGGEST] The narrator has no ideas right now.");
                    }
                    Ok(suggestions) => {
                        println!("[SUGGEST]");
                        for (i, s) in suggestions.iter().enumerate() {
                            println!(
                                "  {}. {} ({}, {}% chance) - reward: {}",
                                i + 1,
                                s.action,
                                s.stat,
                                s.chance,
                                s.reward
                            );
                        }
                    }
                    Err(e) => println!("[ERROR] {e}"),
                },
                "new" => {
                    let name = if rest.is_empty() { config.name.as_str() } else { rest };
                    match engine.start_game(name).await {
                        Ok(start) => {
                            println!("{}", start.message);
                            println!();
                            println!("{}", start.event);
                        }
                        Err(e) => println!("[ERROR] {e}"),
                    }
                }
                "dump" => match engine.session() {
                    Some(session) => match serde_json::to_string_pretty(session) {
                        Ok(json) => println!("{json}"),
                        Err(e) => println!("[ERROR] {e}"),
                    },
                    None => println!("[ERROR] No game in progress."),
                },
                "help" => {
                    println!("[HELP]");
                    println!("{COMMANDS}");
                    println!("  (anything else is sent as a player action)");
                }
                _ => println!("[ERROR] Unknown command. Type #help for help."),
            }
            stdout.flush().ok();
            continue;
        }

        match engine.respond_to_event(line).await {
            Ok(turn) => print_turn(&turn),
            Err(e) => println!("[ERROR] {e}"),
        }
        stdout.flush().ok();
    }

    Ok(())
}

fn print_turn(turn: &TurnResponse) {
    match turn.success {
        None => println!("[{}] No check.", turn.stat_used),
        Some(true) => println!("[{}] Check passed! {} +1", turn.stat_used, turn.stat_used),
        Some(false) => println!("[{}] Check failed. health -1", turn.stat_used),
    }
    println!();
    for para in turn.outcome.split("\n\n") {
        println!("{para}");
    }
    println!();
    if turn.stats.health == 0 {
        println!("[WARNING] You are at 0 health.");
    }
}

fn print_status(session: &SessionState) {
    println!("[STATUS]");
    println!("  Player: {}", session.player_name);
    println!("  Location: {}", session.location);
    println!("  Round: {}", session.round());
    println!("  Stats: {}", session.stats);
    if session.inventory.is_empty() {
        println!("  Inventory: (empty)");
    } else {
        println!("  Inventory: {}", session.inventory.join(", "));
    }
}

fn print_history(session: &SessionState) {
    if session.history().is_empty() {
        println!("[HISTORY] Nothing has happened yet.");
        return;
    }
    println!("[HISTORY]");
    for record in session.history() {
        let result = match record.success {
            None => "no check",
            Some(true) => "success",
            Some(false) => "failure",
        };
        println!(
            "  Round {}: {} ({}, {})",
            record.round, record.action, record.stat_used, result
        );
    }
}
