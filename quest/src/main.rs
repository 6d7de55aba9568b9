//! Quest - a headless text adventure with an LLM narrator.
//!
//! Reads actions from stdin and prints scenes to stdout. Logs go to stderr.
//!
//! ```bash
//! cargo run -p quest -- --name Ava
//! cargo run -p quest -- --cards --name Ava
//! cargo run -p quest -- --offline --seed 7
//! ```

mod cards;
mod headless;

use quest_core::{CardWriter, GroqNarrator, Narrator, OfflineNarrator};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Options parsed from the command line.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub name: String,
    pub cards: bool,
    pub offline: bool,
    pub seed: Option<u64>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            name: "Adventurer".to_string(),
            cards: false,
            offline: false,
            seed: None,
        }
    }
}

/// The generator behind both game modes.
#[derive(Clone)]
pub struct Generators {
    pub narrator: Arc<dyn Narrator>,
    pub cards: Arc<dyn CardWriter>,
}

impl Generators {
    fn new<T: Narrator + CardWriter + 'static>(generator: T) -> Self {
        let generator = Arc::new(generator);
        Self {
            narrator: generator.clone(),
            cards: generator,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quest=info,quest_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let config = parse_config_from_args(&args);

    let generators = if config.offline {
        tracing::info!("using offline narrator");
        Generators::new(OfflineNarrator::new())
    } else {
        match GroqNarrator::from_env() {
            Ok(narrator) => Generators::new(narrator),
            Err(e) => {
                eprintln!("Error: {e}");
                eprintln!("Set GROQ_API_KEY in .env or the environment, or run with --offline.");
                std::process::exit(1);
            }
        }
    };

    if config.cards {
        cards::run_cards(config, generators).await
    } else {
        headless::run_headless(config, generators).await
    }
}

/// Parse options from command line arguments.
fn parse_config_from_args(args: &[String]) -> CliConfig {
    let mut config = CliConfig::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--name" => {
                if let Some(name) = args.get(i + 1) {
                    config.name = name.clone();
                    i += 1;
                }
            }
            "--seed" => {
                if let Some(seed) = args.get(i + 1) {
                    config.seed = seed.parse().ok();
                    if config.seed.is_none() {
                        tracing::warn!(seed = %seed, "ignoring invalid seed");
                    }
                    i += 1;
                }
            }
            "--cards" => config.cards = true,
            "--offline" => config.offline = true,
            _ => {}
        }
        i += 1;
    }

    config
}

fn print_help() {
    println!("Quest - a text adventure with an LLM narrator");
    println!();
    println!("USAGE:");
    println!("  quest [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help       Show this help message");
    println!("  --name <NAME>    Player name (default: Adventurer)");
    println!("  --cards          Play the card game instead of the adventure");
    println!("  --offline        Use built-in scenes instead of the Groq API");
    println!("  --seed <N>       Seed the dice for a repeatable game");
    println!();
    println!("ENVIRONMENT:");
    println!("  GROQ_API_KEY     API key for the narrator (required unless --offline)");
    println!("  GROQ_MODEL       Model name (default: llama3-70b-8192)");
    println!("  GROQ_BASE_URL    OpenAI-compatible endpoint");
    println!("  RUST_LOG         Log filter (default: quest=info,quest_core=info)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults() {
        let config = parse_config_from_args(&args(&["quest"]));
        assert_eq!(config.name, "Adventurer");
        assert!(!config.cards);
        assert!(!config.offline);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_parse_all_flags() {
        let config = parse_config_from_args(&args(&[
            "quest", "--name", "Ava", "--cards", "--offline", "--seed", "42",
        ]));
        assert_eq!(config.name, "Ava");
        assert!(config.cards);
        assert!(config.offline);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_parse_bad_seed() {
        let config = parse_config_from_args(&args(&["quest", "--seed", "many"]));
        assert_eq!(config.seed, None);
    }
}
