//! The card-matching variant.
//!
//! Same shape as the RPG: one session, an unreliable generator. There are no
//! stats. Each round the player answers a question with cards from a hand of
//! five; a bot answers too and a coin flip picks the winner. Answers that
//! arrive after the round deadline lose automatically. Played cards are
//! replaced with freshly generated ones, or with cards drawn from the static
//! pool when generation fails.

use crate::narrator::NarratorError;
use async_trait::async_trait;
use lazy_static::lazy_static;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Cards a player holds between rounds.
pub const HAND_SIZE: usize = 5;

/// Time allowed to answer before the round is forfeited.
pub const ROUND_TIME_LIMIT: Duration = Duration::from_secs(30);

lazy_static! {
    static ref NUMBERED_LINE: Regex = Regex::new(r"^\d+\.").expect("valid numbered line regex");
}

/// Errors from card game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("No card game in progress - start a game first")]
    NoActiveGame,

    #[error("Card pool needs at least one answer and one question")]
    EmptyPool,

    #[error("Player name is empty")]
    EmptyPlayerName,
}

/// Source of new answer cards.
#[async_trait]
pub trait CardWriter: Send + Sync {
    /// Raw generator output; numbered lines are taken as cards.
    async fn generate_cards(
        &self,
        count: usize,
        inspiration: &[String],
    ) -> Result<String, NarratorError>;
}

/// The static answers and questions the game draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPool {
    answers: Vec<String>,
    questions: Vec<String>,
}

impl CardPool {
    pub fn new(answers: Vec<String>, questions: Vec<String>) -> Result<Self, CardError> {
        if answers.is_empty() || questions.is_empty() {
            return Err(CardError::EmptyPool);
        }
        Ok(Self { answers, questions })
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    fn question<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.questions.choose(rng).cloned().unwrap_or_default()
    }

    fn answer<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.answers.choose(rng).cloned().unwrap_or_default()
    }

    /// Up to `count` distinct answers, uniformly sampled.
    fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<String> {
        self.answers
            .choose_multiple(rng, count.min(self.answers.len()))
            .cloned()
            .collect()
    }
}

/// Who took a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Bot,
}

/// State of one card game.
#[derive(Debug, Clone)]
pub struct CardSession {
    pub player_name: String,
    pub round: u32,
    pub player_score: u32,
    pub bot_score: u32,
    pub hand: Vec<String>,
    round_started: Instant,
}

impl CardSession {
    fn score_line(&self) -> String {
        format!(
            "Score: {} {} | Bot {}",
            self.player_name, self.player_score, self.bot_score
        )
    }
}

/// Response to starting a game or opening a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStart {
    pub message: String,
    pub question: String,
    pub cards: Vec<String>,
}

/// Response to a played round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub message: String,
    pub winner: Winner,
    pub timed_out: bool,
    pub score: String,
    /// Question for the next round.
    pub question: String,
    pub cards: Vec<String>,
}

/// Drives one card game.
pub struct CardGame<R: Rng = StdRng> {
    writer: Arc<dyn CardWriter>,
    pool: CardPool,
    rng: R,
    session: Option<CardSession>,
}

impl CardGame<StdRng> {
    pub fn new(writer: Arc<dyn CardWriter>, pool: CardPool) -> Self {
        Self::with_rng(writer, pool, StdRng::from_entropy())
    }

    pub fn seeded(writer: Arc<dyn CardWriter>, pool: CardPool, seed: u64) -> Self {
        Self::with_rng(writer, pool, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> CardGame<R> {
    pub fn with_rng(writer: Arc<dyn CardWriter>, pool: CardPool, rng: R) -> Self {
        Self {
            writer,
            pool,
            rng,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&CardSession> {
        self.session.as_ref()
    }

    /// Start a new game with a full hand, discarding any game in progress.
    pub async fn start_game(
        &mut self,
        player_name: &str,
        now: Instant,
    ) -> Result<RoundStart, CardError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(CardError::EmptyPlayerName);
        }

        let hand = self.draw_cards(HAND_SIZE).await;
        let session = CardSession {
            player_name: player_name.to_string(),
            round: 1,
            player_score: 0,
            bot_score: 0,
            hand,
            round_started: now,
        };
        tracing::info!(player = %session.player_name, "card game started");

        let response = RoundStart {
            message: format!(
                "The game has started! Welcome, {}. Round {} begins.",
                session.player_name, session.round
            ),
            question: self.pool.question(&mut self.rng),
            cards: session.hand.clone(),
        };
        self.session = Some(session);
        Ok(response)
    }

    /// Open the next round and restart its timer.
    pub fn next_round(&mut self, now: Instant) -> Result<RoundStart, CardError> {
        let session = self.session.as_mut().ok_or(CardError::NoActiveGame)?;
        session.round += 1;
        session.round_started = now;

        Ok(RoundStart {
            message: format!("Round {} has started! Pick a funny answer:", session.round),
            question: self.pool.question(&mut self.rng),
            cards: session.hand.clone(),
        })
    }

    /// Play `answers` for the current round.
    ///
    /// Cards not in the hand are ignored when discarding. The hand is topped
    /// back up to [`HAND_SIZE`] and the round timer restarts.
    pub async fn play_round(
        &mut self,
        answers: &[String],
        now: Instant,
    ) -> Result<RoundResult, CardError> {
        let session = self.session.as_mut().ok_or(CardError::NoActiveGame)?;

        let elapsed = now.saturating_duration_since(session.round_started);
        let timed_out = elapsed > ROUND_TIME_LIMIT;

        let (winner, message) = if timed_out {
            (
                Winner::Bot,
                "You ran out of time! The bot wins this round.".to_string(),
            )
        } else {
            let winner = if self.rng.gen_bool(0.5) {
                Winner::Player
            } else {
                Winner::Bot
            };
            let bot_answer = self.pool.answer(&mut self.rng);
            let label = match winner {
                Winner::Player => "Player",
                Winner::Bot => "Bot",
            };
            (
                winner,
                format!(
                    "Your answer: {}\nBot's answer: {bot_answer}\n{label} wins this round!",
                    answers.join(", ")
                ),
            )
        };

        match winner {
            Winner::Player => session.player_score += 1,
            Winner::Bot => session.bot_score += 1,
        }
        tracing::debug!(round = session.round, ?winner, timed_out, "card round resolved");

        for answer in answers {
            if let Some(pos) = session.hand.iter().position(|card| card == answer) {
                session.hand.remove(pos);
            }
        }

        let needed = HAND_SIZE.saturating_sub(session.hand.len());
        if needed > 0 {
            let new_cards = self.draw_cards(needed).await;
            if let Some(session) = self.session.as_mut() {
                session.hand.extend(new_cards);
            }
        }

        let session = self.session.as_mut().ok_or(CardError::NoActiveGame)?;
        session.round_started = now;

        Ok(RoundResult {
            message,
            winner,
            timed_out,
            score: session.score_line(),
            question: self.pool.question(&mut self.rng),
            cards: session.hand.clone(),
        })
    }

    /// Ask the writer for `count` cards, falling back to a pool sample.
    async fn draw_cards(&mut self, count: usize) -> Vec<String> {
        let inspiration = self.pool.sample(count, &mut self.rng);

        match self.writer.generate_cards(count, &inspiration).await {
            Ok(text) => {
                let cards = parse_cards(&text, count);
                if cards.is_empty() {
                    tracing::warn!("card generator returned no numbered cards, using pool");
                    inspiration
                } else {
                    cards
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "card generation failed, using pool");
                inspiration
            }
        }
    }
}

/// Keep numbered lines, decode HTML entities, and keep the last `count`.
pub fn parse_cards(text: &str, count: usize) -> Vec<String> {
    let cards: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| NUMBERED_LINE.is_match(line))
        .map(|line| html_escape::decode_html_entities(line).into_owned())
        .collect();

    let skip = cards.len().saturating_sub(count);
    cards.into_iter().skip(skip).collect()
}
