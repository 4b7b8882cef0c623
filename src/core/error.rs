use thiserror::Error;

use crate::core::types::{FactionId, GameId};
use crate::turn::TurnPhase;

/// Failures surfaced by `process_turn`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TurnError {
    #[error("Game not found: {0:?}")]
    GameNotFound(GameId),

    #[error("Faction not found: {0:?}")]
    FactionNotFound(FactionId),

    /// The game has already ended; no phase was run
    #[error("Game {0:?} is already over")]
    GameOver(GameId),

    #[error("Phase '{phase}' failed: {message}")]
    PhaseFailure { phase: TurnPhase, message: String },
}

/// Combat setup failures. Recoverable: the encounter is skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CombatError {
    #[error("Invalid encounter: {0}")]
    InvalidEncounter(String),
}

/// Error returned by an external collaborator (economy, research, AI, ...)
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid rules: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, TurnError>;
