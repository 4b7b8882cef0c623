pub mod config;
pub mod error;
pub mod random;
pub mod types;

pub use config::{CommitPolicy, GameRules};
pub use error::{CollaboratorError, CombatError, ConfigError, TurnError};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use types::{CrisisId, FactionId, FleetId, GameId, Position, ShipId, SystemId, Turn};
