//! Turn processing
//!
//! Sessions, the phase orchestrator, collaborator interfaces, victory
//! evaluation and the read-only turn summary.

pub mod collaborators;
pub mod orchestrator;
pub mod phase;
pub mod summary;
pub mod victory;

pub use collaborators::{
    AiProcessor, CollaboratorResult, Collaborators, DiplomacyProcessor, EconomyProcessor, EspionageProcessor,
    EventProcessor, ExplorationProcessor, Inert, PopulationProcessor, ResearchProcessor, VictoryEvaluator,
};
pub use orchestrator::{GameRegistry, GameSession, TurnResult};
pub use phase::TurnPhase;
pub use summary::{summarize, TurnSummary};
pub use victory::{score, StandardVictory, VictoryReport, VictoryType};
