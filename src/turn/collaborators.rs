//! External collaborators invoked once per turn
//!
//! Each collaborator reads the current `GameState` and returns the changes it
//! wants made. The orchestrator applies them before calling the next one, so
//! every call sees the effects of the calls before it.

use crate::core::config::GameRules;
use crate::core::error::CollaboratorError;
use crate::core::types::FactionId;
use crate::galaxy::{GameState, StateChange};
use crate::turn::victory::{StandardVictory, VictoryReport};

pub type CollaboratorResult = Result<Vec<StateChange>, CollaboratorError>;

pub trait EconomyProcessor: Send {
    fn process_economy_turn(&mut self, state: &GameState) -> CollaboratorResult;
    fn process_trade_routes(&mut self, state: &GameState) -> CollaboratorResult;
}

pub trait PopulationProcessor: Send {
    fn process_population_growth(&mut self, state: &GameState) -> CollaboratorResult;
    fn process_colony_build_queues(&mut self, state: &GameState) -> CollaboratorResult;
}

pub trait ResearchProcessor: Send {
    fn process_research(&mut self, state: &GameState) -> CollaboratorResult;
}

pub trait ExplorationProcessor: Send {
    fn process_exploration(&mut self, state: &GameState) -> CollaboratorResult;
}

pub trait EspionageProcessor: Send {
    fn process_all_agents(&mut self, state: &GameState) -> CollaboratorResult;
}

pub trait DiplomacyProcessor: Send {
    fn process_diplomacy(&mut self, state: &GameState) -> CollaboratorResult;
}

pub trait EventProcessor: Send {
    fn process_events(&mut self, state: &GameState) -> CollaboratorResult;
}

pub trait AiProcessor: Send {
    /// Called once per undefeated AI faction
    fn process_ai_turn(&mut self, state: &GameState, faction: FactionId) -> CollaboratorResult;
}

pub trait VictoryEvaluator: Send {
    /// `Some` when a faction has won
    fn check_victory_conditions(
        &mut self,
        state: &GameState,
        rules: &GameRules,
    ) -> Result<Option<VictoryReport>, CollaboratorError>;
}

/// Collaborator that changes nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct Inert;

impl EconomyProcessor for Inert {
    fn process_economy_turn(&mut self, _state: &GameState) -> CollaboratorResult {
        Ok(Vec::new())
    }

    fn process_trade_routes(&mut self, _state: &GameState) -> CollaboratorResult {
        Ok(Vec::new())
    }
}

impl PopulationProcessor for Inert {
    fn process_population_growth(&mut self, _state: &GameState) -> CollaboratorResult {
        Ok(Vec::new())
    }

    fn process_colony_build_queues(&mut self, _state: &GameState) -> CollaboratorResult {
        Ok(Vec::new())
    }
}

impl ResearchProcessor for Inert {
    fn process_research(&mut self, _state: &GameState) -> CollaboratorResult {
        Ok(Vec::new())
    }
}

impl ExplorationProcessor for Inert {
    fn process_exploration(&mut self, _state: &GameState) -> CollaboratorResult {
        Ok(Vec::new())
    }
}

impl EspionageProcessor for Inert {
    fn process_all_agents(&mut self, _state: &GameState) -> CollaboratorResult {
        Ok(Vec::new())
    }
}

impl DiplomacyProcessor for Inert {
    fn process_diplomacy(&mut self, _state: &GameState) -> CollaboratorResult {
        Ok(Vec::new())
    }
}

impl EventProcessor for Inert {
    fn process_events(&mut self, _state: &GameState) -> CollaboratorResult {
        Ok(Vec::new())
    }
}

impl AiProcessor for Inert {
    fn process_ai_turn(&mut self, _state: &GameState, _faction: FactionId) -> CollaboratorResult {
        Ok(Vec::new())
    }
}

/// The full set of collaborators one session uses
pub struct Collaborators {
    pub economy: Box<dyn EconomyProcessor>,
    pub population: Box<dyn PopulationProcessor>,
    pub research: Box<dyn ResearchProcessor>,
    pub exploration: Box<dyn ExplorationProcessor>,
    pub espionage: Box<dyn EspionageProcessor>,
    pub diplomacy: Box<dyn DiplomacyProcessor>,
    pub events: Box<dyn EventProcessor>,
    pub ai: Box<dyn AiProcessor>,
    pub victory: Box<dyn VictoryEvaluator>,
}

impl Default for Collaborators {
    /// Inert processors with the standard victory evaluator
    fn default() -> Self {
        Self {
            economy: Box::new(Inert),
            population: Box::new(Inert),
            research: Box::new(Inert),
            exploration: Box::new(Inert),
            espionage: Box::new(Inert),
            diplomacy: Box::new(Inert),
            events: Box::new(Inert),
            ai: Box::new(Inert),
            victory: Box::new(StandardVictory),
        }
    }
}

impl Collaborators {
    pub fn with_economy(mut self, economy: impl EconomyProcessor + 'static) -> Self {
        self.economy = Box::new(economy);
        self
    }

    pub fn with_population(mut self, population: impl PopulationProcessor + 'static) -> Self {
        self.population = Box::new(population);
        self
    }

    pub fn with_research(mut self, research: impl ResearchProcessor + 'static) -> Self {
        self.research = Box::new(research);
        self
    }

    pub fn with_exploration(mut self, exploration: impl ExplorationProcessor + 'static) -> Self {
        self.exploration = Box::new(exploration);
        self
    }

    pub fn with_espionage(mut self, espionage: impl EspionageProcessor + 'static) -> Self {
        self.espionage = Box::new(espionage);
        self
    }

    pub fn with_diplomacy(mut self, diplomacy: impl DiplomacyProcessor + 'static) -> Self {
        self.diplomacy = Box::new(diplomacy);
        self
    }

    pub fn with_events(mut self, events: impl EventProcessor + 'static) -> Self {
        self.events = Box::new(events);
        self
    }

    pub fn with_ai(mut self, ai: impl AiProcessor + 'static) -> Self {
        self.ai = Box::new(ai);
        self
    }

    pub fn with_victory(mut self, victory: impl VictoryEvaluator + 'static) -> Self {
        self.victory = Box::new(victory);
        self
    }
}
