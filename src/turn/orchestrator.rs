//! Turn orchestrator
//!
//! Runs the eleven turn phases in fixed order against a session's
//! `GameState`. The first failing phase aborts the turn; the turn counter
//! only advances when every phase succeeded.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::campaign::{move_fleets, Arrival};
use crate::combat::{resolve_contested_systems, CombatSummary};
use crate::core::config::{CommitPolicy, GameRules};
use crate::core::error::{Result, TurnError};
use crate::core::random::{RandomSource, SeededRandom};
use crate::core::types::{FactionId, GameId, Turn};
use crate::crisis::{process_crisis_turn, CrisisUpdate};
use crate::galaxy::{GameState, LoggedEvent, ResourceLedger, TurnEvent};
use crate::turn::collaborators::{CollaboratorResult, Collaborators};
use crate::turn::phase::TurnPhase;
use crate::turn::summary::{summarize, TurnSummary};
use crate::turn::victory::VictoryReport;

/// Outcome of one successful turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub game_id: GameId,
    pub previous_turn: Turn,
    pub new_turn: Turn,
    pub success: bool,
    pub arrivals: Vec<Arrival>,
    pub combats: Vec<CombatSummary>,
    pub crisis: CrisisUpdate,
    /// Events recorded during this turn
    pub events: Vec<LoggedEvent>,
    pub game_ended: bool,
    pub winner: Option<VictoryReport>,
}

/// Results gathered while the phases run
#[derive(Debug, Default)]
struct PhaseOutput {
    arrivals: Vec<Arrival>,
    combats: Vec<CombatSummary>,
    crisis: CrisisUpdate,
}

/// One game: its state, rules, random source and collaborators
pub struct GameSession {
    pub id: GameId,
    pub state: GameState,
    pub rules: GameRules,
    pub collaborators: Collaborators,
    rng: Box<dyn RandomSource>,
}

impl GameSession {
    pub fn new(state: GameState, rules: GameRules) -> Self {
        Self {
            id: GameId::new(),
            state,
            rules,
            collaborators: Collaborators::default(),
            rng: Box::new(SeededRandom::from_entropy()),
        }
    }

    pub fn with_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    /// Per-faction figures for the last turn. Reads only.
    pub fn turn_summary(&self, faction: FactionId) -> Option<TurnSummary> {
        summarize(&self.state, faction)
    }

    /// Advance the game by one turn
    pub fn process_turn(&mut self) -> Result<TurnResult> {
        if self.state.game_over {
            return Err(TurnError::GameOver(self.id));
        }

        let previous_turn = self.state.turn;
        let first_event = self.state.log.len();
        info!(turn = previous_turn, "Processing turn");

        let backup = match self.rules.turn.commit_policy {
            CommitPolicy::Transactional => Some(self.state.clone()),
            CommitPolicy::PartialCommit => None,
        };

        for faction in &mut self.state.factions {
            faction.turn_ledger = ResourceLedger::default();
        }

        let mut output = PhaseOutput::default();
        for phase in TurnPhase::ORDER {
            debug!(turn = previous_turn, %phase, "Running phase");
            if let Err(message) = self.run_phase(phase, &mut output) {
                match backup {
                    Some(snapshot) => {
                        self.state = snapshot;
                        warn!(turn = previous_turn, %phase, %message, "Phase failed, turn rolled back");
                    }
                    None => {
                        warn!(
                            turn = previous_turn,
                            %phase,
                            %message,
                            "Phase failed, effects of earlier phases were kept"
                        );
                    }
                }
                return Err(TurnError::PhaseFailure { phase, message });
            }
        }

        self.state.turn += 1;

        let result = TurnResult {
            game_id: self.id,
            previous_turn,
            new_turn: self.state.turn,
            success: true,
            arrivals: output.arrivals,
            combats: output.combats,
            crisis: output.crisis,
            events: self.state.log.events[first_event..].to_vec(),
            game_ended: self.state.game_over,
            winner: self.state.outcome.clone(),
        };

        info!(
            turn = previous_turn,
            combats = result.combats.len(),
            events = result.events.len(),
            game_ended = result.game_ended,
            "Turn complete"
        );
        Ok(result)
    }

    fn run_phase(&mut self, phase: TurnPhase, output: &mut PhaseOutput) -> std::result::Result<(), String> {
        let c = &mut self.collaborators;
        let state = &mut self.state;

        match phase {
            TurnPhase::Economy => {
                let result = c.economy.process_economy_turn(state);
                apply(state, "process_economy_turn", result)?;
                let result = c.economy.process_trade_routes(state);
                apply(state, "process_trade_routes", result)?;
            }
            TurnPhase::Population => {
                let result = c.population.process_population_growth(state);
                apply(state, "process_population_growth", result)?;
                let result = c.population.process_colony_build_queues(state);
                apply(state, "process_colony_build_queues", result)?;
            }
            TurnPhase::Research => {
                let result = c.research.process_research(state);
                apply(state, "process_research", result)?;
            }
            TurnPhase::Exploration => {
                let result = c.exploration.process_exploration(state);
                apply(state, "process_exploration", result)?;
            }
            TurnPhase::Espionage => {
                let result = c.espionage.process_all_agents(state);
                apply(state, "process_all_agents", result)?;
            }
            TurnPhase::Diplomacy => {
                let result = c.diplomacy.process_diplomacy(state);
                apply(state, "process_diplomacy", result)?;
            }
            TurnPhase::Military => {
                output.arrivals = move_fleets(state, &self.rules.movement);
                dispatch_arrivals(state, &output.arrivals);
                output.combats = resolve_contested_systems(state, &self.rules.combat, self.rng.as_mut());

                let purged = state.purge_empty_fleets();
                let eliminated = state.eliminate_factions();
                if !purged.is_empty() || !eliminated.is_empty() {
                    info!(
                        fleets_lost = purged.len(),
                        factions_eliminated = eliminated.len(),
                        "Military phase casualties"
                    );
                }
            }
            TurnPhase::Events => {
                let result = c.events.process_events(state);
                apply(state, "process_events", result)?;
            }
            TurnPhase::Crisis => {
                output.crisis = process_crisis_turn(state, &self.rules.crisis, self.rng.as_mut());
            }
            TurnPhase::Ai => {
                let ai_factions: Vec<FactionId> = state
                    .factions
                    .iter()
                    .filter(|f| f.is_ai() && !f.defeated)
                    .map(|f| f.id)
                    .collect();
                for faction in ai_factions {
                    let result = c.ai.process_ai_turn(state, faction);
                    apply(state, "process_ai_turn", result)?;
                }
            }
            TurnPhase::Victory => {
                let check = c
                    .victory
                    .check_victory_conditions(state, &self.rules)
                    .map_err(|e| format!("check_victory_conditions: {}", e))?;
                if let Some(report) = check {
                    if state.outcome.is_none() {
                        info!(
                            winner = %report.name,
                            victory = ?report.victory_type,
                            "Victory achieved"
                        );
                        state.outcome = Some(report);
                    }
                    state.game_over = true;
                }
            }
        }
        Ok(())
    }
}

/// Apply a collaborator's changes, logging any that name unknown ids
fn apply(state: &mut GameState, call: &str, result: CollaboratorResult) -> std::result::Result<(), String> {
    let changes = result.map_err(|e| format!("{}: {}", call, e))?;
    for (change, reason) in state.apply_changes(changes) {
        warn!(call, ?change, ?reason, "Rejected state change");
    }
    Ok(())
}

/// Record arrivals and let owners discover the systems they reached
fn dispatch_arrivals(state: &mut GameState, arrivals: &[Arrival]) {
    for arrival in arrivals {
        state.record(TurnEvent::FleetArrived {
            fleet: arrival.fleet,
            system: arrival.system,
        });
        let first_visit = state
            .get_faction_mut(arrival.owner)
            .map(|f| f.discover(arrival.system))
            .unwrap_or(false);
        if first_visit {
            state.record(TurnEvent::SystemDiscovered {
                faction: arrival.owner,
                system: arrival.system,
            });
        }
    }
}

/// All sessions hosted by this process
#[derive(Default)]
pub struct GameRegistry {
    sessions: AHashMap<GameId, GameSession>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, session: GameSession) -> GameId {
        let id = session.id;
        self.sessions.insert(id, session);
        id
    }

    /// Start a session with default collaborators and an entropy-seeded source
    pub fn create_game(&mut self, state: GameState, rules: GameRules) -> GameId {
        self.insert(GameSession::new(state, rules))
    }

    pub fn get(&self, game_id: GameId) -> Option<&GameSession> {
        self.sessions.get(&game_id)
    }

    pub fn get_mut(&mut self, game_id: GameId) -> Option<&mut GameSession> {
        self.sessions.get_mut(&game_id)
    }

    pub fn remove(&mut self, game_id: GameId) -> Option<GameSession> {
        self.sessions.remove(&game_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn process_turn(&mut self, game_id: GameId) -> Result<TurnResult> {
        self.sessions
            .get_mut(&game_id)
            .ok_or(TurnError::GameNotFound(game_id))?
            .process_turn()
    }

    pub fn turn_summary(&self, game_id: GameId, faction: FactionId) -> Result<TurnSummary> {
        let session = self.sessions.get(&game_id).ok_or(TurnError::GameNotFound(game_id))?;
        session
            .turn_summary(faction)
            .ok_or(TurnError::FactionNotFound(faction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CollaboratorError;
    use crate::core::random::ScriptedRandom;
    use crate::core::types::Position;
    use crate::galaxy::{FactionKind, FleetStance, ShipDesign, StateChange};
    use crate::turn::collaborators::ResearchProcessor;

    fn small_game() -> GameState {
        let mut state = GameState::new();
        let a = state.add_faction("Accord", FactionKind::Player);
        let b = state.add_faction("Hegemony", FactionKind::Ai);
        let sol = state.add_system("Sol", Position::new(0.0, 0.0));
        let vega = state.add_system("Vega", Position::new(5.0, 0.0));
        state.connect(sol, vega);
        state.add_colony(sol, a, 10.0);
        state.add_colony(vega, b, 10.0);
        state
    }

    struct FailingResearch;

    impl ResearchProcessor for FailingResearch {
        fn process_research(&mut self, _state: &GameState) -> CollaboratorResult {
            Err(CollaboratorError::new("tech tree corrupted"))
        }
    }

    #[test]
    fn test_turn_advances() {
        let mut session = GameSession::new(small_game(), GameRules::default()).with_rng(ScriptedRandom::constant(0.5));
        let result = session.process_turn().unwrap();
        assert_eq!(result.previous_turn, 1);
        assert_eq!(result.new_turn, 2);
        assert!(result.success);
        assert!(!result.game_ended);
    }

    #[test]
    fn test_game_over_rejected_before_any_phase() {
        let mut session = GameSession::new(small_game(), GameRules::default());
        session.state.game_over = true;
        let id = session.id;

        assert_eq!(session.process_turn(), Err(TurnError::GameOver(id)));
        assert_eq!(session.state.turn, 1);
    }

    #[test]
    fn test_failure_names_phase() {
        let mut session = GameSession::new(small_game(), GameRules::default())
            .with_collaborators(Collaborators::default().with_research(FailingResearch));

        match session.process_turn() {
            Err(TurnError::PhaseFailure { phase, message }) => {
                assert_eq!(phase, TurnPhase::Research);
                assert!(message.contains("tech tree corrupted"));
            }
            other => panic!("expected phase failure, got {:?}", other),
        }
        assert_eq!(session.state.turn, 1);
    }

    #[test]
    fn test_arrival_discovers_system() {
        let mut state = small_game();
        let a = state.factions[0].id;
        let sol = state.systems[0].id;
        let vega = state.systems[1].id;
        let fleet = state.commission_fleet(a, sol, "Scouts", &[ShipDesign::corvette()], FleetStance::Evasive);
        state.apply_changes(vec![StateChange::FleetOrdered {
            fleet,
            destination: Some(vega),
        }]);

        let mut session = GameSession::new(state, GameRules::default()).with_rng(ScriptedRandom::constant(0.5));
        let mut arrived = None;
        for _ in 0..3 {
            let result = session.process_turn().unwrap();
            if let Some(arrival) = result.arrivals.first() {
                arrived = Some(arrival.system);
                assert!(result
                    .events
                    .iter()
                    .any(|e| e.event == TurnEvent::SystemDiscovered { faction: a, system: vega }));
            }
        }
        assert_eq!(arrived, Some(vega));
        assert!(session.state.get_faction(a).unwrap().knows(vega));
    }

    #[test]
    fn test_registry_unknown_game() {
        let mut registry = GameRegistry::new();
        let missing = GameId::new();
        assert_eq!(registry.process_turn(missing), Err(TurnError::GameNotFound(missing)));

        let id = registry.create_game(small_game(), GameRules::default());
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.turn_summary(id, FactionId(42)),
            Err(TurnError::FactionNotFound(FactionId(42)))
        );
    }
}
