//! Victory conditions

use serde::{Deserialize, Serialize};

use crate::core::config::GameRules;
use crate::core::error::CollaboratorError;
use crate::core::types::{FactionId, Turn};
use crate::crisis::CrisisOutcome;
use crate::galaxy::GameState;
use crate::turn::collaborators::VictoryEvaluator;

/// Score per colony for time-limit victories
const COLONY_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VictoryType {
    /// Last non-crisis faction standing
    Conquest,
    /// A crisis wiped out every player faction
    CrisisTriumph,
    /// Highest score when the turn limit was reached
    TimeLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VictoryReport {
    pub faction: FactionId,
    pub name: String,
    pub victory_type: VictoryType,
    pub turn: Turn,
}

/// Colonies × 100 plus total fleet firepower
pub fn score(state: &GameState, faction: FactionId) -> f64 {
    let colonies = state.colonies_of(faction).count() as f64;
    let firepower: f64 = state.fleets_of(faction).map(|f| f.total_firepower()).sum();
    colonies * COLONY_SCORE + firepower
}

/// Crisis triumph, then conquest, then the optional turn limit
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardVictory;

impl StandardVictory {
    fn report(state: &GameState, faction: FactionId, victory_type: VictoryType) -> Option<VictoryReport> {
        let name = state.get_faction(faction)?.name.clone();
        Some(VictoryReport {
            faction,
            name,
            victory_type,
            turn: state.turn,
        })
    }

    fn crisis_triumph(state: &GameState) -> Option<VictoryReport> {
        let crisis = state
            .crises
            .iter()
            .find(|c| c.outcome() == Some(CrisisOutcome::Defeat))?;
        Self::report(state, crisis.faction, VictoryType::CrisisTriumph)
    }

    fn conquest(state: &GameState) -> Option<VictoryReport> {
        let contenders: Vec<_> = state.factions.iter().filter(|f| !f.is_crisis()).collect();
        if contenders.len() < 2 {
            return None;
        }
        let mut standing = contenders.iter().filter(|f| !f.defeated);
        match (standing.next(), standing.next()) {
            (Some(last), None) => Self::report(state, last.id, VictoryType::Conquest),
            _ => None,
        }
    }

    fn time_limit(state: &GameState, limit: Turn) -> Option<VictoryReport> {
        if state.turn < limit {
            return None;
        }
        let mut best: Option<(FactionId, f64)> = None;
        for faction in state.factions.iter().filter(|f| !f.is_crisis() && !f.defeated) {
            let value = score(state, faction.id);
            match best {
                Some((_, top)) if top >= value => {}
                _ => best = Some((faction.id, value)),
            }
        }
        let (winner, _) = best?;
        Self::report(state, winner, VictoryType::TimeLimit)
    }
}

impl VictoryEvaluator for StandardVictory {
    fn check_victory_conditions(
        &mut self,
        state: &GameState,
        rules: &GameRules,
    ) -> Result<Option<VictoryReport>, CollaboratorError> {
        if let Some(report) = Self::crisis_triumph(state) {
            return Ok(Some(report));
        }
        if rules.victory.conquest {
            if let Some(report) = Self::conquest(state) {
                return Ok(Some(report));
            }
        }
        Ok(rules
            .victory
            .turn_limit
            .and_then(|limit| Self::time_limit(state, limit)))
    }
}
