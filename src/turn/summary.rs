//! Read-only per-faction turn summary

use serde::{Deserialize, Serialize};

use crate::core::types::{FactionId, Turn};
use crate::galaxy::GameState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnSummary {
    pub faction: FactionId,
    pub turn: Turn,
    pub credits_delta: f64,
    pub energy_delta: f64,
    pub food_delta: f64,
    /// Research gained over the last turn
    pub research_delta: f64,
    /// Research accumulated over the game
    pub research_total: f64,
    pub wars: usize,
    pub allies: usize,
    pub pending_events: u32,
    pub crisis_active: bool,
}

/// Summarize a faction's last turn. `None` for an unknown faction.
pub fn summarize(state: &GameState, faction: FactionId) -> Option<TurnSummary> {
    let entry = state.get_faction(faction)?;
    Some(TurnSummary {
        faction,
        turn: state.turn,
        credits_delta: entry.turn_ledger.credits,
        energy_delta: entry.turn_ledger.energy,
        food_delta: entry.turn_ledger.food,
        research_delta: entry.turn_ledger.research,
        research_total: entry.stockpile.research,
        wars: state.relations.war_count(faction),
        allies: state.relations.ally_count(faction),
        pending_events: entry.pending_events,
        crisis_active: state.active_crisis().is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::{FactionKind, ResourceLedger, StateChange};

    #[test]
    fn test_summary_reads_ledger_and_relations() {
        let mut state = GameState::new();
        let a = state.add_faction("Accord", FactionKind::Player);
        let b = state.add_faction("Hegemony", FactionKind::Ai);
        let c = state.add_faction("League", FactionKind::Ai);

        state.apply_changes(vec![
            StateChange::Resources {
                faction: a,
                delta: ResourceLedger {
                    credits: 40.0,
                    energy: -5.0,
                    food: 12.0,
                    research: 0.0,
                },
            },
            StateChange::Research { faction: a, points: 7.5 },
            StateChange::War { a, b, at_war: true },
            StateChange::Alliance { a, b: c, allied: true },
            StateChange::EventRaised {
                faction: a,
                message: "Derelict sighted".to_string(),
            },
        ]);

        let summary = summarize(&state, a).unwrap();
        assert_eq!(summary.credits_delta, 40.0);
        assert_eq!(summary.energy_delta, -5.0);
        assert_eq!(summary.research_delta, 7.5);
        assert_eq!(summary.wars, 1);
        assert_eq!(summary.allies, 1);
        assert_eq!(summary.pending_events, 1);
        assert!(!summary.crisis_active);

        assert!(summarize(&state, FactionId(99)).is_none());
    }
}
