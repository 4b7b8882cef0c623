//! Turn phases in execution order

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    Economy,
    Population,
    Research,
    Exploration,
    Espionage,
    Diplomacy,
    /// Fleet movement, then combat in every contested system
    Military,
    Events,
    Crisis,
    Ai,
    Victory,
}

impl TurnPhase {
    /// Fixed execution order
    pub const ORDER: [TurnPhase; 11] = [
        TurnPhase::Economy,
        TurnPhase::Population,
        TurnPhase::Research,
        TurnPhase::Exploration,
        TurnPhase::Espionage,
        TurnPhase::Diplomacy,
        TurnPhase::Military,
        TurnPhase::Events,
        TurnPhase::Crisis,
        TurnPhase::Ai,
        TurnPhase::Victory,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TurnPhase::Economy => "economy",
            TurnPhase::Population => "population",
            TurnPhase::Research => "research",
            TurnPhase::Exploration => "exploration",
            TurnPhase::Espionage => "espionage",
            TurnPhase::Diplomacy => "diplomacy",
            TurnPhase::Military => "military",
            TurnPhase::Events => "events",
            TurnPhase::Crisis => "crisis",
            TurnPhase::Ai => "ai",
            TurnPhase::Victory => "victory",
        }
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
