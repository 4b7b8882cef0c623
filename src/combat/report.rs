//! Combat reports returned to the orchestrator

use serde::{Deserialize, Serialize};

use crate::combat::snapshot::Side;
use crate::core::types::{FactionId, FleetId, SystemId};
use crate::galaxy::FleetStance;

/// Shots fired by one side in one round
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VolleyReport {
    pub shots: u32,
    pub hits: u32,
    pub criticals: u32,
    pub shield_damage: f64,
    pub hull_damage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u32,
    pub attacker_volley: VolleyReport,
    pub defender_volley: VolleyReport,
    pub attacker_destroyed: u32,
    pub defender_destroyed: u32,
}

/// One side of a finished encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideSummary {
    pub faction: FactionId,
    pub fleet: FleetId,
    pub stance: FleetStance,
    pub ships_before: u32,
    pub ships_lost: u32,
    pub ships_remaining: u32,
    pub hull_remaining: f64,
}

/// Outcome of one encounter in a contested system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSummary {
    pub system: SystemId,
    pub attacker: SideSummary,
    pub defender: SideSummary,
    pub rounds: Vec<RoundReport>,
    pub winner: Option<Side>,
    pub was_retreat: bool,
    pub retreated: Option<Side>,
    /// One side had no ships; no rounds were fought
    pub bloodless: bool,
}

impl CombatSummary {
    pub fn rounds_fought(&self) -> u32 {
        self.rounds.len() as u32
    }

    pub fn winning_faction(&self) -> Option<FactionId> {
        self.winner.map(|side| self.side(side).faction)
    }

    pub fn losing_faction(&self) -> Option<FactionId> {
        self.winner.map(|side| self.side(side.opposite()).faction)
    }

    pub fn side(&self, side: Side) -> &SideSummary {
        match side {
            Side::Attacker => &self.attacker,
            Side::Defender => &self.defender,
        }
    }
}
