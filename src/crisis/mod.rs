//! Crisis escalation
//!
//! At most one galaxy-wide crisis is active per session. Once triggered it
//! escalates through four phases by elapsed turns, spawning a reinforcement
//! wave at every phase increase, until it is beaten back or every player
//! faction has fallen.

pub mod machine;
pub mod spawn;
pub mod trigger;

use serde::{Deserialize, Serialize};

use crate::core::types::{CrisisId, FactionId, SystemId, Turn};

pub use machine::{advance_phase, check_resolution, phase_for_elapsed, process_crisis_turn, CrisisUpdate};
pub use spawn::{crisis_design, select_target, spawn_wave, WaveSize};
pub use trigger::{activate, roll_trigger, trigger_chance, trigger_eligible};

/// Highest crisis phase
pub const MAX_PHASE: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrisisType {
    /// Strikes the most heavily defended system
    ExtragalacticSwarm,
    /// Rises in an industrial system
    MachineUprising,
    /// Raids along faction borders
    CorsairArmada,
    /// Tears open wherever no fleet stands guard
    VoidIncursion,
}

impl CrisisType {
    /// Roll order for triggering
    pub const ALL: [CrisisType; 4] = [
        CrisisType::ExtragalacticSwarm,
        CrisisType::MachineUprising,
        CrisisType::CorsairArmada,
        CrisisType::VoidIncursion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CrisisType::ExtragalacticSwarm => "Extragalactic Swarm",
            CrisisType::MachineUprising => "Machine Uprising",
            CrisisType::CorsairArmada => "Corsair Armada",
            CrisisType::VoidIncursion => "Void Incursion",
        }
    }

    /// Ship class name for spawned vessels
    pub fn ship_class(&self) -> &'static str {
        match self {
            CrisisType::ExtragalacticSwarm => "Swarm Drone",
            CrisisType::MachineUprising => "Rogue Automaton",
            CrisisType::CorsairArmada => "Corsair Raider",
            CrisisType::VoidIncursion => "Void Leviathan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrisisOutcome {
    /// The galaxy beat the crisis back
    Victory,
    /// No player faction survived
    Defeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrisisStatus {
    Active,
    Resolved(CrisisOutcome),
}

/// A crisis and its escalation state. Resolved crises stay in the session
/// for reporting and are never reactivated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crisis {
    pub id: CrisisId,
    pub crisis_type: CrisisType,
    /// Synthetic faction owning the crisis fleets
    pub faction: FactionId,
    pub origin: SystemId,
    pub start_turn: Turn,
    /// 1..=4
    pub phase: u8,
    /// Combined firepower of the crisis fleets, refreshed every turn
    pub threat_level: f64,
    pub status: CrisisStatus,
    /// Phases that already produced their wave
    pub spawned_phases: Vec<u8>,
    pub resolved_on: Option<Turn>,
}

impl Crisis {
    pub fn new(id: CrisisId, crisis_type: CrisisType, faction: FactionId, origin: SystemId, start_turn: Turn) -> Self {
        Self {
            id,
            crisis_type,
            faction,
            origin,
            start_turn,
            phase: 1,
            threat_level: 0.0,
            status: CrisisStatus::Active,
            spawned_phases: Vec::new(),
            resolved_on: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CrisisStatus::Active
    }

    pub fn outcome(&self) -> Option<CrisisOutcome> {
        match self.status {
            CrisisStatus::Resolved(outcome) => Some(outcome),
            CrisisStatus::Active => None,
        }
    }

    pub fn has_spawned(&self, phase: u8) -> bool {
        self.spawned_phases.contains(&phase)
    }

    pub fn elapsed(&self, turn: Turn) -> u32 {
        turn.saturating_sub(self.start_turn)
    }

    /// Terminal: later calls are ignored
    pub fn resolve(&mut self, outcome: CrisisOutcome, turn: Turn) {
        if self.is_active() {
            self.status = CrisisStatus::Resolved(outcome);
            self.resolved_on = Some(turn);
        }
    }
}
