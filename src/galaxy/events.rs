//! Turn events and the session event log

use serde::{Deserialize, Serialize};

use crate::core::types::{FactionId, FleetId, SystemId};
use crate::crisis::{CrisisOutcome, CrisisType};

/// A logged event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub id: u32,
    pub turn: u32,
    pub event: TurnEvent,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    // Movement
    FleetArrived { fleet: FleetId, system: SystemId },
    SystemDiscovered { faction: FactionId, system: SystemId },

    // Military
    SystemCaptured { system: SystemId, from: Option<FactionId>, to: FactionId },
    FleetDestroyed { fleet: FleetId, owner: FactionId },
    FactionEliminated { faction: FactionId },

    // Crisis
    CrisisEmerged { crisis_type: CrisisType, faction: FactionId, origin: SystemId },
    CrisisPhaseAdvanced { phase: u8 },
    CrisisReinforcements { fleet: FleetId, system: SystemId, phase: u8, ships: u32 },
    CrisisResolved { outcome: CrisisOutcome },

    // Collaborator-raised
    Notice { faction: FactionId, message: String },
}

/// Every event of the session, in order
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<LoggedEvent>,
    next_event_id: u32,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, turn: u32, event: TurnEvent) -> u32 {
        let id = self.next_event_id;
        self.next_event_id += 1;
        self.events.push(LoggedEvent { id, turn, event });
        id
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
