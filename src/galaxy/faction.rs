//! Factions - playable, AI-controlled, and synthetic crisis powers

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::{CrisisId, FactionId, SystemId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactionKind {
    Player,
    Ai,
    /// Synthetic faction owning a crisis' fleets
    Crisis(CrisisId),
}

/// Resource and research movement over one turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceLedger {
    pub credits: f64,
    pub energy: f64,
    pub food: f64,
    pub research: f64,
}

impl ResourceLedger {
    pub fn add(&mut self, other: &ResourceLedger) {
        self.credits += other.credits;
        self.energy += other.energy;
        self.food += other.food;
        self.research += other.research;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    pub kind: FactionKind,
    pub defeated: bool,
    /// Turn the faction was defeated on
    pub defeated_on: Option<u32>,
    /// Accumulated stockpile
    pub stockpile: ResourceLedger,
    /// Changes applied during the current (or last completed) turn
    pub turn_ledger: ResourceLedger,
    /// Events awaiting a decision from this faction
    pub pending_events: u32,
    pub known_systems: AHashSet<SystemId>,
}

impl Faction {
    pub fn new(id: FactionId, name: String, kind: FactionKind) -> Self {
        Self {
            id,
            name,
            kind,
            defeated: false,
            defeated_on: None,
            stockpile: ResourceLedger::default(),
            turn_ledger: ResourceLedger::default(),
            pending_events: 0,
            known_systems: AHashSet::new(),
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self.kind, FactionKind::Ai)
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, FactionKind::Player)
    }

    pub fn is_crisis(&self) -> bool {
        matches!(self.kind, FactionKind::Crisis(_))
    }

    pub fn crisis_id(&self) -> Option<CrisisId> {
        match self.kind {
            FactionKind::Crisis(id) => Some(id),
            _ => None,
        }
    }

    pub fn knows(&self, system: SystemId) -> bool {
        self.known_systems.contains(&system)
    }

    /// Record a system as known. Returns true on first discovery.
    pub fn discover(&mut self, system: SystemId) -> bool {
        self.known_systems.insert(system)
    }

    pub fn mark_defeated(&mut self, turn: u32) {
        if !self.defeated {
            self.defeated = true;
            self.defeated_on = Some(turn);
        }
    }

    /// Apply a resource change to both the stockpile and this turn's ledger
    pub fn apply_resources(&mut self, delta: &ResourceLedger) {
        self.stockpile.add(delta);
        self.turn_ledger.add(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faction_kinds() {
        let player = Faction::new(FactionId(1), "Terran Accord".to_string(), FactionKind::Player);
        let crisis = Faction::new(FactionId(9), "The Swarm".to_string(), FactionKind::Crisis(CrisisId(0)));

        assert!(player.is_player());
        assert!(!player.is_ai());
        assert!(crisis.is_crisis());
        assert_eq!(crisis.crisis_id(), Some(CrisisId(0)));
        assert_eq!(player.crisis_id(), None);
    }

    #[test]
    fn test_discovery_reports_first_visit_only() {
        let mut faction = Faction::new(FactionId(1), "Test".to_string(), FactionKind::Ai);
        assert!(faction.discover(SystemId(4)));
        assert!(!faction.discover(SystemId(4)));
        assert!(faction.knows(SystemId(4)));
    }

    #[test]
    fn test_resources_feed_ledger_and_stockpile() {
        let mut faction = Faction::new(FactionId(1), "Test".to_string(), FactionKind::Player);
        let delta = ResourceLedger { credits: 10.0, energy: -2.0, food: 3.0, research: 0.0 };
        faction.apply_resources(&delta);
        faction.apply_resources(&delta);

        assert_eq!(faction.stockpile.credits, 20.0);
        assert_eq!(faction.turn_ledger.energy, -4.0);

        faction.turn_ledger = ResourceLedger::default();
        assert_eq!(faction.stockpile.food, 6.0);
    }

    #[test]
    fn test_defeat_is_sticky() {
        let mut faction = Faction::new(FactionId(1), "Test".to_string(), FactionKind::Ai);
        faction.mark_defeated(12);
        faction.mark_defeated(20);
        assert!(faction.defeated);
        assert_eq!(faction.defeated_on, Some(12));
    }
}
