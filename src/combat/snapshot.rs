//! Combat snapshots
//!
//! A fleet is copied into a `CombatSide` before an encounter so the round
//! loop never touches persisted ships. Results are written back once the
//! encounter is over.

use serde::{Deserialize, Serialize};

use crate::combat::modifiers::{experience_multiplier, StanceModifiers};
use crate::core::types::{FactionId, FleetId, ShipId};
use crate::galaxy::{Fleet, FleetStance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }
}

/// Per-ship combat state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatShip {
    pub ship_id: ShipId,
    pub hull: f64,
    pub max_hull: f64,
    pub shields: f64,
    pub max_shields: f64,
    pub firepower: f64,
    pub evasion: f64,
    /// Set at end of the round in which hull dropped to zero or below
    pub destroyed: bool,
}

impl CombatShip {
    pub fn new(ship_id: ShipId, hull: f64, shields: f64, firepower: f64, evasion: f64) -> Self {
        Self {
            ship_id,
            hull,
            max_hull: hull,
            shields,
            max_shields: shields,
            firepower,
            evasion,
            destroyed: false,
        }
    }

    /// Still in the living pool. A ship at zero hull stays in the pool,
    /// and keeps firing, until the round ends.
    pub fn in_pool(&self) -> bool {
        !self.destroyed
    }
}

/// One side of an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSide {
    pub faction: FactionId,
    pub fleet: FleetId,
    pub stance: FleetStance,
    /// Stance hull multiplier baked into `ships`; undone at write-back
    pub hull_multiplier: f64,
    pub ships: Vec<CombatShip>,
}

impl CombatSide {
    /// Snapshot a fleet with stance and experience modifiers applied
    pub fn from_fleet(fleet: &Fleet) -> Self {
        let stance = StanceModifiers::for_stance(fleet.stance);
        let experience = experience_multiplier(fleet.experience_level());

        let ships = fleet
            .ships
            .iter()
            .map(|ship| CombatShip {
                ship_id: ship.id,
                hull: ship.hull * stance.hull,
                max_hull: ship.max_hull * stance.hull,
                shields: ship.shields,
                max_shields: ship.max_shields,
                firepower: ship.firepower * stance.firepower * experience,
                evasion: ship.evasion * stance.evasion,
                destroyed: false,
            })
            .collect();

        Self {
            faction: fleet.owner,
            fleet: fleet.id,
            stance: fleet.stance,
            hull_multiplier: stance.hull,
            ships,
        }
    }

    /// Build a side directly from ships (no modifiers)
    pub fn from_ships(faction: FactionId, fleet: FleetId, stance: FleetStance, ships: Vec<CombatShip>) -> Self {
        Self {
            faction,
            fleet,
            stance,
            hull_multiplier: 1.0,
            ships,
        }
    }

    /// Indices of ships still in the living pool
    pub fn living_indices(&self) -> Vec<usize> {
        self.ships
            .iter()
            .enumerate()
            .filter(|(_, s)| s.in_pool())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn living_count(&self) -> usize {
        self.ships.iter().filter(|s| s.in_pool()).count()
    }

    pub fn destroyed_count(&self) -> usize {
        self.ships.iter().filter(|s| s.destroyed).count()
    }

    pub fn is_annihilated(&self) -> bool {
        self.living_count() == 0
    }

    /// Total hull of ships still in the pool
    pub fn remaining_hull(&self) -> f64 {
        self.ships
            .iter()
            .filter(|s| s.in_pool())
            .map(|s| s.hull.max(0.0))
            .sum()
    }

    /// Total max hull of every ship that started the encounter
    pub fn max_hull(&self) -> f64 {
        self.ships.iter().map(|s| s.max_hull).sum()
    }

    /// Living hull as a fraction of starting max hull
    pub fn hull_ratio(&self) -> f64 {
        let max = self.max_hull();
        if max <= 0.0 {
            return 0.0;
        }
        self.remaining_hull() / max
    }

    /// Move ships at zero hull out of the living pool. Returns how many.
    pub fn sweep_destroyed(&mut self) -> u32 {
        let mut swept = 0;
        for ship in self.ships.iter_mut().filter(|s| s.in_pool() && s.hull <= 0.0) {
            ship.destroyed = true;
            swept += 1;
        }
        swept
    }
}
