//! Fleets and ships
//!
//! A fleet is a mobile group of ships under one faction. It sits in exactly
//! one system, optionally travels toward a destination, and carries the
//! stance and experience that modify how it fights.

use serde::{Deserialize, Serialize};

use crate::core::types::{FactionId, FleetId, ShipId, SystemId};

/// XP needed for each experience level
pub const VETERAN_XP: u32 = 100;
pub const ELITE_XP: u32 = 300;
pub const LEGENDARY_XP: u32 = 600;

pub const MAX_MORALE: u32 = 100;

/// Fleet-level combat posture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FleetStance {
    Aggressive, // Engage on sight, never withdraws
    Defensive,  // Holds, trades firepower for durability
    Evasive,    // Avoids damage, withdraws early
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Green,
    Veteran,
    Elite,
    Legendary,
}

impl ExperienceLevel {
    pub fn from_xp(xp: u32) -> Self {
        match xp {
            x if x >= LEGENDARY_XP => ExperienceLevel::Legendary,
            x if x >= ELITE_XP => ExperienceLevel::Elite,
            x if x >= VETERAN_XP => ExperienceLevel::Veteran,
            _ => ExperienceLevel::Green,
        }
    }

    /// Lowest XP that yields this level
    pub fn threshold(&self) -> u32 {
        match self {
            ExperienceLevel::Green => 0,
            ExperienceLevel::Veteran => VETERAN_XP,
            ExperienceLevel::Elite => ELITE_XP,
            ExperienceLevel::Legendary => LEGENDARY_XP,
        }
    }
}

/// Blueprint used to build ships
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipDesign {
    pub class: String,
    pub hull: f64,
    pub shields: f64,
    pub firepower: f64,
    pub evasion: f64,
    pub speed: f64,
}

impl ShipDesign {
    pub fn new(class: impl Into<String>, hull: f64, shields: f64, firepower: f64) -> Self {
        Self {
            class: class.into(),
            hull,
            shields,
            firepower,
            evasion: 0.0,
            speed: 100.0,
        }
    }

    pub fn with_evasion(mut self, evasion: f64) -> Self {
        self.evasion = evasion;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn corvette() -> Self {
        Self::new("Corvette", 60.0, 20.0, 12.0).with_evasion(30.0).with_speed(125.0)
    }

    pub fn destroyer() -> Self {
        Self::new("Destroyer", 120.0, 40.0, 25.0).with_evasion(15.0)
    }

    pub fn cruiser() -> Self {
        Self::new("Cruiser", 250.0, 80.0, 45.0).with_evasion(5.0).with_speed(80.0)
    }
}

/// A single ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub id: ShipId,
    pub class: String,
    pub hull: f64,
    pub max_hull: f64,
    pub shields: f64,
    pub max_shields: f64,
    pub firepower: f64,
    pub evasion: f64,
    pub speed: f64,
}

impl Ship {
    pub fn from_design(id: ShipId, design: &ShipDesign) -> Self {
        Self {
            id,
            class: design.class.clone(),
            hull: design.hull,
            max_hull: design.hull,
            shields: design.shields,
            max_shields: design.shields,
            firepower: design.firepower,
            evasion: design.evasion,
            speed: design.speed,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hull > 0.0
    }
}

/// A fleet on the galaxy map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fleet {
    pub id: FleetId,
    pub name: String,
    pub owner: FactionId,
    pub location: SystemId,
    pub destination: Option<SystemId>,
    /// Travel progress toward `destination`, 0..=100
    pub progress: u32,
    /// Fractional progress carried between turns
    pub progress_carry: f64,
    pub stance: FleetStance,
    pub experience: u32,
    pub morale: u32, // 0 - 100
    pub ships: Vec<Ship>,
}

impl Fleet {
    pub fn new(id: FleetId, name: String, owner: FactionId, location: SystemId) -> Self {
        Self {
            id,
            name,
            owner,
            location,
            destination: None,
            progress: 0,
            progress_carry: 0.0,
            stance: FleetStance::default(),
            experience: 0,
            morale: MAX_MORALE,
            ships: Vec::new(),
        }
    }

    pub fn with_stance(mut self, stance: FleetStance) -> Self {
        self.stance = stance;
        self
    }

    pub fn with_experience(mut self, xp: u32) -> Self {
        self.experience = xp;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    pub fn is_en_route(&self) -> bool {
        self.destination.is_some()
    }

    pub fn experience_level(&self) -> ExperienceLevel {
        ExperienceLevel::from_xp(self.experience)
    }

    /// Sum of raw ship firepower (no stance or experience modifiers)
    pub fn total_firepower(&self) -> f64 {
        self.ships.iter().map(|s| s.firepower).sum()
    }

    pub fn total_hull(&self) -> f64 {
        self.ships.iter().map(|s| s.hull).sum()
    }

    /// Mean ship speed, or `None` for an empty fleet
    pub fn average_speed(&self) -> Option<f64> {
        if self.ships.is_empty() {
            return None;
        }
        Some(self.ships.iter().map(|s| s.speed).sum::<f64>() / self.ships.len() as f64)
    }

    /// Give movement orders. Restarts progress from zero.
    pub fn order_move_to(&mut self, destination: SystemId) {
        self.destination = Some(destination);
        self.progress = 0;
        self.progress_carry = 0.0;
    }

    /// Cancel movement orders
    pub fn cancel_orders(&mut self) {
        self.destination = None;
        self.progress = 0;
        self.progress_carry = 0.0;
    }

    pub fn award_experience(&mut self, xp: u32) {
        self.experience = self.experience.saturating_add(xp);
    }

    pub fn lose_morale(&mut self, amount: u32) {
        self.morale = self.morale.saturating_sub(amount);
    }
}
