//! Stance and experience modifiers
//!
//! Applied once, when a fleet is snapshotted for combat: stance first,
//! then experience multiplies firepower on top.

use crate::galaxy::{ExperienceLevel, FleetStance};

/// Aggressive: hits hard, exposes itself
pub const AGGRESSIVE_FIREPOWER: f64 = 1.3;
pub const AGGRESSIVE_HULL: f64 = 0.8;
pub const AGGRESSIVE_EVASION: f64 = 0.8;

/// Defensive: trades firepower for durability
pub const DEFENSIVE_FIREPOWER: f64 = 0.8;
pub const DEFENSIVE_HULL: f64 = 1.3;

/// Evasive: weak guns, hard to hit
pub const EVASIVE_FIREPOWER: f64 = 0.7;
pub const EVASIVE_EVASION: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StanceModifiers {
    pub firepower: f64,
    pub hull: f64,
    pub evasion: f64,
}

impl StanceModifiers {
    pub fn for_stance(stance: FleetStance) -> Self {
        match stance {
            FleetStance::Aggressive => Self {
                firepower: AGGRESSIVE_FIREPOWER,
                hull: AGGRESSIVE_HULL,
                evasion: AGGRESSIVE_EVASION,
            },
            FleetStance::Defensive => Self {
                firepower: DEFENSIVE_FIREPOWER,
                hull: DEFENSIVE_HULL,
                evasion: 1.0,
            },
            FleetStance::Evasive => Self {
                firepower: EVASIVE_FIREPOWER,
                hull: 1.0,
                evasion: EVASIVE_EVASION,
            },
            FleetStance::Neutral => Self {
                firepower: 1.0,
                hull: 1.0,
                evasion: 1.0,
            },
        }
    }
}

/// Firepower multiplier from crew experience
pub fn experience_multiplier(level: ExperienceLevel) -> f64 {
    match level {
        ExperienceLevel::Green => 0.85,
        ExperienceLevel::Veteran => 1.1,
        ExperienceLevel::Elite => 1.2,
        ExperienceLevel::Legendary => 1.35,
    }
}
