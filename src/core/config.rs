//! Game rules with documented constants
//!
//! All tunable numbers for movement, combat, crisis escalation and victory
//! live here. Rules are owned per game session; they can be loaded from TOML
//! (see `data/rules.toml`), and any missing section falls back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::ConfigError;
use crate::crisis::CrisisType;

/// Complete rule set for one game session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameRules {
    #[serde(default)]
    pub movement: MovementRules,
    #[serde(default)]
    pub combat: CombatRules,
    #[serde(default)]
    pub crisis: CrisisRules,
    #[serde(default)]
    pub victory: VictoryRules,
    #[serde(default)]
    pub turn: TurnRules,
}

// === MOVEMENT ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementRules {
    /// Turns a speed-100 fleet needs to complete one jump
    ///
    /// At 3.0 the per-turn progress is 100/3: the integer progress goes
    /// 33, 66, 100 because the fractional part is carried between turns.
    pub turns_per_jump: f64,

    /// Speed assumed for a fleet that has no ships
    pub default_speed: f64,
}

impl Default for MovementRules {
    fn default() -> Self {
        Self {
            turns_per_jump: 3.0,
            default_speed: 100.0,
        }
    }
}

impl MovementRules {
    /// Progress points gained per turn by a fleet moving at speed 100.
    ///
    /// This is the exact `100 / turns_per_jump` rather than a rounded 33.
    /// Movement scales it by speed and carries the fraction between turns, so
    /// a jump takes `turns_per_jump × 100 / speed` turns rounded up: 3 turns at
    /// speed 100, 30 at speed 10. A rounded per-turn increment of 33 would need a
    /// fourth turn at speed 100, and drifts further at low speeds (34 turns at
    /// speed 10).
    pub fn base_progress_per_turn(&self) -> f64 {
        100.0 / self.turns_per_jump
    }
}

// === COMBAT ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatRules {
    /// Hard cap on rounds per encounter
    pub max_rounds: u32,

    /// Floor for hit chance regardless of target evasion
    pub min_hit_chance: f64,

    /// Damage roll is firepower × U(damage_variance_min, damage_variance_max)
    pub damage_variance_min: f64,
    pub damage_variance_max: f64,

    /// Independent chance that a hit is critical
    pub critical_chance: f64,
    pub critical_multiplier: f64,

    /// Minimum damage dealt by any hit
    pub min_damage: f64,

    /// Evasive sides withdraw below this living-hull fraction
    pub evasive_retreat_threshold: f64,

    /// Defensive and Neutral sides withdraw below this living-hull fraction
    pub steady_retreat_threshold: f64,

    pub xp_for_win: u32,
    pub xp_for_loss: u32,

    /// Morale lost by the losing fleet per ship it lost
    pub morale_loss_per_ship: u32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            min_hit_chance: 0.2,
            damage_variance_min: 0.8,
            damage_variance_max: 1.2,
            critical_chance: 0.1,
            critical_multiplier: 1.5,
            min_damage: 1.0,
            evasive_retreat_threshold: 0.7,
            steady_retreat_threshold: 0.4,
            xp_for_win: 50,
            xp_for_loss: 20,
            morale_loss_per_ship: 10,
        }
    }
}

// === CRISIS ===

/// Tuning for one crisis type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrisisProfile {
    /// Earliest turn this crisis may trigger
    pub min_turn: u32,
    /// Aggregate power of a wave at phase 2 (scales with phase / 2)
    pub base_power: f64,
    /// Ship count of a wave at phase 2 (scales with phase / 2)
    pub base_ships: u32,
    /// Evasion rating of spawned ships
    pub evasion: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrisisProfiles {
    pub extragalactic_swarm: CrisisProfile,
    pub machine_uprising: CrisisProfile,
    pub corsair_armada: CrisisProfile,
    pub void_incursion: CrisisProfile,
}

impl Default for CrisisProfiles {
    fn default() -> Self {
        Self {
            extragalactic_swarm: CrisisProfile {
                min_turn: 120,
                base_power: 400.0,
                base_ships: 6,
                evasion: 10.0,
            },
            machine_uprising: CrisisProfile {
                min_turn: 150,
                base_power: 350.0,
                base_ships: 5,
                evasion: 5.0,
            },
            corsair_armada: CrisisProfile {
                min_turn: 80,
                base_power: 200.0,
                base_ships: 4,
                evasion: 25.0,
            },
            void_incursion: CrisisProfile {
                min_turn: 200,
                base_power: 500.0,
                base_ships: 8,
                evasion: 15.0,
            },
        }
    }
}

impl CrisisProfiles {
    pub fn get(&self, crisis_type: CrisisType) -> &CrisisProfile {
        match crisis_type {
            CrisisType::ExtragalacticSwarm => &self.extragalactic_swarm,
            CrisisType::MachineUprising => &self.machine_uprising,
            CrisisType::CorsairArmada => &self.corsair_armada,
            CrisisType::VoidIncursion => &self.void_incursion,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrisisRules {
    /// Trigger chance on the first eligible turn
    pub base_trigger_chance: f64,
    /// Added to the trigger chance per turn past the minimum turn
    pub trigger_chance_per_turn: f64,
    pub max_trigger_chance: f64,
    /// Whether a new crisis may trigger after a previous one resolved
    pub allow_repeat: bool,
    /// Crisis must reach this phase before its defeat counts as a victory
    pub victory_min_phase: u8,
    pub profiles: CrisisProfiles,
}

impl Default for CrisisRules {
    fn default() -> Self {
        Self {
            base_trigger_chance: 0.02,
            trigger_chance_per_turn: 0.005,
            max_trigger_chance: 0.5,
            allow_repeat: false,
            victory_min_phase: 3,
            profiles: CrisisProfiles::default(),
        }
    }
}

// === VICTORY ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VictoryRules {
    /// Last non-crisis faction standing wins
    pub conquest: bool,
    /// Highest score wins when this turn is reached
    pub turn_limit: Option<u32>,
}

impl Default for VictoryRules {
    fn default() -> Self {
        Self {
            conquest: true,
            turn_limit: None,
        }
    }
}

// === TURN ===

/// What happens to earlier phases' effects when a later phase fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Restore the pre-turn state on failure
    #[default]
    Transactional,
    /// Keep whatever earlier phases committed (legacy behaviour)
    PartialCommit,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnRules {
    pub commit_policy: CommitPolicy,
}

impl GameRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse rules from a TOML document and validate them
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let rules: GameRules = toml::from_str(content)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load rules from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Validate rules for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.movement.turns_per_jump <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "movement.turns_per_jump must be positive, got {}",
                self.movement.turns_per_jump
            )));
        }

        let combat = &self.combat;
        if combat.max_rounds == 0 {
            return Err(ConfigError::Invalid("combat.max_rounds must be at least 1".into()));
        }
        if combat.damage_variance_min > combat.damage_variance_max {
            return Err(ConfigError::Invalid(format!(
                "combat.damage_variance_min ({}) exceeds damage_variance_max ({})",
                combat.damage_variance_min, combat.damage_variance_max
            )));
        }
        if !(0.0..=1.0).contains(&combat.min_hit_chance)
            || !(0.0..=1.0).contains(&combat.critical_chance)
        {
            return Err(ConfigError::Invalid("combat chances must lie in [0, 1]".into()));
        }

        let crisis = &self.crisis;
        if crisis.max_trigger_chance < 0.0 || crisis.max_trigger_chance > 1.0 {
            return Err(ConfigError::Invalid("crisis.max_trigger_chance must lie in [0, 1]".into()));
        }
        if !(1..=4).contains(&crisis.victory_min_phase) {
            return Err(ConfigError::Invalid(format!(
                "crisis.victory_min_phase must be 1..=4, got {}",
                crisis.victory_min_phase
            )));
        }

        Ok(())
    }
}
