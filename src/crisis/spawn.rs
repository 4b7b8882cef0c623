//! Crisis forces and where they appear

use ahash::AHashMap;

use crate::core::config::CrisisProfile;
use crate::core::random::RandomSource;
use crate::core::types::{FactionId, FleetId, SystemId};
use crate::crisis::CrisisType;
use crate::galaxy::{ExperienceLevel, FleetStance, GameState, ShipDesign};

/// Ship count and per-ship power of one wave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveSize {
    pub ships: u32,
    pub power_per_ship: f64,
}

impl WaveSize {
    /// `ceil(base_ships × phase / 2)` ships sharing `base_power × phase / 2`
    pub fn for_phase(profile: &CrisisProfile, phase: u8) -> Self {
        let scale = phase as f64 / 2.0;
        let ships = ((profile.base_ships as f64 * scale).ceil() as u32).max(1);
        let total_power = profile.base_power * scale;
        Self {
            ships,
            power_per_ship: total_power / ships as f64,
        }
    }

    pub fn total_power(&self) -> f64 {
        self.power_per_ship * self.ships as f64
    }
}

/// Ship blueprint for a crisis vessel of the given power
pub fn crisis_design(crisis_type: CrisisType, power: f64, evasion: f64) -> ShipDesign {
    ShipDesign::new(crisis_type.ship_class(), power, power / 2.0, power / 5.0).with_evasion(evasion)
}

/// Commission one Aggressive, Veteran wave for `phase` at `system`
pub fn spawn_wave(
    state: &mut GameState,
    faction: FactionId,
    crisis_type: CrisisType,
    profile: &CrisisProfile,
    phase: u8,
    system: SystemId,
) -> FleetId {
    let size = WaveSize::for_phase(profile, phase);
    let design = crisis_design(crisis_type, size.power_per_ship, profile.evasion);
    let designs = vec![design; size.ships as usize];
    let name = format!("{} Wave {}", crisis_type.name(), phase);

    let id = state.commission_fleet(faction, system, name, &designs, FleetStance::Aggressive);
    if let Some(fleet) = state.get_fleet_mut(id) {
        fleet.experience = fleet.experience.max(ExperienceLevel::Veteran.threshold());
    }
    id
}

/// Pick where a crisis of this type strikes. `None` only for an empty galaxy.
pub fn select_target(state: &GameState, crisis_type: CrisisType, rng: &mut dyn RandomSource) -> Option<SystemId> {
    if state.systems.is_empty() {
        return None;
    }

    let chosen = match crisis_type {
        CrisisType::ExtragalacticSwarm => strongest_defended(state),
        CrisisType::MachineUprising => pick(rng, industrial_systems(state)),
        CrisisType::CorsairArmada => pick(rng, border_systems(state)),
        CrisisType::VoidIncursion => uncontested_systems(state).first().copied(),
    };

    chosen.or_else(|| pick(rng, state.systems.iter().map(|s| s.id).collect()))
}

fn pick(rng: &mut dyn RandomSource, candidates: Vec<SystemId>) -> Option<SystemId> {
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.index(candidates.len())])
}

/// Non-crisis firepower stationed per system
fn garrison_strength(state: &GameState) -> AHashMap<SystemId, f64> {
    let mut strength: AHashMap<SystemId, f64> = AHashMap::new();
    for fleet in state.fleets.iter().filter(|f| !state.is_crisis_faction(f.owner)) {
        *strength.entry(fleet.location).or_insert(0.0) += fleet.total_firepower();
    }
    strength
}

/// Highest garrison firepower, ties to the lowest system id
fn strongest_defended(state: &GameState) -> Option<SystemId> {
    let strength = garrison_strength(state);
    let mut best: Option<(SystemId, f64)> = None;
    for system in &state.systems {
        let power = strength.get(&system.id).copied().unwrap_or(0.0);
        if power <= 0.0 {
            continue;
        }
        match best {
            Some((_, best_power)) if best_power >= power => {}
            _ => best = Some((system.id, power)),
        }
    }
    best.map(|(id, _)| id)
}

fn industrial_systems(state: &GameState) -> Vec<SystemId> {
    state
        .systems
        .iter()
        .filter(|s| s.industry > 0)
        .map(|s| s.id)
        .collect()
}

/// Controlled systems with a hyperlane into space held by someone else
fn border_systems(state: &GameState) -> Vec<SystemId> {
    state
        .systems
        .iter()
        .filter(|s| {
            let Some(owner) = s.controller else {
                return false;
            };
            s.hyperlanes.iter().any(|&next| {
                state
                    .get_system(next)
                    .map(|n| n.controller != Some(owner))
                    .unwrap_or(false)
            })
        })
        .map(|s| s.id)
        .collect()
}

/// Systems without any fleet present, in id order
fn uncontested_systems(state: &GameState) -> Vec<SystemId> {
    state
        .systems
        .iter()
        .filter(|s| state.fleets_at(s.id).next().is_none())
        .map(|s| s.id)
        .collect()
}
