//! Encounter setup and write-back
//!
//! Finds contested systems, picks each faction's representative fleet,
//! runs the engagement on snapshots and copies the results back onto the
//! persisted fleets.

use tracing::{debug, warn};

use crate::combat::report::{CombatSummary, SideSummary};
use crate::combat::resolution::{run_engagement, EngagementResult};
use crate::combat::snapshot::{CombatSide, Side};
use crate::core::config::CombatRules;
use crate::core::error::CombatError;
use crate::core::random::RandomSource;
use crate::core::types::{FactionId, FleetId, ShipId, SystemId};
use crate::galaxy::{Fleet, FleetStance, GameState, TurnEvent};

/// The fleet that fights for `faction` in `system`: highest raw firepower,
/// ties to the lowest fleet id
pub fn representative(state: &GameState, system: SystemId, faction: FactionId) -> Option<FleetId> {
    state
        .fleets_at(system)
        .filter(|f| f.owner == faction)
        .fold(None::<&Fleet>, |best, fleet| match best {
            Some(b) if b.total_firepower() >= fleet.total_firepower() => Some(b),
            _ => Some(fleet),
        })
        .map(|f| f.id)
}

/// Systems holding at least one pair of representatives that will fight
pub fn contested_systems(state: &GameState) -> Vec<SystemId> {
    state
        .systems
        .iter()
        .map(|s| s.id)
        .filter(|&system| !hostile_pairs(state, system).is_empty())
        .collect()
}

/// Faction pairs in `system` whose representatives should engage, in
/// faction-id order
pub fn hostile_pairs(state: &GameState, system: SystemId) -> Vec<(FactionId, FactionId)> {
    let factions = state.factions_at(system);
    let mut pairs = Vec::new();

    for (i, &a) in factions.iter().enumerate() {
        for &b in &factions[i + 1..] {
            let fleets = (
                representative(state, system, a).and_then(|id| state.get_fleet(id)),
                representative(state, system, b).and_then(|id| state.get_fleet(id)),
            );
            if let (Some(fa), Some(fb)) = fleets {
                if should_engage(state, fa, fb) {
                    pairs.push((a, b));
                }
            }
        }
    }

    pairs
}

/// Two representatives fight when their factions are hostile or either
/// fleet is Aggressive. Allies never fight.
pub fn should_engage(state: &GameState, a: &Fleet, b: &Fleet) -> bool {
    if a.owner == b.owner || state.relations.allied(a.owner, b.owner) {
        return false;
    }
    state.are_hostile(a.owner, b.owner)
        || a.stance == FleetStance::Aggressive
        || b.stance == FleetStance::Aggressive
}

/// Returns `(attacker, defender)`. The system's controller defends; failing
/// that an Aggressive fleet attacks; failing that the lower faction id attacks.
pub fn order_sides(state: &GameState, system: SystemId, a: &Fleet, b: &Fleet) -> (FleetId, FleetId) {
    let controller = state.get_system(system).and_then(|s| s.controller);

    if controller == Some(b.owner) {
        return (a.id, b.id);
    }
    if controller == Some(a.owner) {
        return (b.id, a.id);
    }

    match (a.stance == FleetStance::Aggressive, b.stance == FleetStance::Aggressive) {
        (true, false) => (a.id, b.id),
        (false, true) => (b.id, a.id),
        _ if a.owner <= b.owner => (a.id, b.id),
        _ => (b.id, a.id),
    }
}

/// Resolve one encounter and write the results back onto both fleets
pub fn resolve_encounter(
    state: &mut GameState,
    system: SystemId,
    attacker_id: FleetId,
    defender_id: FleetId,
    rules: &CombatRules,
    rng: &mut dyn RandomSource,
) -> Result<CombatSummary, CombatError> {
    if state.get_system(system).is_none() {
        return Err(CombatError::InvalidEncounter(format!("unknown system {:?}", system)));
    }
    let attacker = state
        .get_fleet(attacker_id)
        .ok_or_else(|| CombatError::InvalidEncounter(format!("unknown attacker fleet {:?}", attacker_id)))?;
    let defender = state
        .get_fleet(defender_id)
        .ok_or_else(|| CombatError::InvalidEncounter(format!("unknown defender fleet {:?}", defender_id)))?;

    if attacker.location != system || defender.location != system {
        return Err(CombatError::InvalidEncounter(format!(
            "fleets {:?} and {:?} are not both in {:?}",
            attacker_id, defender_id, system
        )));
    }
    if attacker.owner == defender.owner {
        return Err(CombatError::InvalidEncounter(format!(
            "fleets {:?} and {:?} belong to the same faction",
            attacker_id, defender_id
        )));
    }

    let attacker_side = CombatSide::from_fleet(attacker);
    let defender_side = CombatSide::from_fleet(defender);

    if attacker_side.ships.is_empty() || defender_side.ships.is_empty() {
        return Ok(bloodless_takeover(state, system, attacker_side, defender_side));
    }

    debug!(
        system = system.0,
        attacker = attacker_id.0,
        defender = defender_id.0,
        "Resolving encounter"
    );

    let result = run_engagement(attacker_side, defender_side, rules, rng);
    let (attacker_lost, defender_lost) = write_back(state, &result);
    award_outcome(state, &result, attacker_lost, defender_lost, rules);

    let summary = CombatSummary {
        system,
        attacker: side_summary(&result.attacker),
        defender: side_summary(&result.defender),
        winner: result.winner,
        was_retreat: result.was_retreat,
        retreated: result.retreated,
        bloodless: false,
        rounds: result.rounds,
    };

    debug!(
        system = system.0,
        rounds = summary.rounds_fought(),
        winner = ?summary.winning_faction(),
        retreat = summary.was_retreat,
        "Encounter resolved"
    );

    Ok(summary)
}

/// One side brought no ships: no rounds. If the attacker has ships it takes
/// control of the system.
fn bloodless_takeover(
    state: &mut GameState,
    system: SystemId,
    attacker: CombatSide,
    defender: CombatSide,
) -> CombatSummary {
    let winner = match (attacker.ships.is_empty(), defender.ships.is_empty()) {
        (false, true) => Some(Side::Attacker),
        (true, false) => Some(Side::Defender),
        _ => None,
    };

    if winner == Some(Side::Attacker) {
        let previous = state.get_system(system).and_then(|s| s.controller);
        if previous != Some(attacker.faction) {
            if let Some(sys) = state.get_system_mut(system) {
                sys.controller = Some(attacker.faction);
            }
            state.record(TurnEvent::SystemCaptured {
                system,
                from: previous,
                to: attacker.faction,
            });
        }
    }

    debug!(system = system.0, winner = ?winner, "Bloodless takeover");

    CombatSummary {
        system,
        attacker: side_summary(&attacker),
        defender: side_summary(&defender),
        rounds: Vec::new(),
        winner,
        was_retreat: false,
        retreated: None,
        bloodless: true,
    }
}

/// Copy surviving ship state back and remove destroyed ships.
/// Returns ships lost by (attacker, defender).
fn write_back(state: &mut GameState, result: &EngagementResult) -> (u32, u32) {
    let attacker_lost = state
        .get_fleet_mut(result.attacker.fleet)
        .map(|fleet| apply_side(fleet, &result.attacker))
        .unwrap_or(0);
    let defender_lost = state
        .get_fleet_mut(result.defender.fleet)
        .map(|fleet| apply_side(fleet, &result.defender))
        .unwrap_or(0);
    (attacker_lost, defender_lost)
}

fn apply_side(fleet: &mut Fleet, side: &CombatSide) -> u32 {
    let destroyed: Vec<ShipId> = side
        .ships
        .iter()
        .filter(|s| s.destroyed)
        .map(|s| s.ship_id)
        .collect();

    for snapshot in side.ships.iter().filter(|s| !s.destroyed) {
        if let Some(ship) = fleet.ships.iter_mut().find(|s| s.id == snapshot.ship_id) {
            // Undo the stance hull multiplier so persisted hull stays within max
            ship.hull = (snapshot.hull / side.hull_multiplier).min(ship.max_hull);
            ship.shields = snapshot.shields.clamp(0.0, ship.max_shields);
        }
    }

    fleet.ships.retain(|s| !destroyed.contains(&s.id));
    destroyed.len() as u32
}

fn award_outcome(
    state: &mut GameState,
    result: &EngagementResult,
    attacker_lost: u32,
    defender_lost: u32,
    rules: &CombatRules,
) {
    let fleets = [
        (Side::Attacker, result.attacker.fleet, attacker_lost),
        (Side::Defender, result.defender.fleet, defender_lost),
    ];

    for (side, fleet_id, lost) in fleets {
        let Some(fleet) = state.get_fleet_mut(fleet_id) else {
            warn!(fleet = fleet_id.0, "Fleet vanished before combat rewards");
            continue;
        };
        match result.winner {
            Some(winner) if winner == side => fleet.award_experience(rules.xp_for_win),
            Some(_) => {
                fleet.award_experience(rules.xp_for_loss);
                fleet.lose_morale(rules.morale_loss_per_ship * lost);
            }
            None => fleet.award_experience(rules.xp_for_loss),
        }
    }
}

fn side_summary(side: &CombatSide) -> SideSummary {
    SideSummary {
        faction: side.faction,
        fleet: side.fleet,
        stance: side.stance,
        ships_before: side.ships.len() as u32,
        ships_lost: side.destroyed_count() as u32,
        ships_remaining: side.living_count() as u32,
        hull_remaining: side.remaining_hull(),
    }
}

/// Resolve every hostile pairing in every contested system.
///
/// Pairs within a system fight one after another in faction-id order, and
/// representatives are re-selected for each pair so earlier losses count.
pub fn resolve_contested_systems(
    state: &mut GameState,
    rules: &CombatRules,
    rng: &mut dyn RandomSource,
) -> Vec<CombatSummary> {
    let mut summaries = Vec::new();

    for system in contested_systems(state) {
        for (a, b) in hostile_pairs(state, system) {
            // Re-select: earlier pairs in this system may have changed the fleets
            let pairing = match (
                representative(state, system, a).and_then(|id| state.get_fleet(id)),
                representative(state, system, b).and_then(|id| state.get_fleet(id)),
            ) {
                (Some(fa), Some(fb)) => Some(order_sides(state, system, fa, fb)),
                _ => None,
            };
            let Some((attacker, defender)) = pairing else {
                continue;
            };

            match resolve_encounter(state, system, attacker, defender, rules, rng) {
                Ok(summary) => summaries.push(summary),
                Err(e) => warn!(system = system.0, error = %e, "Skipping encounter"),
            }
        }
    }

    summaries
}
