//! Round-based engagement resolution
//!
//! Each round the attacker's living ships fire once at random living
//! defenders, then the defender's ships fire back. Shields absorb damage
//! before hull. Ships at zero hull stay targetable until the round ends but
//! fire no more. After each round destroyed ships are swept, annihilation
//! ends the fight, and then each side checks whether it withdraws.

use serde::{Deserialize, Serialize};

use crate::combat::report::{RoundReport, VolleyReport};
use crate::combat::snapshot::{CombatShip, CombatSide, Side};
use crate::core::config::CombatRules;
use crate::core::random::RandomSource;
use crate::galaxy::FleetStance;

/// Damage split produced by a single hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageReport {
    pub absorbed: f64,
    pub hull_damage: f64,
}

/// Result of a single shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShotResult {
    Miss,
    Hit { damage: f64, critical: bool, report: DamageReport },
}

/// Final state of an engagement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementResult {
    pub rounds: Vec<RoundReport>,
    pub winner: Option<Side>,
    pub was_retreat: bool,
    pub retreated: Option<Side>,
    pub attacker: CombatSide,
    pub defender: CombatSide,
}

/// Apply damage to a ship, shields first
pub fn apply_damage(ship: &mut CombatShip, damage: f64) -> DamageReport {
    let damage = damage.max(0.0);
    let absorbed = damage.min(ship.shields.max(0.0));
    ship.shields -= absorbed;
    let hull_damage = damage - absorbed;
    ship.hull -= hull_damage;
    DamageReport { absorbed, hull_damage }
}

/// Chance for a shot to land against a target of the given evasion
pub fn hit_chance(evasion: f64, rules: &CombatRules) -> f64 {
    (1.0 - evasion / 100.0).clamp(rules.min_hit_chance, 1.0)
}

/// Resolve one shot against an already-chosen target.
///
/// Draws the hit roll, and on a hit the damage variance and critical roll.
pub fn resolve_shot(
    firepower: f64,
    target: &mut CombatShip,
    rules: &CombatRules,
    rng: &mut dyn RandomSource,
) -> ShotResult {
    if !rng.chance(hit_chance(target.evasion, rules)) {
        return ShotResult::Miss;
    }

    let mut damage = firepower * rng.range_f64(rules.damage_variance_min, rules.damage_variance_max);
    let critical = rng.chance(rules.critical_chance);
    if critical {
        damage *= rules.critical_multiplier;
    }
    let damage = damage.max(rules.min_damage);

    let report = apply_damage(target, damage);
    ShotResult::Hit { damage, critical, report }
}

/// Every ship in the living pool of `shooters` takes one shot at a random
/// ship in the living pool of `targets`.
pub fn fire_volley(
    shooters: &CombatSide,
    targets: &mut CombatSide,
    rules: &CombatRules,
    rng: &mut dyn RandomSource,
) -> VolleyReport {
    let mut report = VolleyReport::default();
    let pool = targets.living_indices();
    if pool.is_empty() {
        return report;
    }

    for shooter in shooters.ships.iter().filter(|s| s.in_pool()) {
        let target = &mut targets.ships[pool[rng.index(pool.len())]];
        report.shots += 1;

        if let ShotResult::Hit { critical, report: damage, .. } =
            resolve_shot(shooter.firepower, target, rules, rng)
        {
            report.hits += 1;
            if critical {
                report.criticals += 1;
            }
            report.shield_damage += damage.absorbed;
            report.hull_damage += damage.hull_damage;
        }
    }

    report
}

/// Whether a side in `stance` withdraws at the given living-hull ratio
pub fn should_retreat(stance: FleetStance, hull_ratio: f64, rules: &CombatRules) -> bool {
    match stance {
        FleetStance::Aggressive => false,
        FleetStance::Evasive => hull_ratio < rules.evasive_retreat_threshold,
        FleetStance::Defensive | FleetStance::Neutral => hull_ratio < rules.steady_retreat_threshold,
    }
}

/// Decide the winner from the final snapshots.
///
/// The attacker wins iff the defender is annihilated, or both survive and
/// the attacker has more hull left. Mutual annihilation has no winner. A
/// retreat ends the fight without deciding it; the hull comparison still
/// applies, so a side can withdraw and win.
pub fn decide_winner(attacker: &CombatSide, defender: &CombatSide) -> Option<Side> {
    match (attacker.is_annihilated(), defender.is_annihilated()) {
        (true, true) => None,
        (false, true) => Some(Side::Attacker),
        (true, false) => Some(Side::Defender),
        (false, false) => {
            if attacker.remaining_hull() > defender.remaining_hull() {
                Some(Side::Attacker)
            } else {
                Some(Side::Defender)
            }
        }
    }
}

/// Run an engagement to completion
pub fn run_engagement(
    mut attacker: CombatSide,
    mut defender: CombatSide,
    rules: &CombatRules,
    rng: &mut dyn RandomSource,
) -> EngagementResult {
    let mut rounds = Vec::new();
    let mut retreated = None;

    for round in 1..=rules.max_rounds {
        if attacker.is_annihilated() || defender.is_annihilated() {
            break;
        }

        let attacker_volley = fire_volley(&attacker, &mut defender, rules, rng);
        let defender_volley = fire_volley(&defender, &mut attacker, rules, rng);

        let attacker_destroyed = attacker.sweep_destroyed();
        let defender_destroyed = defender.sweep_destroyed();

        rounds.push(RoundReport {
            round,
            attacker_volley,
            defender_volley,
            attacker_destroyed,
            defender_destroyed,
        });

        if attacker.is_annihilated() || defender.is_annihilated() {
            break;
        }

        if should_retreat(attacker.stance, attacker.hull_ratio(), rules) {
            retreated = Some(Side::Attacker);
            break;
        }
        if should_retreat(defender.stance, defender.hull_ratio(), rules) {
            retreated = Some(Side::Defender);
            break;
        }
    }

    let winner = decide_winner(&attacker, &defender);

    EngagementResult {
        rounds,
        winner,
        was_retreat: retreated.is_some(),
        retreated,
        attacker,
        defender,
    }
}
