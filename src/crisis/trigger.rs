//! Crisis trigger roll and activation

use tracing::info;

use crate::core::config::{CrisisProfile, CrisisRules};
use crate::core::random::RandomSource;
use crate::core::types::{CrisisId, Turn};
use crate::crisis::spawn::{select_target, spawn_wave};
use crate::crisis::{Crisis, CrisisType};
use crate::galaxy::{FactionKind, GameState, TurnEvent};

/// Chance that a crisis with this profile triggers on `turn`; zero before its minimum turn
pub fn trigger_chance(profile: &CrisisProfile, rules: &CrisisRules, turn: Turn) -> f64 {
    if turn < profile.min_turn {
        return 0.0;
    }
    let past = (turn - profile.min_turn) as f64;
    (rules.base_trigger_chance + rules.trigger_chance_per_turn * past).min(rules.max_trigger_chance)
}

/// No crisis is active, and either none has happened yet or repeats are allowed
pub fn trigger_eligible(state: &GameState, rules: &CrisisRules) -> bool {
    state.active_crisis().is_none() && (rules.allow_repeat || state.crises.is_empty())
}

/// Roll each crisis type in order. The first success wins.
///
/// Only types past their minimum turn draw from the random source.
pub fn roll_trigger(state: &GameState, rules: &CrisisRules, rng: &mut dyn RandomSource) -> Option<CrisisType> {
    if !trigger_eligible(state, rules) {
        return None;
    }

    CrisisType::ALL.into_iter().find(|&crisis_type| {
        let profile = rules.profiles.get(crisis_type);
        state.turn >= profile.min_turn && rng.chance(trigger_chance(profile, rules, state.turn))
    })
}

/// Start a crisis: create its faction, pick an origin and spawn the opening force
pub fn activate(
    state: &mut GameState,
    crisis_type: CrisisType,
    rules: &CrisisRules,
    rng: &mut dyn RandomSource,
) -> Option<CrisisId> {
    let origin = select_target(state, crisis_type, rng)?;
    let id = CrisisId(state.crises.len() as u32 + 1);
    let faction = state.add_faction(crisis_type.name(), FactionKind::Crisis(id));

    let mut crisis = Crisis::new(id, crisis_type, faction, origin, state.turn);
    let profile = rules.profiles.get(crisis_type);
    let fleet = spawn_wave(state, faction, crisis_type, profile, 1, origin);
    crisis.spawned_phases.push(1);
    crisis.threat_level = state.get_fleet(fleet).map(|f| f.total_firepower()).unwrap_or(0.0);
    state.crises.push(crisis);

    state.record(TurnEvent::CrisisEmerged {
        crisis_type,
        faction,
        origin,
    });
    info!(
        crisis = crisis_type.name(),
        turn = state.turn,
        origin = origin.0,
        "Crisis emerged"
    );

    Some(id)
}
