//! Crisis phase machine
//!
//! Inactive -> Active(1..=4) -> Resolved(Victory | Defeat). The phase is a
//! pure function of turns since the crisis started; every increase spawns
//! one reinforcement wave per newly reached phase.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::config::CrisisRules;
use crate::core::random::RandomSource;
use crate::core::types::{CrisisId, FleetId};
use crate::crisis::spawn::{select_target, spawn_wave};
use crate::crisis::trigger::{activate, roll_trigger};
use crate::crisis::{CrisisOutcome, MAX_PHASE};
use crate::galaxy::{GameState, TurnEvent};
use crate::turn::{VictoryReport, VictoryType};

/// Turns per phase
const PHASE_LENGTH: u32 = 10;

/// What the crisis machine did this turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrisisUpdate {
    pub emerged: Option<CrisisId>,
    /// `(old, new)` when the phase increased
    pub phase_change: Option<(u8, u8)>,
    pub reinforcements: Vec<FleetId>,
    pub resolved: Option<CrisisOutcome>,
}

/// Phase after `elapsed` turns: 1 through turn 10, then one more every ten turns, capped at 4
pub fn phase_for_elapsed(elapsed: u32) -> u8 {
    if elapsed <= PHASE_LENGTH {
        return 1;
    }
    ((elapsed - 1) / PHASE_LENGTH + 1).min(MAX_PHASE as u32) as u8
}

/// One crisis turn: trigger a new crisis if eligible, otherwise escalate the
/// active one, then check for resolution.
pub fn process_crisis_turn(state: &mut GameState, rules: &CrisisRules, rng: &mut dyn RandomSource) -> CrisisUpdate {
    let mut update = CrisisUpdate::default();

    if state.active_crisis().is_none() {
        match roll_trigger(state, rules, rng) {
            Some(crisis_type) => update.emerged = activate(state, crisis_type, rules, rng),
            None => return update,
        }
    } else {
        let (phase_change, reinforcements) = advance_phase(state, rules, rng);
        update.phase_change = phase_change;
        update.reinforcements = reinforcements;
    }

    update.resolved = check_resolution(state, rules);
    update
}

/// Escalate the active crisis to the phase its age calls for, spawning
/// reinforcements for every phase that has not produced a wave yet.
pub fn advance_phase(
    state: &mut GameState,
    rules: &CrisisRules,
    rng: &mut dyn RandomSource,
) -> (Option<(u8, u8)>, Vec<FleetId>) {
    let Some(crisis) = state.active_crisis() else {
        return (None, Vec::new());
    };
    let (crisis_type, faction, origin, old_phase) = (crisis.crisis_type, crisis.faction, crisis.origin, crisis.phase);
    let new_phase = phase_for_elapsed(crisis.elapsed(state.turn));

    let mut spawned = Vec::new();
    if new_phase > old_phase {
        let profile = *rules.profiles.get(crisis_type);

        for phase in old_phase + 1..=new_phase {
            if state.active_crisis().map(|c| c.has_spawned(phase)).unwrap_or(true) {
                continue;
            }
            let system = select_target(state, crisis_type, rng).unwrap_or(origin);
            let fleet = spawn_wave(state, faction, crisis_type, &profile, phase, system);
            let ships = state.get_fleet(fleet).map(|f| f.ships.len() as u32).unwrap_or(0);

            if let Some(crisis) = state.active_crisis_mut() {
                crisis.spawned_phases.push(phase);
            }
            state.record(TurnEvent::CrisisReinforcements {
                fleet,
                system,
                phase,
                ships,
            });
            spawned.push(fleet);
        }

        if let Some(crisis) = state.active_crisis_mut() {
            crisis.phase = new_phase;
        }
        state.record(TurnEvent::CrisisPhaseAdvanced { phase: new_phase });
        info!(
            crisis = crisis_type.name(),
            from = old_phase,
            to = new_phase,
            waves = spawned.len(),
            "Crisis escalated"
        );
    }

    let threat: f64 = state.fleets_of(faction).map(|f| f.total_firepower()).sum();
    if let Some(crisis) = state.active_crisis_mut() {
        crisis.threat_level = threat;
    }

    let change = (new_phase > old_phase).then_some((old_phase, new_phase));
    (change, spawned)
}

/// Resolve the active crisis if it has been beaten or has won.
///
/// Victory needs the crisis fleets gone after the crisis reached
/// `victory_min_phase`. Defeat means every player faction has been defeated,
/// which also ends the game. A galaxy that never had a player faction (an
/// all-AI run) cannot lose to the crisis this way; it ends through the other
/// victory conditions.
pub fn check_resolution(state: &mut GameState, rules: &CrisisRules) -> Option<CrisisOutcome> {
    let crisis = state.active_crisis()?;
    let (faction, phase, crisis_type) = (crisis.faction, crisis.phase, crisis.crisis_type);
    let turn = state.turn;

    let fleets_left = state.fleets_of(faction).any(|f| !f.is_empty());
    let has_players = state.factions.iter().any(|f| f.is_player());
    let players_left = state.surviving_players().next().is_some();

    let outcome = if !fleets_left && phase >= rules.victory_min_phase {
        CrisisOutcome::Victory
    } else if has_players && !players_left {
        CrisisOutcome::Defeat
    } else {
        return None;
    };

    if let Some(crisis) = state.active_crisis_mut() {
        crisis.resolve(outcome, turn);
    }
    state.record(TurnEvent::CrisisResolved { outcome });

    match outcome {
        CrisisOutcome::Victory => {
            if let Some(f) = state.get_faction_mut(faction) {
                f.mark_defeated(turn);
            }
            info!(crisis = crisis_type.name(), turn, "Crisis defeated");
        }
        CrisisOutcome::Defeat => {
            let name = state
                .get_faction(faction)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| crisis_type.name().to_string());
            state.game_over = true;
            state.outcome = Some(VictoryReport {
                faction,
                name,
                victory_type: VictoryType::CrisisTriumph,
                turn,
            });
            warn!(crisis = crisis_type.name(), turn, "Crisis overran the galaxy");
        }
    }

    Some(outcome)
}
