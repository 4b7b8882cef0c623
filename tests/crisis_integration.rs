//! Crisis escalation integration tests

use stellar_dominion::core::config::{CrisisRules, GameRules};
use stellar_dominion::core::error::TurnError;
use stellar_dominion::core::types::{FactionId, Position, SystemId};
use stellar_dominion::core::ScriptedRandom;
use stellar_dominion::crisis::{activate, process_crisis_turn, CrisisOutcome, CrisisType};
use stellar_dominion::galaxy::{FactionKind, GameState, TurnEvent};
use stellar_dominion::turn::{GameRegistry, GameSession, VictoryType};

fn settled_galaxy() -> (GameState, FactionId, SystemId) {
    let mut state = GameState::new();
    let player = state.add_faction("Accord", FactionKind::Player);
    let sol = state.add_system("Sol", Position::new(0.0, 0.0));
    let vega = state.add_system("Vega", Position::new(6.0, 0.0));
    state.connect(sol, vega);
    state.add_colony(sol, player, 10.0);
    (state, player, sol)
}

#[test]
fn test_reinforcements_fire_only_at_phase_transitions() {
    let rules = CrisisRules::default();
    let (mut state, _, _) = settled_galaxy();
    let mut rng = ScriptedRandom::constant(0.0);

    state.turn = 50;
    activate(&mut state, CrisisType::ExtragalacticSwarm, &rules, &mut rng).unwrap();

    let mut spawn_turns = Vec::new();
    let mut phases = Vec::new();
    for turn in 51..=95 {
        state.turn = turn;
        let update = process_crisis_turn(&mut state, &rules, &mut rng);
        if !update.reinforcements.is_empty() {
            assert_eq!(update.reinforcements.len(), 1);
            spawn_turns.push(turn);
        }
        phases.push((turn, state.active_crisis().unwrap().phase));
    }

    assert_eq!(spawn_turns, vec![61, 71, 81]);
    assert!(phases.contains(&(60, 1)));
    assert!(phases.contains(&(61, 2)));
    assert!(phases.contains(&(71, 3)));
    assert!(phases.contains(&(80, 3)));
    assert!(phases.contains(&(81, 4)));
    assert!(phases.contains(&(95, 4)));

    let logged: Vec<u32> = state
        .log
        .events
        .iter()
        .filter(|e| matches!(e.event, TurnEvent::CrisisReinforcements { .. }))
        .map(|e| e.turn)
        .collect();
    assert_eq!(logged, vec![61, 71, 81]);
}

#[test]
fn test_crisis_beaten_after_escalation() {
    let rules = CrisisRules::default();
    let (mut state, _, _) = settled_galaxy();
    let mut rng = ScriptedRandom::constant(0.0);
    state.turn = 10;
    activate(&mut state, CrisisType::CorsairArmada, &rules, &mut rng).unwrap();
    let crisis_faction = state.crises[0].faction;

    // Reach phase 3, then lose every crisis fleet
    state.turn = 31;
    process_crisis_turn(&mut state, &rules, &mut rng);
    assert_eq!(state.crises[0].phase, 3);
    state.fleets.retain(|f| f.owner != crisis_faction);

    state.turn = 32;
    let update = process_crisis_turn(&mut state, &rules, &mut rng);
    assert_eq!(update.resolved, Some(CrisisOutcome::Victory));
    assert!(!state.crises[0].is_active());
    assert!(state.get_faction(crisis_faction).unwrap().defeated);

    // A resolved crisis is kept and never comes back
    state.turn = 500;
    let update = process_crisis_turn(&mut state, &rules, &mut rng);
    assert_eq!(update, Default::default());
    assert_eq!(state.crises.len(), 1);
}

const EARLY_CORSAIRS: &str = r#"
[crisis]
base_trigger_chance = 1.0
max_trigger_chance = 1.0

[crisis.profiles.corsair_armada]
min_turn = 1
base_power = 200.0
base_ships = 4
evasion = 25.0
"#;

#[test]
fn test_crisis_triggers_through_orchestrator_and_can_win() {
    let rules = GameRules::from_toml_str(EARLY_CORSAIRS).unwrap();
    let (state, player, sol) = settled_galaxy();

    let mut registry = GameRegistry::new();
    let id = registry.insert(GameSession::new(state, rules).with_rng(ScriptedRandom::constant(0.0)));

    let result = registry.process_turn(id).unwrap();
    assert!(result.crisis.emerged.is_some());
    assert!(result
        .events
        .iter()
        .any(|e| matches!(e.event, TurnEvent::CrisisEmerged { crisis_type: CrisisType::CorsairArmada, .. })));

    let summary = registry.turn_summary(id, player).unwrap();
    assert!(summary.crisis_active);

    // Corsairs strike the border system
    let session = registry.get_mut(id).unwrap();
    let crisis = session.state.active_crisis().unwrap().clone();
    assert_eq!(crisis.origin, sol);

    // The last player falls: the crisis wins and the game ends
    session.state.get_faction_mut(player).unwrap().mark_defeated(1);
    let result = registry.process_turn(id).unwrap();
    assert_eq!(result.crisis.resolved, Some(CrisisOutcome::Defeat));
    assert!(result.game_ended);
    let winner = result.winner.unwrap();
    assert_eq!(winner.victory_type, VictoryType::CrisisTriumph);
    assert_eq!(winner.faction, crisis.faction);

    assert_eq!(registry.process_turn(id), Err(TurnError::GameOver(id)));
}
