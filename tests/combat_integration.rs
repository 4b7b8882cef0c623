//! Combat integration tests
//!
//! End-to-end encounter resolution against persisted fleets, plus property
//! tests for the damage model and the write-back invariants.

use proptest::prelude::*;

use stellar_dominion::combat::{
    apply_damage, resolve_contested_systems, resolve_encounter, run_engagement, CombatShip, CombatSide, Side,
};
use stellar_dominion::core::config::CombatRules;
use stellar_dominion::core::types::{FactionId, FleetId, Position, ShipId, SystemId};
use stellar_dominion::core::{ScriptedRandom, SeededRandom};
use stellar_dominion::galaxy::{FactionKind, FleetStance, GameState, ShipDesign, TurnEvent};

/// Every shot: target 0, hit, variance 1.0, no critical
fn always_hit() -> ScriptedRandom {
    ScriptedRandom::new(vec![0.0, 0.0, 0.5, 0.99])
}

fn lone_ship(faction: u32, stance: FleetStance, hull: f64, firepower: f64) -> CombatSide {
    CombatSide::from_ships(
        FactionId(faction),
        FleetId(faction),
        stance,
        vec![CombatShip::new(ShipId(faction), hull, 0.0, firepower, 0.0)],
    )
}

fn war_zone() -> (GameState, FactionId, FactionId, SystemId) {
    let mut state = GameState::new();
    let a = state.add_faction("Accord", FactionKind::Player);
    let b = state.add_faction("Hegemony", FactionKind::Ai);
    let sol = state.add_system("Sol", Position::new(0.0, 0.0));
    state.relations.set_war(a, b, true);
    (state, a, b, sol)
}

#[test]
fn test_fifty_damage_kills_hundred_hull_in_two_rounds() {
    let rules = CombatRules::default();
    let attacker = lone_ship(1, FleetStance::Neutral, 500.0, 50.0);
    let defender = lone_ship(2, FleetStance::Neutral, 100.0, 0.0);

    let result = run_engagement(attacker, defender, &rules, &mut always_hit());

    assert_eq!(result.rounds.len(), 2);
    assert_eq!(result.winner, Some(Side::Attacker));
    assert!(result.defender.is_annihilated());
    assert!(!result.was_retreat);
}

#[test]
fn test_defensive_retreat_threshold() {
    let rules = CombatRules::default();

    // 65 damage leaves 35% hull: withdraws after the first round
    let result = run_engagement(
        lone_ship(1, FleetStance::Aggressive, 1000.0, 65.0),
        lone_ship(2, FleetStance::Defensive, 100.0, 1.0),
        &rules,
        &mut always_hit(),
    );
    assert_eq!(result.rounds.len(), 1);
    assert_eq!(result.retreated, Some(Side::Defender));

    // 55 damage leaves 45% hull: holds, and dies in the second round
    let result = run_engagement(
        lone_ship(1, FleetStance::Aggressive, 1000.0, 55.0),
        lone_ship(2, FleetStance::Defensive, 100.0, 1.0),
        &rules,
        &mut always_hit(),
    );
    assert_eq!(result.rounds.len(), 2);
    assert!(!result.was_retreat);
    assert!(result.defender.is_annihilated());
}

#[test]
fn test_withdrawing_fleet_still_wins_on_hull() {
    let (mut state, a, b, sol) = war_zone();
    let bulk = ShipDesign::new("Bulk Hauler", 1000.0, 0.0, 1.0);
    let glass = ShipDesign::new("Glass Cannon", 100.0, 0.0, 400.0);
    let fa = state.commission_fleet(a, sol, "Convoy", &[bulk], FleetStance::Evasive);
    let fb = state.commission_fleet(b, sol, "Ambush", &[glass], FleetStance::Aggressive);

    let summary = resolve_encounter(&mut state, sol, fa, fb, &CombatRules::default(), &mut always_hit()).unwrap();

    // One volley costs the convoy over 30% of its hull, so it withdraws
    assert_eq!(summary.rounds_fought(), 1);
    assert_eq!(summary.retreated, Some(Side::Attacker));
    assert!(summary.attacker.hull_remaining > summary.defender.hull_remaining);
    assert_eq!(summary.winning_faction(), Some(a));

    assert_eq!(state.get_fleet(fa).unwrap().experience, 50);
    assert_eq!(state.get_fleet(fb).unwrap().experience, 20);
}

#[test]
fn test_contested_system_losses_persist() {
    let (mut state, a, b, sol) = war_zone();
    let fa = state.commission_fleet(a, sol, "Home Fleet", &[ShipDesign::cruiser(), ShipDesign::cruiser()], FleetStance::Aggressive);
    let fb = state.commission_fleet(b, sol, "Raiders", &[ShipDesign::corvette()], FleetStance::Aggressive);

    let mut rng = SeededRandom::new(2024);
    let summaries = resolve_contested_systems(&mut state, &CombatRules::default(), &mut rng);
    assert_eq!(summaries.len(), 1);

    let summary = &summaries[0];
    for (side, fleet) in [(Side::Attacker, summary.attacker.fleet), (Side::Defender, summary.defender.fleet)] {
        let persisted = state.get_fleet(fleet).unwrap();
        assert_eq!(persisted.ships.len() as u32, summary.side(side).ships_remaining);
    }
    assert!([fa, fb].contains(&summary.attacker.fleet));

    // Destroyed fleets leave the map at purge time
    let before = state.fleets.len();
    let purged = state.purge_empty_fleets();
    assert_eq!(state.fleets.len(), before - purged.len());
    for fleet in &purged {
        assert!(state
            .log
            .events
            .iter()
            .any(|e| e.event == TurnEvent::FleetDestroyed { fleet: fleet.id, owner: fleet.owner }));
    }
}

#[test]
fn test_crisis_faction_fights_without_war() {
    let mut state = GameState::new();
    let a = state.add_faction("Accord", FactionKind::Player);
    let swarm = state.add_faction("Swarm", FactionKind::Crisis(stellar_dominion::core::CrisisId(1)));
    let sol = state.add_system("Sol", Position::new(0.0, 0.0));
    state.commission_fleet(a, sol, "Pickets", &[ShipDesign::destroyer()], FleetStance::Neutral);
    state.commission_fleet(swarm, sol, "Drones", &[ShipDesign::corvette()], FleetStance::Neutral);

    let mut rng = SeededRandom::new(9);
    let summaries = resolve_contested_systems(&mut state, &CombatRules::default(), &mut rng);
    assert_eq!(summaries.len(), 1);
}

#[test]
fn test_veteran_after_two_wins() {
    let (mut state, a, b, sol) = war_zone();
    let hammer = ShipDesign::new("Hammer", 5000.0, 0.0, 200.0);
    let fa = state.commission_fleet(a, sol, "Hammer", &[hammer], FleetStance::Aggressive);

    for _ in 0..2 {
        let fb = state.commission_fleet(b, sol, "Target", &[ShipDesign::corvette()], FleetStance::Neutral);
        let summary =
            resolve_encounter(&mut state, sol, fa, fb, &CombatRules::default(), &mut always_hit()).unwrap();
        assert_eq!(summary.winning_faction(), Some(a));
        state.purge_empty_fleets();
    }

    let fleet = state.get_fleet(fa).unwrap();
    assert_eq!(fleet.experience, 100);
    assert_eq!(fleet.experience_level(), stellar_dominion::galaxy::ExperienceLevel::Veteran);
}

fn stance() -> impl Strategy<Value = FleetStance> {
    prop_oneof![
        Just(FleetStance::Aggressive),
        Just(FleetStance::Defensive),
        Just(FleetStance::Evasive),
        Just(FleetStance::Neutral),
    ]
}

fn design() -> impl Strategy<Value = ShipDesign> {
    (10.0..300.0f64, 0.0..100.0f64, 1.0..80.0f64, 0.0..60.0f64)
        .prop_map(|(hull, shields, firepower, evasion)| ShipDesign::new("Test", hull, shields, firepower).with_evasion(evasion))
}

proptest! {
    #[test]
    fn prop_shields_absorb_before_hull(hull in 1.0..1000.0f64, shields in 0.0..500.0f64, damage in 0.0..2000.0f64) {
        let mut ship = CombatShip::new(ShipId(1), hull, shields, 0.0, 0.0);
        let report = apply_damage(&mut ship, damage);

        let expected = (damage - shields).max(0.0);
        prop_assert!((hull - ship.hull - expected).abs() < 1e-9);
        prop_assert!((report.absorbed + report.hull_damage - damage).abs() < 1e-9);
        prop_assert!(ship.shields >= 0.0);
    }

    #[test]
    fn prop_encounter_invariants(
        seed in any::<u64>(),
        a_designs in prop::collection::vec(design(), 1..6),
        b_designs in prop::collection::vec(design(), 1..6),
        a_stance in stance(),
        b_stance in stance(),
        a_xp in 0u32..800,
    ) {
        let (mut state, a, b, sol) = war_zone();
        let fa = state.commission_fleet(a, sol, "A", &a_designs, a_stance);
        state.get_fleet_mut(fa).unwrap().experience = a_xp;
        let fb = state.commission_fleet(b, sol, "B", &b_designs, b_stance);

        let mut rng = SeededRandom::new(seed);
        let summary = resolve_encounter(&mut state, sol, fa, fb, &CombatRules::default(), &mut rng).unwrap();

        for (side, stance) in [(Side::Attacker, a_stance), (Side::Defender, b_stance)] {
            let report = summary.side(side);
            // Conservation of ships
            prop_assert_eq!(report.ships_lost + report.ships_remaining, report.ships_before);

            let fleet = state.get_fleet(report.fleet).unwrap();
            prop_assert_eq!(fleet.ships.len() as u32, report.ships_remaining);

            // No negative health
            for ship in &fleet.ships {
                prop_assert!(ship.hull > 0.0 && ship.hull <= ship.max_hull);
                prop_assert!(ship.shields >= 0.0 && ship.shields <= ship.max_shields);
            }

            // Aggressive sides hold their ground
            if stance == FleetStance::Aggressive {
                prop_assert_ne!(summary.retreated, Some(side));
            }
        }

        prop_assert!(summary.rounds_fought() <= CombatRules::default().max_rounds);
        // A retreat does not decide the fight: the side with more hull wins
        if summary.retreated.is_some() {
            let expected = if summary.attacker.hull_remaining > summary.defender.hull_remaining {
                Side::Attacker
            } else {
                Side::Defender
            };
            prop_assert_eq!(summary.winner, Some(expected));
        }
    }
}
