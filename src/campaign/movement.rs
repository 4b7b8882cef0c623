//! Fleet movement between systems
//!
//! A fleet with a destination accumulates progress each turn until it
//! reaches 100, at which point it jumps to the destination in one step.
//! Per-turn progress is `base × averageSpeed / 100`; the integer part is
//! added to `progress` and the fraction is carried to the next turn, so a
//! speed-100 fleet goes 33, 66, 100 and arrives on its third turn.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::config::MovementRules;
use crate::core::types::{FactionId, FleetId, SystemId};
use crate::galaxy::{Fleet, GameState};

/// Progress value at which a fleet arrives
pub const ARRIVAL_PROGRESS: u32 = 100;

/// Tolerance for float drift in the carried fraction
const CARRY_EPSILON: f64 = 1e-9;

/// Result of advancing one fleet by one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementOutcome {
    /// No destination; nothing happened
    Idle,
    StillEnRoute(u32),
    Arrived(SystemId),
}

/// A fleet that completed its jump this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrival {
    pub fleet: FleetId,
    pub owner: FactionId,
    pub system: SystemId,
}

/// Advance a single fleet by one turn
pub fn advance(fleet: &mut Fleet, rules: &MovementRules) -> MovementOutcome {
    let Some(destination) = fleet.destination else {
        return MovementOutcome::Idle;
    };

    let speed = fleet.average_speed().unwrap_or(rules.default_speed).max(0.0);
    let gained = rules.base_progress_per_turn() * speed / 100.0 + fleet.progress_carry;
    let whole = (gained + CARRY_EPSILON).floor();
    fleet.progress_carry = (gained - whole).max(0.0);

    let progress = fleet.progress.saturating_add(whole as u32);
    if progress >= ARRIVAL_PROGRESS {
        // Location, destination and progress change together
        fleet.location = destination;
        fleet.destination = None;
        fleet.progress = 0;
        fleet.progress_carry = 0.0;
        return MovementOutcome::Arrived(destination);
    }

    fleet.progress = progress;
    MovementOutcome::StillEnRoute(progress)
}

/// Advance every en-route fleet in the game. Empty fleets are skipped.
pub fn move_fleets(state: &mut GameState, rules: &MovementRules) -> Vec<Arrival> {
    let mut arrivals = Vec::new();

    for fleet in state.fleets.iter_mut().filter(|f| f.is_en_route()) {
        if fleet.is_empty() {
            warn!(fleet = fleet.id.0, "Skipping movement for fleet with no ships");
            continue;
        }

        match advance(fleet, rules) {
            MovementOutcome::Arrived(system) => {
                debug!(fleet = fleet.id.0, system = system.0, "Fleet arrived");
                arrivals.push(Arrival {
                    fleet: fleet.id,
                    owner: fleet.owner,
                    system,
                });
            }
            MovementOutcome::StillEnRoute(progress) => {
                debug!(fleet = fleet.id.0, progress, "Fleet en route");
            }
            MovementOutcome::Idle => {}
        }
    }

    arrivals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Position, ShipId};
    use crate::galaxy::{FactionKind, FleetStance, Ship, ShipDesign};

    fn fleet_with_speeds(speeds: &[f64]) -> Fleet {
        let mut fleet = Fleet::new(FleetId(1), "Test Fleet".to_string(), FactionId(1), SystemId(1));
        for (i, &speed) in speeds.iter().enumerate() {
            let design = ShipDesign::destroyer().with_speed(speed);
            fleet.ships.push(Ship::from_design(ShipId(i as u32 + 1), &design));
        }
        fleet
    }

    #[test]
    fn test_idle_fleet_untouched() {
        let mut fleet = fleet_with_speeds(&[100.0]);
        assert_eq!(advance(&mut fleet, &MovementRules::default()), MovementOutcome::Idle);
        assert_eq!(fleet.progress, 0);
    }

    #[test]
    fn test_speed_100_arrives_on_third_turn() {
        let rules = MovementRules::default();
        let mut fleet = fleet_with_speeds(&[100.0, 100.0]);
        fleet.order_move_to(SystemId(2));

        assert_eq!(advance(&mut fleet, &rules), MovementOutcome::StillEnRoute(33));
        assert_eq!(advance(&mut fleet, &rules), MovementOutcome::StillEnRoute(66));
        assert_eq!(advance(&mut fleet, &rules), MovementOutcome::Arrived(SystemId(2)));

        assert_eq!(fleet.location, SystemId(2));
        assert_eq!(fleet.destination, None);
        assert_eq!(fleet.progress, 0);
        assert_eq!(fleet.progress_carry, 0.0);
    }

    #[test]
    fn test_speed_10_keeps_exact_pace() {
        let rules = MovementRules::default();
        let mut fleet = fleet_with_speeds(&[10.0]);
        fleet.order_move_to(SystemId(2));

        for _ in 0..29 {
            assert!(matches!(advance(&mut fleet, &rules), MovementOutcome::StillEnRoute(_)));
        }
        assert_eq!(fleet.progress, 96);
        assert_eq!(advance(&mut fleet, &rules), MovementOutcome::Arrived(SystemId(2)));
    }

    #[test]
    fn test_slow_fleet_uses_average_speed() {
        let rules = MovementRules::default();
        // average 50 -> 16.67 per turn -> 6 turns
        let mut fleet = fleet_with_speeds(&[25.0, 75.0]);
        fleet.order_move_to(SystemId(2));

        let mut turns = 0;
        loop {
            turns += 1;
            if let MovementOutcome::Arrived(_) = advance(&mut fleet, &rules) {
                break;
            }
            assert!(turns < 20);
        }
        assert_eq!(turns, 6);
    }

    #[test]
    fn test_empty_fleet_uses_default_speed() {
        let rules = MovementRules::default();
        let mut fleet = fleet_with_speeds(&[]);
        fleet.order_move_to(SystemId(2));
        assert_eq!(advance(&mut fleet, &rules), MovementOutcome::StillEnRoute(33));
    }

    #[test]
    fn test_move_fleets_reports_arrivals_and_skips_empty() {
        let mut state = GameState::new();
        let faction = state.add_faction("Accord", FactionKind::Player);
        let sol = state.add_system("Sol", Position::new(0.0, 0.0));
        let vega = state.add_system("Vega", Position::new(1.0, 0.0));

        let fast = state.commission_fleet(faction, sol, "Fast", &[ShipDesign::destroyer().with_speed(300.0)], FleetStance::Neutral);
        let empty = state.commission_fleet(faction, sol, "Empty", &[], FleetStance::Neutral);
        state.get_fleet_mut(fast).unwrap().order_move_to(vega);
        state.get_fleet_mut(empty).unwrap().order_move_to(vega);

        let arrivals = move_fleets(&mut state, &MovementRules::default());
        assert_eq!(arrivals, vec![Arrival { fleet: fast, owner: faction, system: vega }]);
        assert_eq!(state.get_fleet(empty).unwrap().location, sol);
        assert_eq!(state.get_fleet(empty).unwrap().progress, 0);
    }
}
