//! State changes returned by external collaborators
//!
//! Collaborators never touch `GameState` directly. They read it and return a
//! list of changes, which the orchestrator applies before the next phase.

use serde::{Deserialize, Serialize};

use crate::core::types::{FactionId, FleetId, SystemId};
use crate::galaxy::events::TurnEvent;
use crate::galaxy::faction::ResourceLedger;
use crate::galaxy::fleet::{FleetStance, ShipDesign};
use crate::galaxy::world::GameState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateChange {
    // Economy
    Resources { faction: FactionId, delta: ResourceLedger },
    Research { faction: FactionId, points: f64 },

    // Diplomacy
    War { a: FactionId, b: FactionId, at_war: bool },
    Alliance { a: FactionId, b: FactionId, allied: bool },
    WarScore { faction: FactionId, other: FactionId, delta: i32 },

    // Colonies
    ColonyFounded { system: SystemId, owner: FactionId, population: f64 },
    ColonyPopulation { system: SystemId, population: f64 },
    ColonyLost { system: SystemId },
    SystemControl { system: SystemId, controller: Option<FactionId> },

    // Fleets
    FleetCommissioned {
        owner: FactionId,
        system: SystemId,
        name: String,
        designs: Vec<ShipDesign>,
        stance: FleetStance,
    },
    FleetOrdered { fleet: FleetId, destination: Option<SystemId> },
    StanceChanged { fleet: FleetId, stance: FleetStance },

    // Exploration
    SystemDiscovered { faction: FactionId, system: SystemId },

    // Events
    EventRaised { faction: FactionId, message: String },
    EventsResolved { faction: FactionId, count: u32 },
}

/// Why a change could not be applied
#[derive(Debug, Clone, PartialEq)]
pub enum Rejected {
    UnknownFaction(FactionId),
    UnknownFleet(FleetId),
    UnknownSystem(SystemId),
}

impl GameState {
    /// Apply a batch of changes. Changes naming unknown ids are skipped and
    /// returned so the caller can log them.
    pub fn apply_changes(&mut self, changes: Vec<StateChange>) -> Vec<(StateChange, Rejected)> {
        let mut rejected = Vec::new();
        for change in changes {
            if let Err(reason) = self.apply_change(&change) {
                rejected.push((change, reason));
            }
        }
        rejected
    }

    pub fn apply_change(&mut self, change: &StateChange) -> Result<(), Rejected> {
        match change {
            StateChange::Resources { faction, delta } => {
                self.faction_or_reject(*faction)?.apply_resources(delta);
            }
            StateChange::Research { faction, points } => {
                let delta = ResourceLedger {
                    research: *points,
                    ..ResourceLedger::default()
                };
                self.faction_or_reject(*faction)?.apply_resources(&delta);
            }
            StateChange::War { a, b, at_war } => {
                self.require_faction(*a)?;
                self.require_faction(*b)?;
                self.relations.set_war(*a, *b, *at_war);
            }
            StateChange::Alliance { a, b, allied } => {
                self.require_faction(*a)?;
                self.require_faction(*b)?;
                self.relations.set_alliance(*a, *b, *allied);
            }
            StateChange::WarScore { faction, other, delta } => {
                self.require_faction(*faction)?;
                self.require_faction(*other)?;
                self.relations.adjust_war_score(*faction, *other, *delta);
            }
            StateChange::ColonyFounded { system, owner, population } => {
                self.require_system(*system)?;
                self.require_faction(*owner)?;
                self.add_colony(*system, *owner, *population);
            }
            StateChange::ColonyPopulation { system, population } => {
                let colony = self
                    .colonies
                    .iter_mut()
                    .find(|c| c.system == *system)
                    .ok_or(Rejected::UnknownSystem(*system))?;
                colony.population = population.max(0.0);
            }
            StateChange::ColonyLost { system } => {
                self.require_system(*system)?;
                self.colonies.retain(|c| c.system != *system);
            }
            StateChange::SystemControl { system, controller } => {
                if let Some(owner) = controller {
                    self.require_faction(*owner)?;
                }
                self.get_system_mut(*system)
                    .ok_or(Rejected::UnknownSystem(*system))?
                    .controller = *controller;
            }
            StateChange::FleetCommissioned { owner, system, name, designs, stance } => {
                self.require_faction(*owner)?;
                self.require_system(*system)?;
                self.commission_fleet(*owner, *system, name.clone(), designs, *stance);
            }
            StateChange::FleetOrdered { fleet, destination } => {
                if let Some(dest) = destination {
                    self.require_system(*dest)?;
                }
                let fleet = self.get_fleet_mut(*fleet).ok_or(Rejected::UnknownFleet(*fleet))?;
                match destination {
                    Some(dest) => fleet.order_move_to(*dest),
                    None => fleet.cancel_orders(),
                }
            }
            StateChange::StanceChanged { fleet, stance } => {
                self.get_fleet_mut(*fleet)
                    .ok_or(Rejected::UnknownFleet(*fleet))?
                    .stance = *stance;
            }
            StateChange::SystemDiscovered { faction, system } => {
                self.require_system(*system)?;
                if self.faction_or_reject(*faction)?.discover(*system) {
                    self.record(TurnEvent::SystemDiscovered {
                        faction: *faction,
                        system: *system,
                    });
                }
            }
            StateChange::EventRaised { faction, message } => {
                let entry = self.faction_or_reject(*faction)?;
                entry.pending_events += 1;
                self.record(TurnEvent::Notice {
                    faction: *faction,
                    message: message.clone(),
                });
            }
            StateChange::EventsResolved { faction, count } => {
                let entry = self.faction_or_reject(*faction)?;
                entry.pending_events = entry.pending_events.saturating_sub(*count);
            }
        }
        Ok(())
    }

    fn faction_or_reject(&mut self, id: FactionId) -> Result<&mut crate::galaxy::Faction, Rejected> {
        self.get_faction_mut(id).ok_or(Rejected::UnknownFaction(id))
    }

    fn require_faction(&self, id: FactionId) -> Result<(), Rejected> {
        self.get_faction(id).map(|_| ()).ok_or(Rejected::UnknownFaction(id))
    }

    fn require_system(&self, id: SystemId) -> Result<(), Rejected> {
        self.get_system(id).map(|_| ()).ok_or(Rejected::UnknownSystem(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Position;
    use crate::galaxy::FactionKind;

    fn test_state() -> (GameState, FactionId, FactionId, SystemId) {
        let mut state = GameState::new();
        let a = state.add_faction("Accord", FactionKind::Player);
        let b = state.add_faction("Hegemony", FactionKind::Ai);
        let sol = state.add_system("Sol", Position::new(0.0, 0.0));
        (state, a, b, sol)
    }

    #[test]
    fn test_resources_and_research_hit_ledger() {
        let (mut state, a, _, _) = test_state();
        let rejected = state.apply_changes(vec![
            StateChange::Resources {
                faction: a,
                delta: ResourceLedger { credits: 25.0, energy: 5.0, food: -1.0, research: 0.0 },
            },
            StateChange::Research { faction: a, points: 12.5 },
        ]);

        assert!(rejected.is_empty());
        let ledger = state.get_faction(a).unwrap().turn_ledger;
        assert_eq!(ledger.credits, 25.0);
        assert_eq!(ledger.food, -1.0);
        assert_eq!(ledger.research, 12.5);
    }

    #[test]
    fn test_unknown_ids_are_rejected_not_fatal() {
        let (mut state, a, _, sol) = test_state();
        let rejected = state.apply_changes(vec![
            StateChange::Research { faction: FactionId(99), points: 1.0 },
            StateChange::FleetOrdered { fleet: FleetId(42), destination: Some(sol) },
            StateChange::Research { faction: a, points: 1.0 },
        ]);

        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].1, Rejected::UnknownFaction(FactionId(99)));
        assert_eq!(rejected[1].1, Rejected::UnknownFleet(FleetId(42)));
        assert_eq!(state.get_faction(a).unwrap().turn_ledger.research, 1.0);
    }

    #[test]
    fn test_fleet_orders_and_commissioning() {
        let (mut state, a, _, sol) = test_state();
        let vega = state.add_system("Vega", Position::new(5.0, 0.0));
        state
            .apply_change(&StateChange::FleetCommissioned {
                owner: a,
                system: sol,
                name: "Vanguard".to_string(),
                designs: vec![ShipDesign::cruiser()],
                stance: FleetStance::Defensive,
            })
            .unwrap();

        let fleet_id = state.fleets[0].id;
        state
            .apply_change(&StateChange::FleetOrdered { fleet: fleet_id, destination: Some(vega) })
            .unwrap();

        let fleet = state.get_fleet(fleet_id).unwrap();
        assert_eq!(fleet.destination, Some(vega));
        assert_eq!(fleet.stance, FleetStance::Defensive);
    }

    #[test]
    fn test_pending_events() {
        let (mut state, a, _, _) = test_state();
        state.apply_changes(vec![
            StateChange::EventRaised { faction: a, message: "Derelict found".to_string() },
            StateChange::EventRaised { faction: a, message: "Strike".to_string() },
            StateChange::EventsResolved { faction: a, count: 1 },
        ]);
        assert_eq!(state.get_faction(a).unwrap().pending_events, 1);
        assert_eq!(state.log.len(), 2);
    }

    #[test]
    fn test_discovery_logged_once() {
        let (mut state, a, _, sol) = test_state();
        state.apply_changes(vec![
            StateChange::SystemDiscovered { faction: a, system: sol },
            StateChange::SystemDiscovered { faction: a, system: sol },
        ]);
        assert_eq!(state.log.len(), 1);
    }
}
