//! GameState - the per-turn working set
//!
//! Everything a turn reads or mutates lives here. The orchestrator passes it
//! by reference through each phase, so later phases see earlier phases'
//! effects without any ambient shared state.

use serde::{Deserialize, Serialize};

use crate::core::types::{FactionId, FleetId, Position, ShipId, SystemId, Turn};
use crate::crisis::Crisis;
use crate::galaxy::diplomacy::Relations;
use crate::galaxy::events::{EventLog, TurnEvent};
use crate::galaxy::faction::{Faction, FactionKind};
use crate::galaxy::fleet::{Fleet, FleetStance, Ship, ShipDesign};
use crate::galaxy::system::{Colony, StarSystem};
use crate::turn::VictoryReport;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Current turn (starts at 1)
    pub turn: Turn,
    pub game_over: bool,
    /// Set when a victory condition fires
    pub outcome: Option<VictoryReport>,
    pub factions: Vec<Faction>,
    pub systems: Vec<StarSystem>,
    pub fleets: Vec<Fleet>,
    pub colonies: Vec<Colony>,
    pub relations: Relations,
    /// Every crisis of the session; resolved ones are kept for reporting
    pub crises: Vec<Crisis>,
    pub log: EventLog,
    next_faction_id: u32,
    next_system_id: u32,
    next_fleet_id: u32,
    next_ship_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            turn: 1,
            game_over: false,
            outcome: None,
            factions: Vec::new(),
            systems: Vec::new(),
            fleets: Vec::new(),
            colonies: Vec::new(),
            relations: Relations::new(),
            crises: Vec::new(),
            log: EventLog::new(),
            next_faction_id: 1,
            next_system_id: 1,
            next_fleet_id: 1,
            next_ship_id: 1,
        }
    }

    // === CONSTRUCTION ===

    pub fn add_faction(&mut self, name: impl Into<String>, kind: FactionKind) -> FactionId {
        let id = FactionId(self.next_faction_id);
        self.next_faction_id += 1;
        self.factions.push(Faction::new(id, name.into(), kind));
        id
    }

    pub fn add_system(&mut self, name: impl Into<String>, position: Position) -> SystemId {
        let id = SystemId(self.next_system_id);
        self.next_system_id += 1;
        self.systems.push(StarSystem::new(id, name.into(), position));
        id
    }

    /// Add a two-way hyperlane
    pub fn connect(&mut self, a: SystemId, b: SystemId) {
        if a == b {
            return;
        }
        if let Some(sys) = self.get_system_mut(a) {
            if !sys.hyperlanes.contains(&b) {
                sys.hyperlanes.push(b);
            }
        }
        if let Some(sys) = self.get_system_mut(b) {
            if !sys.hyperlanes.contains(&a) {
                sys.hyperlanes.push(a);
            }
        }
    }

    /// Found a colony and take control of its system. The owner learns the system.
    pub fn add_colony(&mut self, system: SystemId, owner: FactionId, population: f64) {
        self.colonies.retain(|c| c.system != system);
        self.colonies.push(Colony { system, owner, population });
        if let Some(sys) = self.get_system_mut(system) {
            sys.controller = Some(owner);
        }
        if let Some(faction) = self.get_faction_mut(owner) {
            faction.discover(system);
        }
    }

    pub fn next_ship_id(&mut self) -> ShipId {
        let id = ShipId(self.next_ship_id);
        self.next_ship_id += 1;
        id
    }

    /// Create a fleet from ship designs. The owner learns the location.
    pub fn commission_fleet(
        &mut self,
        owner: FactionId,
        location: SystemId,
        name: impl Into<String>,
        designs: &[ShipDesign],
        stance: FleetStance,
    ) -> FleetId {
        let id = FleetId(self.next_fleet_id);
        self.next_fleet_id += 1;

        let mut fleet = Fleet::new(id, name.into(), owner, location).with_stance(stance);
        for design in designs {
            let ship_id = self.next_ship_id();
            fleet.ships.push(Ship::from_design(ship_id, design));
        }
        self.fleets.push(fleet);

        if let Some(faction) = self.get_faction_mut(owner) {
            faction.discover(location);
        }
        id
    }

    // === LOOKUP ===

    pub fn get_faction(&self, id: FactionId) -> Option<&Faction> {
        self.factions.iter().find(|f| f.id == id)
    }

    pub fn get_faction_mut(&mut self, id: FactionId) -> Option<&mut Faction> {
        self.factions.iter_mut().find(|f| f.id == id)
    }

    pub fn get_system(&self, id: SystemId) -> Option<&StarSystem> {
        self.systems.iter().find(|s| s.id == id)
    }

    pub fn get_system_mut(&mut self, id: SystemId) -> Option<&mut StarSystem> {
        self.systems.iter_mut().find(|s| s.id == id)
    }

    pub fn get_fleet(&self, id: FleetId) -> Option<&Fleet> {
        self.fleets.iter().find(|f| f.id == id)
    }

    pub fn get_fleet_mut(&mut self, id: FleetId) -> Option<&mut Fleet> {
        self.fleets.iter_mut().find(|f| f.id == id)
    }

    /// All fleets currently located in a system
    pub fn fleets_at(&self, system: SystemId) -> impl Iterator<Item = &Fleet> {
        self.fleets.iter().filter(move |f| f.location == system)
    }

    pub fn fleets_of(&self, faction: FactionId) -> impl Iterator<Item = &Fleet> {
        self.fleets.iter().filter(move |f| f.owner == faction)
    }

    pub fn colonies_of(&self, faction: FactionId) -> impl Iterator<Item = &Colony> {
        self.colonies.iter().filter(move |c| c.owner == faction)
    }

    /// Distinct factions with a fleet in the system, in id order
    pub fn factions_at(&self, system: SystemId) -> Vec<FactionId> {
        let mut factions: Vec<FactionId> = self.fleets_at(system).map(|f| f.owner).collect();
        factions.sort();
        factions.dedup();
        factions
    }

    pub fn is_crisis_faction(&self, id: FactionId) -> bool {
        self.get_faction(id).map(|f| f.is_crisis()).unwrap_or(false)
    }

    /// Crisis factions are hostile to everyone; otherwise hostility is war
    pub fn are_hostile(&self, a: FactionId, b: FactionId) -> bool {
        if a == b {
            return false;
        }
        self.is_crisis_faction(a) || self.is_crisis_faction(b) || self.relations.at_war(a, b)
    }

    pub fn active_crisis(&self) -> Option<&Crisis> {
        self.crises.iter().find(|c| c.is_active())
    }

    pub fn active_crisis_mut(&mut self) -> Option<&mut Crisis> {
        self.crises.iter_mut().find(|c| c.is_active())
    }

    /// Undefeated factions that are neither AI nor crisis
    pub fn surviving_players(&self) -> impl Iterator<Item = &Faction> {
        self.factions.iter().filter(|f| f.is_player() && !f.defeated)
    }

    // === BOOKKEEPING ===

    pub fn record(&mut self, event: TurnEvent) {
        let turn = self.turn;
        self.log.record(turn, event);
    }

    /// Remove fleets without ships. Returns the removed fleets.
    pub fn purge_empty_fleets(&mut self) -> Vec<Fleet> {
        let (empty, kept): (Vec<Fleet>, Vec<Fleet>) =
            std::mem::take(&mut self.fleets).into_iter().partition(|f| f.is_empty());
        self.fleets = kept;

        for fleet in &empty {
            self.record(TurnEvent::FleetDestroyed {
                fleet: fleet.id,
                owner: fleet.owner,
            });
        }
        empty
    }

    /// Mark factions with no fleets and no colonies as defeated.
    /// Crisis factions are resolved by the crisis machine instead.
    pub fn eliminate_factions(&mut self) -> Vec<FactionId> {
        let eliminated: Vec<FactionId> = self
            .factions
            .iter()
            .filter(|f| !f.defeated && !f.is_crisis())
            .filter(|f| self.fleets_of(f.id).next().is_none() && self.colonies_of(f.id).next().is_none())
            .map(|f| f.id)
            .collect();

        let turn = self.turn;
        for &id in &eliminated {
            if let Some(faction) = self.get_faction_mut(id) {
                faction.mark_defeated(turn);
            }
            self.record(TurnEvent::FactionEliminated { faction: id });
        }
        eliminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CrisisId;

    fn two_faction_state() -> (GameState, FactionId, FactionId, SystemId) {
        let mut state = GameState::new();
        let a = state.add_faction("Accord", FactionKind::Player);
        let b = state.add_faction("Hegemony", FactionKind::Ai);
        let sol = state.add_system("Sol", Position::new(0.0, 0.0));
        (state, a, b, sol)
    }

    #[test]
    fn test_ids_are_sequential() {
        let (mut state, a, b, sol) = two_faction_state();
        assert_eq!(a, FactionId(1));
        assert_eq!(b, FactionId(2));
        assert_eq!(sol, SystemId(1));

        let fleet = state.commission_fleet(a, sol, "First", &[ShipDesign::destroyer(), ShipDesign::corvette()], FleetStance::Neutral);
        let fleet = state.get_fleet(fleet).unwrap();
        assert_eq!(fleet.ships[0].id, ShipId(1));
        assert_eq!(fleet.ships[1].id, ShipId(2));
    }

    #[test]
    fn test_commissioning_reveals_location() {
        let (mut state, a, _, sol) = two_faction_state();
        state.commission_fleet(a, sol, "First", &[ShipDesign::destroyer()], FleetStance::Neutral);
        assert!(state.get_faction(a).unwrap().knows(sol));
    }

    #[test]
    fn test_factions_at_is_sorted_and_distinct() {
        let (mut state, a, b, sol) = two_faction_state();
        state.commission_fleet(b, sol, "B1", &[ShipDesign::destroyer()], FleetStance::Neutral);
        state.commission_fleet(a, sol, "A1", &[ShipDesign::destroyer()], FleetStance::Neutral);
        state.commission_fleet(b, sol, "B2", &[ShipDesign::destroyer()], FleetStance::Neutral);

        assert_eq!(state.factions_at(sol), vec![a, b]);
    }

    #[test]
    fn test_hostility() {
        let (mut state, a, b, _) = two_faction_state();
        assert!(!state.are_hostile(a, b));

        state.relations.set_war(a, b, true);
        assert!(state.are_hostile(a, b));

        let crisis = state.add_faction("Swarm", FactionKind::Crisis(CrisisId(0)));
        assert!(state.are_hostile(a, crisis));
        assert!(state.are_hostile(crisis, b));
        assert!(!state.are_hostile(crisis, crisis));
    }

    #[test]
    fn test_purge_and_eliminate() {
        let (mut state, a, b, sol) = two_faction_state();
        let doomed = state.commission_fleet(a, sol, "Doomed", &[ShipDesign::corvette()], FleetStance::Neutral);
        state.commission_fleet(b, sol, "Survivor", &[ShipDesign::corvette()], FleetStance::Neutral);
        state.get_fleet_mut(doomed).unwrap().ships.clear();

        let removed = state.purge_empty_fleets();
        assert_eq!(removed.len(), 1);
        assert_eq!(state.fleets.len(), 1);

        let eliminated = state.eliminate_factions();
        assert_eq!(eliminated, vec![a]);
        assert!(state.get_faction(a).unwrap().defeated);
        assert!(!state.get_faction(b).unwrap().defeated);
    }

    #[test]
    fn test_colony_keeps_faction_alive() {
        let (mut state, a, _b, sol) = two_faction_state();
        state.add_colony(sol, a, 5.0);
        assert_eq!(state.get_system(sol).unwrap().controller, Some(a));

        let eliminated = state.eliminate_factions();
        assert!(!eliminated.contains(&a));
    }

    #[test]
    fn test_connect_is_two_way() {
        let (mut state, _, _, sol) = two_faction_state();
        let vega = state.add_system("Vega", Position::new(3.0, 4.0));
        state.connect(sol, vega);
        state.connect(sol, vega);

        assert!(state.get_system(sol).unwrap().is_connected_to(vega));
        assert!(state.get_system(vega).unwrap().is_connected_to(sol));
        assert_eq!(state.get_system(sol).unwrap().hyperlanes.len(), 1);
    }
}
