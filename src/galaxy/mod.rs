//! Galaxy data model
//!
//! Factions, fleets, ships, systems and relations, plus the `GameState`
//! working set that one turn operates on.

pub mod changes;
pub mod diplomacy;
pub mod events;
pub mod faction;
pub mod fleet;
pub mod system;
pub mod world;

pub use changes::{Rejected, StateChange};
pub use diplomacy::{DiplomaticRelation, Relations};
pub use events::{EventLog, LoggedEvent, TurnEvent};
pub use faction::{Faction, FactionKind, ResourceLedger};
pub use fleet::{ExperienceLevel, Fleet, FleetStance, Ship, ShipDesign};
pub use system::{Colony, StarSystem};
pub use world::GameState;
