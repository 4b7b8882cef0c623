//! Combat resolution
//!
//! Fleets meeting in a contested system are snapshotted, fought round by
//! round, and the results are written back onto the persisted fleets.

pub mod encounter;
pub mod modifiers;
pub mod report;
pub mod resolution;
pub mod snapshot;

pub use encounter::{
    contested_systems, hostile_pairs, order_sides, representative, resolve_contested_systems,
    resolve_encounter, should_engage,
};
pub use modifiers::{experience_multiplier, StanceModifiers};
pub use report::{CombatSummary, RoundReport, SideSummary, VolleyReport};
pub use resolution::{
    apply_damage, decide_winner, fire_volley, hit_chance, resolve_shot, run_engagement, should_retreat,
    DamageReport, EngagementResult, ShotResult,
};
pub use snapshot::{CombatShip, CombatSide, Side};
