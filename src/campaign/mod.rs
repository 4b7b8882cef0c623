//! Strategic layer: fleet movement across the galaxy map

pub mod movement;

pub use movement::{advance, move_fleets, Arrival, MovementOutcome, ARRIVAL_PROGRESS};
