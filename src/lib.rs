//! Stellar Dominion - per-turn simulation core
//!
//! Advances a multi-faction strategy game by one turn at a time: fleet
//! movement, combat in contested systems, crisis escalation and victory
//! evaluation, with economy, research, diplomacy and AI supplied by external
//! collaborators.

pub mod campaign;
pub mod combat;
pub mod core;
pub mod crisis;
pub mod galaxy;
pub mod turn;
