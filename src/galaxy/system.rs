//! Star systems and colonies

use serde::{Deserialize, Serialize};

use crate::core::types::{FactionId, Position, SystemId};

/// A star system on the galaxy map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarSystem {
    pub id: SystemId,
    pub name: String,
    pub position: Position,
    pub controller: Option<FactionId>,
    /// Industrial output rating (0 = none)
    pub industry: u32,
    /// Directly connected systems
    pub hyperlanes: Vec<SystemId>,
}

impl StarSystem {
    pub fn new(id: SystemId, name: String, position: Position) -> Self {
        Self {
            id,
            name,
            position,
            controller: None,
            industry: 0,
            hyperlanes: Vec::new(),
        }
    }

    pub fn is_connected_to(&self, other: SystemId) -> bool {
        self.hyperlanes.contains(&other)
    }
}

/// A settled colony
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colony {
    pub system: SystemId,
    pub owner: FactionId,
    pub population: f64,
}
