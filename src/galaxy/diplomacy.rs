//! Diplomatic relations between factions
//!
//! The core only reads relations to decide hostility; the diplomacy
//! collaborator changes them through `StateChange`s.

use serde::{Deserialize, Serialize};

use crate::core::types::FactionId;

/// Relation from `faction` toward `other`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiplomaticRelation {
    pub faction: FactionId,
    pub other: FactionId,
    pub at_war: bool,
    pub allied: bool,
    pub war_score: i32,
}

impl DiplomaticRelation {
    pub fn new(faction: FactionId, other: FactionId) -> Self {
        Self {
            faction,
            other,
            at_war: false,
            allied: false,
            war_score: 0,
        }
    }
}

/// All relations in a session. War and alliance are kept symmetric.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relations {
    entries: Vec<DiplomaticRelation>,
}

impl Relations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, faction: FactionId, other: FactionId) -> Option<&DiplomaticRelation> {
        self.entries
            .iter()
            .find(|r| r.faction == faction && r.other == other)
    }

    fn entry_mut(&mut self, faction: FactionId, other: FactionId) -> &mut DiplomaticRelation {
        let idx = match self
            .entries
            .iter()
            .position(|r| r.faction == faction && r.other == other)
        {
            Some(idx) => idx,
            None => {
                self.entries.push(DiplomaticRelation::new(faction, other));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx]
    }

    pub fn at_war(&self, a: FactionId, b: FactionId) -> bool {
        self.get(a, b).map(|r| r.at_war).unwrap_or(false)
            || self.get(b, a).map(|r| r.at_war).unwrap_or(false)
    }

    pub fn allied(&self, a: FactionId, b: FactionId) -> bool {
        self.get(a, b).map(|r| r.allied).unwrap_or(false)
            && self.get(b, a).map(|r| r.allied).unwrap_or(false)
    }

    /// Declare or end war. Declaring war breaks any alliance.
    pub fn set_war(&mut self, a: FactionId, b: FactionId, at_war: bool) {
        for (x, y) in [(a, b), (b, a)] {
            let rel = self.entry_mut(x, y);
            rel.at_war = at_war;
            if at_war {
                rel.allied = false;
            } else {
                rel.war_score = 0;
            }
        }
    }

    pub fn set_alliance(&mut self, a: FactionId, b: FactionId, allied: bool) {
        for (x, y) in [(a, b), (b, a)] {
            let rel = self.entry_mut(x, y);
            rel.allied = allied;
            if allied {
                rel.at_war = false;
            }
        }
    }

    pub fn adjust_war_score(&mut self, faction: FactionId, other: FactionId, delta: i32) {
        let rel = self.entry_mut(faction, other);
        rel.war_score = rel.war_score.saturating_add(delta);
    }

    /// Number of factions `faction` is at war with
    pub fn war_count(&self, faction: FactionId) -> usize {
        self.entries
            .iter()
            .filter(|r| r.faction == faction && r.at_war)
            .count()
    }

    pub fn ally_count(&self, faction: FactionId) -> usize {
        self.entries
            .iter()
            .filter(|r| r.faction == faction && self.allied(r.faction, r.other))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiplomaticRelation> {
        self.entries.iter()
    }
}
