//! Prize definitions and weighted loot tables

use std::sync::Arc;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Physical stand-in for a prize prefab
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyTemplate {
    /// Half size of the prize's bounding box
    pub half_extents: Vec3,
    pub mass: f32,
}

impl Default for BodyTemplate {
    fn default() -> Self {
        Self {
            half_extents: Vec3::splat(0.15),
            mass: 1.0,
        }
    }
}

/// Immutable authored prize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeDefinition {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub credit_reward: u32,
    #[serde(default)]
    pub ticket_reward: u32,
    /// Prizes without a body cannot be spawned into a pit
    #[serde(default)]
    pub body: Option<BodyTemplate>,
}

/// One weighted row of a loot table
#[derive(Debug, Clone)]
pub struct LootEntry {
    pub prize: Arc<PrizeDefinition>,
    pub weight: f32,
}

impl LootEntry {
    /// Negative weights count as zero
    #[inline]
    pub fn effective_weight(&self) -> f32 {
        self.weight.max(0.0)
    }
}

/// Ordered weighted selection of prizes
#[derive(Debug, Clone, Default)]
pub struct LootTable {
    pub id: String,
    pub entries: Vec<LootEntry>,
}

impl LootTable {
    pub fn new(id: impl Into<String>, entries: Vec<LootEntry>) -> Self {
        Self {
            id: id.into(),
            entries,
        }
    }

    pub fn total_weight(&self) -> f32 {
        self.entries.iter().map(LootEntry::effective_weight).sum()
    }

    /// Chance that a single roll yields the given prize id
    pub fn probability_of(&self, prize_id: &str) -> f32 {
        let total = self.total_weight();
        if total <= 0.0 {
            return 0.0;
        }
        let weight: f32 = self
            .entries
            .iter()
            .filter(|e| e.prize.id == prize_id)
            .map(LootEntry::effective_weight)
            .sum();
        weight / total
    }

    /// Pick a prize with probability proportional to its weight
    ///
    /// Returns `None` for an empty table or when every weight is zero.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Arc<PrizeDefinition>> {
        let last = self.entries.last()?;
        let total = self.total_weight();
        if total <= 0.0 {
            return None;
        }

        let pick = rng.random::<f32>() * total;
        let mut cumulative = 0.0;
        for entry in &self.entries {
            cumulative += entry.effective_weight();
            if cumulative >= pick {
                return Some(&entry.prize);
            }
        }

        // Accumulated rounding can leave the pick just past the final sum
        Some(&last.prize)
    }
}
