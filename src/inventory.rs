//! Owned prize collection
//!
//! Grows monotonically during play. Duplicate adds are a no-op that reports
//! "already owned".

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A named set of prizes the player can complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDef {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// How much of a collection is owned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionProgress {
    pub owned: usize,
    pub total: usize,
}

impl CollectionProgress {
    /// Empty collections are never complete
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.owned == self.total
    }
}

/// Set of prize ids the player has collected
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryLedger {
    owned: BTreeSet<String>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the id was newly added
    pub fn add(&mut self, prize_id: &str) -> bool {
        if self.owned.contains(prize_id) {
            return false;
        }
        self.owned.insert(prize_id.to_string())
    }

    pub fn has(&self, prize_id: &str) -> bool {
        self.owned.contains(prize_id)
    }

    /// Owned ids in sorted order
    pub fn owned(&self) -> impl Iterator<Item = &str> {
        self.owned.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.owned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }

    /// Count owned items of a collection (duplicate item ids count once)
    pub fn progress(&self, collection: &CollectionDef) -> CollectionProgress {
        let items: BTreeSet<&str> = collection.items.iter().map(String::as_str).collect();
        CollectionProgress {
            owned: items.iter().filter(|id| self.has(id)).count(),
            total: items.len(),
        }
    }
}
