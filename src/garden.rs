// 🌱 Garden - the user's current multiset of trees
//
// Each planted tree type has a count >= 1. A count never sits at zero: the
// entry is dropped the moment it would.

use crate::entities::Tree;
use std::collections::BTreeMap;
use std::sync::Arc;

// ============================================================================
// PLANTING
// ============================================================================

/// One tree type in the garden and how many of it are planted
#[derive(Debug, Clone, PartialEq)]
pub struct Planting {
    tree: Arc<Tree>,
    count: u32,
}

impl Planting {
    pub fn tree(&self) -> &Arc<Tree> {
        &self.tree
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// count × rate, using the rate captured when the tree was first planted
    pub fn absorption(&self) -> f64 {
        self.tree.absorption(self.count)
    }
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// What decrement() did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Count lowered, entry still present
    Decremented { remaining: u32 },

    /// Count reached zero, entry removed
    Removed,

    /// Name not in the garden; nothing changed
    Ignored,
}

impl Removal {
    pub fn applied(&self) -> bool {
        !matches!(self, Removal::Ignored)
    }
}

/// Aggregate view of the garden
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GardenStats {
    pub total_count: u64,

    /// Sum of count × rate (kg CO2 / year)
    pub total_rate: f64,

    /// name -> count, only for trees actually planted
    pub breakdown: BTreeMap<String, u32>,
}

// ============================================================================
// GARDEN
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Garden {
    plantings: BTreeMap<String, Planting>,
}

impl Garden {
    pub fn new() -> Self {
        Garden {
            plantings: BTreeMap::new(),
        }
    }

    /// Plant one more tree of this type; returns the new count
    ///
    /// If the name is already planted the existing entry keeps its Tree, so a
    /// later rate change in the catalog does not leak into it. Counts stop at
    /// u32::MAX.
    pub fn increment(&mut self, tree: &Arc<Tree>) -> u32 {
        let planting = self
            .plantings
            .entry(tree.name().to_string())
            .or_insert_with(|| Planting {
                tree: Arc::clone(tree),
                count: 0,
            });

        planting.count = planting.count.saturating_add(1);
        planting.count
    }

    /// Remove one tree of this type
    ///
    /// Any string is accepted; names not in the garden are ignored.
    pub fn decrement(&mut self, name: &str) -> Removal {
        let Some(planting) = self.plantings.get_mut(name) else {
            return Removal::Ignored;
        };

        if planting.count > 1 {
            planting.count -= 1;
            Removal::Decremented {
                remaining: planting.count,
            }
        } else {
            self.plantings.remove(name);
            Removal::Removed
        }
    }

    pub fn aggregate(&self) -> GardenStats {
        let mut stats = GardenStats::default();

        for (name, planting) in &self.plantings {
            stats.total_count += u64::from(planting.count);
            stats.total_rate += planting.absorption();
            stats.breakdown.insert(name.clone(), planting.count);
        }

        stats
    }

    /// (name, count × rate) per planted tree type, in display order
    pub fn absorption_by_tree(&self) -> Vec<(&str, f64)> {
        self.plantings
            .iter()
            .map(|(name, planting)| (name.as_str(), planting.absorption()))
            .collect()
    }

    /// Count for a name; 0 when not planted
    pub fn count(&self, name: &str) -> u32 {
        self.plantings.get(name).map_or(0, Planting::count)
    }

    pub fn plantings(&self) -> impl Iterator<Item = &Planting> {
        self.plantings.values()
    }

    /// Number of distinct tree types planted
    pub fn distinct(&self) -> usize {
        self.plantings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plantings.is_empty()
    }

    pub fn clear(&mut self) {
        self.plantings.clear();
    }
}

// ============================================================================
// TESTS
// ============================================================================
