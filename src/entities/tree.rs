// 🌳 Tree Entity - a named tree type with a fixed CO2 absorption rate
//
// "A tree type is a VALUE: once created it never changes"
//
// Problem solved:
// - Re-registering "Oak" with a new rate must not rewrite plantings already in
//   the garden, so each planting holds the exact Tree it was created from
// - Trees are shared between catalog and garden via Arc, never copied

use std::fmt;
use std::sync::Arc;

// ============================================================================
// TREE ENTITY
// ============================================================================

/// Tree Entity - immutable once created
///
/// Identity: name (unique key in the catalog)
/// Value: absorption rate in kg of CO2 per year, per tree
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    name: String,
    rate: f64,
}

impl Tree {
    /// Create a new tree type
    ///
    /// The rate is not validated here; the catalog checks it on registration.
    pub fn new(name: impl Into<String>, rate: f64) -> Self {
        Tree {
            name: name.into(),
            rate,
        }
    }

    /// Create a tree type already wrapped for sharing
    pub fn shared(name: impl Into<String>, rate: f64) -> Arc<Tree> {
        Arc::new(Self::new(name, rate))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absorption rate (kg CO2 / year)
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Total absorption of `count` trees of this type
    pub fn absorption(&self, count: u32) -> f64 {
        f64::from(count) * self.rate
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1} kg/year)", self.name, self.rate)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_accessors() {
        let oak = Tree::new("Oak", 22.0);
        assert_eq!(oak.name(), "Oak");
        assert_eq!(oak.rate(), 22.0);
    }

    #[test]
    fn test_absorption_scales_with_count() {
        let ash = Tree::new("Ash", 20.5);
        assert_eq!(ash.absorption(0), 0.0);
        assert_eq!(ash.absorption(2), 41.0);
    }

    #[test]
    fn test_display() {
        let elm = Tree::new("Elm", 18.5);
        assert_eq!(elm.to_string(), "Elm (18.5 kg/year)");
    }
}
