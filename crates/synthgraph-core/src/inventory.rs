//! # Predicate Inventory
//!
//! The set of predicate names currently held. Conditions on recipes are
//! evaluated against a snapshot of this set taken when a synthesis starts.

use crate::SynthError;
use crate::primitives::{MAX_INVENTORY, is_valid_predicate};
use std::collections::BTreeSet;

/// Held predicates, kept sorted for deterministic listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    held: BTreeSet<String>,
}

impl Inventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate.
    ///
    /// Rejects names that are not valid predicates (see
    /// `primitives::is_valid_predicate`), names already held, and insertions
    /// past `MAX_INVENTORY`.
    pub fn insert(&mut self, name: &str) -> Result<(), SynthError> {
        if !is_valid_predicate(name) {
            return Err(SynthError::InvalidLabel(name.to_string()));
        }
        if self.held.contains(name) {
            return Err(SynthError::DuplicatePredicate(name.to_string()));
        }
        if self.held.len() >= MAX_INVENTORY {
            return Err(SynthError::CapacityExceeded {
                what: "inventory entries",
                limit: MAX_INVENTORY,
            });
        }
        self.held.insert(name.to_string());
        Ok(())
    }

    /// Remove a held predicate.
    pub fn remove(&mut self, name: &str) -> Result<(), SynthError> {
        if self.held.remove(name) {
            Ok(())
        } else {
            Err(SynthError::PredicateNotFound(name.to_string()))
        }
    }

    /// Exact, case-sensitive membership test.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.held.contains(name)
    }

    /// Held predicates in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.held.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.held.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

impl Inventory {
    /// First held name that `insert` would refuse. Only reachable through
    /// `FromIterator`, which does not validate.
    pub(crate) fn first_invalid(&self) -> Option<&str> {
        self.iter().find(|name| !is_valid_predicate(name))
    }
}

impl<S: Into<String>> FromIterator<S> for Inventory {
    /// Build an inventory without validation; intended for fixtures and
    /// tests. Use `insert` for untrusted input. Snapshots refuse to save an
    /// inventory holding names `insert` would reject.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_contains() {
        let mut inventory = Inventory::new();
        inventory.insert("fire").expect("insert");

        assert!(inventory.contains("fire"));
        assert!(!inventory.contains("Fire"));
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn duplicate_insert_rejected() {
        let mut inventory = Inventory::new();
        inventory.insert("fire").expect("insert");

        assert_eq!(
            inventory.insert("fire"),
            Err(SynthError::DuplicatePredicate("fire".into()))
        );
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn invalid_names_rejected() {
        let mut inventory = Inventory::new();
        assert!(matches!(
            inventory.insert(""),
            Err(SynthError::InvalidLabel(_))
        ));
        assert!(matches!(
            inventory.insert("a b"),
            Err(SynthError::InvalidLabel(_))
        ));
        assert!(inventory.is_empty());
    }

    #[test]
    fn operator_names_rejected() {
        let mut inventory = Inventory::new();
        for name in ["a|b", "a&b", "|", "&"] {
            assert_eq!(
                inventory.insert(name),
                Err(SynthError::InvalidLabel(name.into()))
            );
        }
        assert!(inventory.is_empty());
    }

    #[test]
    fn capacity_enforced() {
        let mut inventory = Inventory::new();
        for index in 0..MAX_INVENTORY {
            inventory.insert(&format!("p{index}")).expect("insert");
        }

        assert_eq!(
            inventory.insert("overflow"),
            Err(SynthError::CapacityExceeded {
                what: "inventory entries",
                limit: MAX_INVENTORY
            })
        );
        assert_eq!(inventory.len(), MAX_INVENTORY);
        assert!(!inventory.contains("overflow"));

        inventory.remove("p0").expect("remove");
        inventory.insert("overflow").expect("room again");
    }

    #[test]
    fn unvalidated_names_detected() {
        let checked: Inventory = ["fire", "water"].into_iter().collect();
        assert_eq!(checked.first_invalid(), None);

        let unchecked: Inventory = ["fire", "two words"].into_iter().collect();
        assert_eq!(unchecked.first_invalid(), Some("two words"));
    }

    #[test]
    fn remove_missing_fails() {
        let mut inventory = Inventory::new();
        assert_eq!(
            inventory.remove("key"),
            Err(SynthError::PredicateNotFound("key".into()))
        );

        inventory.insert("key").expect("insert");
        inventory.remove("key").expect("remove");
        assert!(!inventory.contains("key"));
    }

    #[test]
    fn iteration_is_sorted() {
        let inventory: Inventory = ["water", "air", "fire"].into_iter().collect();
        let names: Vec<_> = inventory.iter().collect();
        assert_eq!(names, vec!["air", "fire", "water"]);
    }
}
