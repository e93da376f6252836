//! # Condition Evaluator
//!
//! Recipe conditions are a fixed two-level boolean form: a disjunction of
//! conjunctions of predicate names.
//!
//! ```text
//! Expr   := Clause ('|' Clause)*
//! Clause := Atom ('&' Atom)*
//! Atom   := predicate-name   (surrounding whitespace trimmed)
//! ```
//!
//! An empty or whitespace-only expression is always satisfied. Otherwise the
//! expression holds iff at least one clause has every atom in the inventory.
//!
//! ## Empty atoms
//!
//! Stray delimiters (`a&&b`, `a|`, `|a`) produce empty atoms. An empty atom
//! makes its own clause fail; the remaining clauses are still evaluated, so
//! `"a|"` holds whenever `a` is held. `Condition::parse_strict` rejects such
//! input instead.

use crate::SynthError;
use crate::inventory::Inventory;
use std::fmt;

/// One conjunction of predicate names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    atoms: Vec<String>,
}

impl Clause {
    fn parse(text: &str) -> Self {
        Self {
            atoms: text.split('&').map(|atom| atom.trim().to_string()).collect(),
        }
    }

    /// Atoms in source order. May contain empty strings for malformed input.
    #[must_use]
    pub fn atoms(&self) -> &[String] {
        &self.atoms
    }

    fn is_well_formed(&self) -> bool {
        self.atoms.iter().all(|atom| !atom.is_empty())
    }

    fn satisfied_by(&self, inventory: &Inventory) -> bool {
        self.atoms
            .iter()
            .all(|atom| !atom.is_empty() && inventory.contains(atom))
    }
}

/// A parsed recipe condition.
///
/// Parsed once when the recipe is created; evaluation never re-splits the
/// source text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Condition {
    source: String,
    clauses: Vec<Clause>,
}

impl Condition {
    /// The condition that always holds.
    #[must_use]
    pub fn always() -> Self {
        Self::default()
    }

    /// Parse leniently. Never fails; see the module docs for how empty atoms
    /// are treated.
    #[must_use]
    pub fn parse(expr: &str) -> Self {
        let source = expr.trim();
        if source.is_empty() {
            return Self::always();
        }
        Self {
            source: source.to_string(),
            clauses: source.split('|').map(Clause::parse).collect(),
        }
    }

    /// Parse, rejecting any expression that contains an empty atom.
    pub fn parse_strict(expr: &str) -> Result<Self, SynthError> {
        let condition = Self::parse(expr);
        if condition.is_well_formed() {
            Ok(condition)
        } else {
            Err(SynthError::MalformedCondition(expr.to_string()))
        }
    }

    /// True for the empty condition.
    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        self.clauses.is_empty()
    }

    /// True when no clause contains an empty atom.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.clauses.iter().all(Clause::is_well_formed)
    }

    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Trimmed source text; empty for the unconditional case.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Evaluate against a held inventory.
    #[must_use]
    pub fn satisfied_by(&self, inventory: &Inventory) -> bool {
        self.is_unconditional() || self.clauses.iter().any(|c| c.satisfied_by(inventory))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Evaluate a raw condition expression against an inventory.
///
/// Stateless: the same arguments always give the same answer.
#[must_use]
pub fn satisfied(expr: &str, inventory: &Inventory) -> bool {
    Condition::parse(expr).satisfied_by(inventory)
}

// =============================================================================
// TESTS
// =============================================================================
