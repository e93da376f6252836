//! # Recipe Books
//!
//! A recipe book is a TOML document describing items, recipes and held
//! predicates in bulk:
//!
//! ```toml
//! items = ["Ore", "Ingot", "Blade"]
//! inventory = ["furnace"]
//!
//! [[recipes]]
//! from = "Ore"
//! to = "Ingot"
//! weight = 3
//! condition = "furnace"
//!
//! [[recipes]]
//! from = "Ingot"
//! to = "Blade"
//! weight = 2
//! ```
//!
//! Applying a book is all-or-nothing. Items are added first, then recipes in
//! document order (which becomes their edge-table order), then predicates.
//! Recipes may refer to items that already exist in the session. Conditions
//! are parsed strictly: an expression with an empty atom rejects the book.

use crate::condition::Condition;
use crate::session::Session;
use crate::{EdgeWeight, SynthError};
use serde::Deserialize;

/// One recipe entry of a book.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeEntry {
    pub from: String,
    pub to: String,
    pub weight: u64,
    #[serde(default)]
    pub condition: String,
}

/// A parsed recipe book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeBook {
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub recipes: Vec<RecipeEntry>,
    #[serde(default)]
    pub inventory: Vec<String>,
}

/// Counts of what a book added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookSummary {
    pub items: usize,
    pub recipes: usize,
    pub predicates: usize,
}

impl RecipeBook {
    /// Parse a book from TOML text.
    ///
    /// Negative weights and unknown keys are rejected here.
    pub fn from_toml(text: &str) -> Result<Self, SynthError> {
        toml::from_str(text).map_err(|e| SynthError::SerializationError(e.to_string()))
    }

    /// Apply the book to `session`.
    ///
    /// On error the session is left exactly as it was.
    pub fn apply(&self, session: &mut Session) -> Result<BookSummary, SynthError> {
        let mut staged = session.clone();

        for item in &self.items {
            staged.add_node(item)?;
        }
        for recipe in &self.recipes {
            let condition = Condition::parse_strict(&recipe.condition)?;
            staged.graph_mut().add_parsed_edge(
                &recipe.from,
                &recipe.to,
                EdgeWeight::new(recipe.weight),
                condition,
            )?;
        }
        for name in &self.inventory {
            staged.add_condition(name)?;
        }

        *session = staged;
        Ok(BookSummary {
            items: self.items.len(),
            recipes: self.recipes.len(),
            predicates: self.inventory.len(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const FORGE: &str = r#"
items = ["Ore", "Ingot", "Blade"]
inventory = ["furnace"]

[[recipes]]
from = "Ore"
to = "Ingot"
weight = 3
condition = "furnace"

[[recipes]]
from = "Ingot"
to = "Blade"
weight = 2
"#;

    #[test]
    fn parses_and_applies() {
        let book = RecipeBook::from_toml(FORGE).expect("parse");
        let mut session = Session::new();

        let summary = book.apply(&mut session).expect("apply");

        assert_eq!(
            summary,
            BookSummary {
                items: 3,
                recipes: 2,
                predicates: 1
            }
        );
        assert_eq!(session.synthesize("Ore", "Blade").expect("run").cost(), Some(5));
    }

    #[test]
    fn recipes_may_use_existing_items() {
        let mut session = Session::new();
        session.add_node("Wood").expect("add");
        let book = RecipeBook::from_toml(
            "items = [\"Plank\"]\n[[recipes]]\nfrom = \"Wood\"\nto = \"Plank\"\nweight = 1\n",
        )
        .expect("parse");

        book.apply(&mut session).expect("apply");

        assert_eq!(session.graph().edge_count(), 1);
    }

    #[test]
    fn failure_leaves_session_untouched() {
        let mut session = Session::new();
        session.add_node("Ingot").expect("add");
        let book = RecipeBook::from_toml(FORGE).expect("parse");

        assert_eq!(
            book.apply(&mut session),
            Err(SynthError::DuplicateNode("Ingot".into()))
        );
        assert_eq!(session.graph().node_count(), 1);
        assert!(session.inventory().is_empty());
    }

    #[test]
    fn malformed_condition_rejects_book() {
        let book = RecipeBook::from_toml(
            "items = [\"A\", \"B\"]\n[[recipes]]\nfrom = \"A\"\nto = \"B\"\nweight = 1\ncondition = \"a&&b\"\n",
        )
        .expect("parse");
        let mut session = Session::new();

        assert_eq!(
            book.apply(&mut session),
            Err(SynthError::MalformedCondition("a&&b".into()))
        );
        assert!(session.graph().is_empty());
    }

    #[test]
    fn negative_weight_rejected_at_parse() {
        let result = RecipeBook::from_toml(
            "[[recipes]]\nfrom = \"A\"\nto = \"B\"\nweight = -1\n",
        );
        assert!(matches!(result, Err(SynthError::SerializationError(_))));
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(RecipeBook::from_toml("itemz = []\n").is_err());
    }
}
