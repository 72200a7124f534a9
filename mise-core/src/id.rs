//! Identifier generation
//!
//! Ids only need to be unique within one recipe. Each parse owns (or borrows)
//! a generator, so nothing is shared between independent parses.

use crate::ParsedRecipe;

/// Monotonic `prefix-n` id source
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    counter: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume numbering after the highest numeric suffix used in `recipe`
    pub fn starting_after(recipe: &ParsedRecipe) -> Self {
        let section_ids = recipe.sections.iter().map(|s| s.id.as_str());
        let ingredient_ids = recipe.ingredients().map(|i| i.id.as_str());
        let counter = section_ids
            .chain(ingredient_ids)
            .filter_map(numeric_suffix)
            .max()
            .unwrap_or(0);
        IdGenerator { counter }
    }

    pub fn next(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{}-{}", prefix, self.counter)
    }

    /// Last value handed out (0 if none)
    pub fn current(&self) -> u64 {
        self.counter
    }
}

fn numeric_suffix(id: &str) -> Option<u64> {
    id.rsplit('-').next()?.parse().ok()
}
