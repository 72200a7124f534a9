//! Mise Parse - Recipe Text Parsing
//!
//! Turns pasted recipe text into a `ParsedRecipe`:
//! - line sanitizing (markup, links, checkboxes, bullets)
//! - ingredient lines (quantities, units, parentheticals, combined quantities)
//! - section and instruction headers
//! - instruction steps
//! - single measurements for the standalone converter
//!
//! Parsers never fail on non-empty input.

mod sanitize;
mod quantity;
mod ingredient;
mod recipe;
mod instructions;
mod measurement;
mod functions;

pub use sanitize::{sanitize_line, collapse_whitespace};
pub use quantity::{leading_quantity, leading_unit, LeadingQuantity};
pub use ingredient::{parse_ingredient_line, parse_ingredient_line_with};
pub use recipe::{parse_recipe_text, classify, RecipeParser, HeaderRule, LineKind, Mode, HEADER_RULES};
pub use instructions::parse_instructions;
pub use measurement::{parse_single_measurement, is_single_measurement};

use mise_plugin::PluginRegistry;

/// Load parse functions into registry
pub fn load_parse_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        .with_function(functions::ParseRecipe)
        .with_function(functions::ParseIngredient)
        .with_function(functions::ParseInstructions)
        .with_function(functions::ParseMeasurement)
        .with_function(functions::IsMeasurement)
        .with_function(functions::SanitizeLine)
}
