//! Recipe data model
//!
//! A `ParsedRecipe` is the top-level unit of application state. It is treated
//! as an immutable value: transformations build a new recipe instead of
//! mutating the old one.

use serde::{Deserialize, Serialize};

/// One checklist line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedIngredient {
    pub id: String,
    /// Raw line as entered, kept for edit round-trips
    pub original_text: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    /// Unit table key (e.g. "tbsp"), never a free-form token
    #[serde(default)]
    pub unit: Option<String>,
    /// Free-text description ("flour", "eggs, beaten")
    pub ingredient: String,
    /// Inner text of the first parenthetical group, verbatim
    #[serde(default)]
    pub parenthetical: Option<String>,
    #[serde(default)]
    pub parenthetical_quantity: Option<f64>,
    #[serde(default)]
    pub parenthetical_unit: Option<String>,
    #[serde(default)]
    pub checked: bool,
    /// Quantity was written as a fraction ("1/2", "½")
    #[serde(default)]
    pub is_fractional: bool,
}

impl ParsedIngredient {
    /// Ingredient with no numeric structure: the whole text is the description
    pub fn plain(id: impl Into<String>, text: &str) -> Self {
        ParsedIngredient {
            id: id.into(),
            original_text: text.to_string(),
            quantity: None,
            unit: None,
            ingredient: text.trim().to_string(),
            parenthetical: None,
            parenthetical_quantity: None,
            parenthetical_unit: None,
            checked: false,
            is_fractional: false,
        }
    }

    pub fn has_quantity(&self) -> bool {
        self.quantity.is_some()
    }
}

/// Titled or untitled group of consecutive ingredient lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSection {
    pub id: String,
    /// Empty string means the untitled default section
    #[serde(default)]
    pub title: String,
    pub ingredients: Vec<ParsedIngredient>,
}

impl ParsedSection {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        ParsedSection {
            id: id.into(),
            title: title.into(),
            ingredients: Vec::new(),
        }
    }

    pub fn is_untitled(&self) -> bool {
        self.title.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}

/// Whole recipe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRecipe {
    pub sections: Vec<ParsedSection>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ParsedRecipe {
    /// All ingredients in display order
    pub fn ingredients(&self) -> impl Iterator<Item = &ParsedIngredient> {
        self.sections.iter().flat_map(|s| s.ingredients.iter())
    }

    pub fn ingredient_count(&self) -> usize {
        self.sections.iter().map(|s| s.ingredients.len()).sum()
    }

    pub fn find_ingredient(&self, id: &str) -> Option<&ParsedIngredient> {
        self.ingredients().find(|i| i.id == id)
    }

    pub fn find_section(&self, id: &str) -> Option<&ParsedSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.is_empty()) && self.instructions.is_empty()
    }

    /// Drop sections left without ingredients
    pub fn prune_empty_sections(&mut self) {
        self.sections.retain(|s| !s.is_empty());
    }
}

/// Standalone quantity + unit pair for the unit converter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionInput {
    pub quantity: f64,
    pub unit: String,
}

impl ConversionInput {
    pub fn new(quantity: f64, unit: impl Into<String>) -> Self {
        ConversionInput { quantity, unit: unit.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParsedRecipe {
        let mut dough = ParsedSection::new("sec-1", "For the dough");
        dough.ingredients.push(ParsedIngredient::plain("ing-1", "flour"));
        dough.ingredients.push(ParsedIngredient::plain("ing-2", "water"));
        let glaze = ParsedSection::new("sec-2", "Glaze");
        ParsedRecipe {
            sections: vec![dough, glaze],
            instructions: vec!["Mix".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_ingredient() {
        let ing = ParsedIngredient::plain("ing-9", "  salt to taste ");
        assert_eq!(ing.ingredient, "salt to taste");
        assert_eq!(ing.original_text, "  salt to taste ");
        assert!(!ing.has_quantity());
        assert!(!ing.checked);
    }

    #[test]
    fn test_find_ingredient() {
        let recipe = sample();
        assert_eq!(recipe.find_ingredient("ing-2").map(|i| i.ingredient.as_str()), Some("water"));
        assert!(recipe.find_ingredient("ing-7").is_none());
        assert_eq!(recipe.ingredient_count(), 2);
    }

    #[test]
    fn test_prune_empty_sections() {
        let mut recipe = sample();
        recipe.prune_empty_sections();
        assert_eq!(recipe.sections.len(), 1);
        assert_eq!(recipe.sections[0].title, "For the dough");
    }

    #[test]
    fn test_serde_camel_case() {
        let mut ing = ParsedIngredient::plain("ing-1", "1 egg");
        ing.parenthetical_quantity = Some(50.0);
        let json = serde_json::to_value(&ing).unwrap();
        assert!(json.get("originalText").is_some());
        assert_eq!(json["parentheticalQuantity"], 50.0);
        assert_eq!(json["isFractional"], false);
    }

    #[test]
    fn test_serde_round_trip() {
        let recipe = sample();
        let text = serde_json::to_string(&recipe).unwrap();
        let back: ParsedRecipe = serde_json::from_str(&text).unwrap();
        assert_eq!(back, recipe);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"id":"ing-1","originalText":"egg","ingredient":"egg"}"#;
        let ing: ParsedIngredient = serde_json::from_str(json).unwrap();
        assert_eq!(ing.quantity, None);
        assert!(!ing.checked);
    }
}
