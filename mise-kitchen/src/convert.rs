//! Per-ingredient and whole-recipe unit conversion

use mise_plugin::prelude::*;
use mise_plugin::helpers::{extract_ingredient, extract_recipe, extract_text, require_args};
use mise_units::{find_unit, simplify, try_convert, Category, System, UNITS};
use tracing::debug;
use crate::KitchenError;

/// Convert an ingredient's quantity into `to_unit` (any spelling)
pub fn convert_ingredient(ingredient: &ParsedIngredient, to_unit: &str) -> Result<ParsedIngredient, KitchenError> {
    let quantity = ingredient.quantity
        .ok_or_else(|| KitchenError::NoQuantity(ingredient.id.clone()))?;
    let from = ingredient.unit.as_deref()
        .ok_or_else(|| KitchenError::NoUnit(ingredient.id.clone()))?;
    let target = find_unit(to_unit)
        .and_then(|key| UNITS.get(key))
        .ok_or_else(|| KitchenError::UnknownUnit(to_unit.to_string()))?;

    let converted = try_convert(quantity, from, target.key)?;

    let mut result = ingredient.clone();
    result.quantity = Some(converted);
    result.unit = Some(target.key.to_string());
    result.is_fractional = target.system != System::Metric;
    Ok(result)
}

/// Convert every volume and weight quantity to the readable unit of `system`.
///
/// Count units, pinch/dash and unit-less lines are left as they are.
pub fn to_measurement_system(recipe: &ParsedRecipe, system: System) -> ParsedRecipe {
    let mut converted = recipe.clone();
    let mut changed = 0usize;

    for ingredient in converted.sections.iter_mut().flat_map(|s| s.ingredients.iter_mut()) {
        if let Some((quantity, unit)) = retarget(ingredient.quantity, ingredient.unit.as_deref(), system) {
            ingredient.quantity = Some(quantity);
            ingredient.unit = Some(unit.to_string());
            ingredient.is_fractional = system == System::Imperial;
            changed += 1;
        }
        if let Some((quantity, unit)) = retarget(
            ingredient.parenthetical_quantity,
            ingredient.parenthetical_unit.as_deref(),
            system,
        ) {
            ingredient.parenthetical_quantity = Some(quantity);
            ingredient.parenthetical_unit = Some(unit.to_string());
        }
    }

    debug!(system = %system, changed, "converted recipe");
    converted
}

/// New quantity and unit when this amount needs converting into `system`
fn retarget(quantity: Option<f64>, unit: Option<&str>, system: System) -> Option<(f64, &'static str)> {
    let quantity = quantity?;
    let unit = UNITS.get(unit?)?;
    if unit.category == Category::Count || unit.system == System::Neutral || unit.system == system {
        return None;
    }
    simplify(quantity, unit.key, system).map(|(key, value)| (value, key))
}

// ============ convert_ingredient ============

pub struct ConvertIngredient;

static CONVERT_INGREDIENT_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("ingredient", "Ingredient", "Parsed ingredient with quantity and unit"),
    ArgMeta::required("to_unit", "Text", "Target unit"),
];

static CONVERT_INGREDIENT_EXAMPLES: [&str; 1] = [
    "convert_ingredient(parse_ingredient(\"2 cups milk\"), \"ml\") → {quantity: 473.176, unit: \"ml\"}",
];

static CONVERT_INGREDIENT_RELATED: [&str; 2] = ["convert", "to_metric"];

impl FunctionPlugin for ConvertIngredient {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert_ingredient",
            description: "Convert one ingredient's quantity into another unit",
            usage: "convert_ingredient(ingredient, to_unit)",
            args: &CONVERT_INGREDIENT_ARGS,
            returns: "Ingredient",
            examples: &CONVERT_INGREDIENT_EXAMPLES,
            category: "kitchen",
            related: &CONVERT_INGREDIENT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let Err(e) = require_args(args, 2, "convert_ingredient") {
            return Value::Error(e);
        }

        let ingredient = match extract_ingredient(&args[0], "convert_ingredient", "ingredient") {
            Ok(i) => i,
            Err(e) => return Value::Error(e),
        };
        let to_unit = match extract_text(&args[1], "convert_ingredient", "to_unit") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        match convert_ingredient(ingredient, to_unit) {
            Ok(converted) => Value::from(converted),
            Err(e) => Value::Error(e.into()),
        }
    }
}

// ============ to_metric / to_imperial ============

/// Whole-recipe conversion into a fixed system
pub struct ToSystem {
    system: System,
}

pub const TO_METRIC: ToSystem = ToSystem { system: System::Metric };
pub const TO_IMPERIAL: ToSystem = ToSystem { system: System::Imperial };

static TO_SYSTEM_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("recipe", "Recipe", "Parsed recipe"),
];

static TO_METRIC_EXAMPLES: [&str; 1] = ["to_metric(recipe) → cups become ml, pounds become g"];
static TO_IMPERIAL_EXAMPLES: [&str; 1] = ["to_imperial(recipe) → ml become tbsp or cups, g become oz or lb"];

static TO_METRIC_RELATED: [&str; 2] = ["to_imperial", "convert_ingredient"];
static TO_IMPERIAL_RELATED: [&str; 2] = ["to_metric", "convert_ingredient"];

impl FunctionPlugin for ToSystem {
    fn meta(&self) -> FunctionMeta {
        match self.system {
            System::Imperial => FunctionMeta {
                name: "to_imperial",
                description: "Convert every volume and weight quantity to US customary units",
                usage: "to_imperial(recipe)",
                args: &TO_SYSTEM_ARGS,
                returns: "Recipe",
                examples: &TO_IMPERIAL_EXAMPLES,
                category: "kitchen",
                related: &TO_IMPERIAL_RELATED,
            },
            _ => FunctionMeta {
                name: "to_metric",
                description: "Convert every volume and weight quantity to metric units",
                usage: "to_metric(recipe)",
                args: &TO_SYSTEM_ARGS,
                returns: "Recipe",
                examples: &TO_METRIC_EXAMPLES,
                category: "kitchen",
                related: &TO_METRIC_RELATED,
            },
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let name = self.meta().name;
        if let Err(e) = require_args(args, 1, name) {
            return Value::Error(e);
        }
        match extract_recipe(&args[0], name, "recipe") {
            Ok(recipe) => Value::from(to_measurement_system(recipe, self.system)),
            Err(e) => Value::Error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mise_parse::{parse_ingredient_line, parse_recipe_text};

    fn ing(line: &str) -> ParsedIngredient {
        parse_ingredient_line(line).unwrap()
    }

    #[test]
    fn test_convert_ingredient() {
        let milk = ing("2 cups milk");
        let converted = convert_ingredient(&milk, "milliliters").unwrap();
        assert_eq!(converted.unit.as_deref(), Some("ml"));
        assert!((converted.quantity.unwrap() - 473.176).abs() < 1e-9);
        assert_eq!(converted.id, milk.id);
        assert_eq!(converted.ingredient, "milk");
        assert!(!converted.is_fractional);
    }

    #[test]
    fn test_convert_ingredient_to_imperial_sets_fractional() {
        let converted = convert_ingredient(&ing("500 g flour"), "lb").unwrap();
        assert!(converted.is_fractional);
    }

    #[test]
    fn test_convert_ingredient_errors() {
        assert_eq!(convert_ingredient(&ing("salt"), "g").unwrap_err(),
            KitchenError::NoQuantity(ing("salt").id));
        assert!(matches!(convert_ingredient(&ing("3 eggs"), "g"), Err(KitchenError::NoUnit(_))));
        assert!(matches!(convert_ingredient(&ing("1 cup milk"), "smidgen"), Err(KitchenError::UnknownUnit(_))));
        assert!(matches!(convert_ingredient(&ing("1 dozen eggs"), "g"), Err(KitchenError::Incompatible { .. })));
    }

    #[test]
    fn test_to_metric() {
        let recipe = parse_recipe_text("2 cups milk\n1 lb beef\n1 dozen eggs\npinch salt\n1 pinch pepper\n3 carrots\n250 g butter");
        let metric = to_measurement_system(&recipe, System::Metric);
        let units: Vec<Option<&str>> = metric.ingredients().map(|i| i.unit.as_deref()).collect();
        assert_eq!(units, vec![Some("ml"), Some("g"), Some("dozen"), None, Some("pinch"), None, Some("g")]);

        let beef = metric.ingredients().nth(1).unwrap();
        assert!((beef.quantity.unwrap() - 453.592).abs() < 1e-9);
        assert_eq!(metric.ingredients().last().unwrap().quantity, Some(250.0));
    }

    #[test]
    fn test_to_imperial() {
        let recipe = parse_recipe_text("500 ml stock\n10 ml oil\n100 g cheese (1 cup)");
        let imperial = to_measurement_system(&recipe, System::Imperial);
        let units: Vec<Option<&str>> = imperial.ingredients().map(|i| i.unit.as_deref()).collect();
        assert_eq!(units, vec![Some("cup"), Some("tbsp"), Some("oz")]);
        assert!(imperial.ingredients().all(|i| i.is_fractional));
        // Parenthetical already imperial
        assert_eq!(imperial.ingredients().last().unwrap().parenthetical_unit.as_deref(), Some("cup"));
    }

    #[test]
    fn test_round_trip_system_conversion_is_close() {
        let recipe = parse_recipe_text("3 cups flour");
        let back = to_measurement_system(&to_measurement_system(&recipe, System::Metric), System::Imperial);
        let flour = back.ingredients().next().unwrap();
        assert_eq!(flour.unit.as_deref(), Some("cup"));
        assert!((flour.quantity.unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_plugins() {
        let ctx = EvalContext::default();
        let recipe = Value::from(parse_recipe_text("1 cup milk"));
        let metric = TO_METRIC.call(&[recipe], &ctx);
        let unit = metric.as_recipe().and_then(|r| r.ingredients().next()).and_then(|i| i.unit.clone());
        assert_eq!(unit.as_deref(), Some("ml"));

        assert_eq!(TO_IMPERIAL.meta().name, "to_imperial");

        let result = ConvertIngredient.call(&[Value::from(ing("3 eggs")), Value::Text("g".into())], &ctx);
        assert!(result.is_error());
    }
}
