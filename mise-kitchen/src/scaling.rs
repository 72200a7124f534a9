//! Recipe scaling

use mise_plugin::prelude::*;
use mise_plugin::helpers::{extract_number, extract_recipe, require_args};
use tracing::debug;
use crate::KitchenError;

/// Multipliers must be finite and above zero
pub fn validate_multiplier(multiplier: f64) -> Result<(), KitchenError> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(KitchenError::InvalidMultiplier(multiplier));
    }
    Ok(())
}

pub fn scale_quantity(quantity: Option<f64>, multiplier: f64) -> Option<f64> {
    quantity.map(|q| q * multiplier)
}

/// New recipe with every primary and parenthetical quantity multiplied
pub fn scale_recipe(recipe: &ParsedRecipe, multiplier: f64) -> Result<ParsedRecipe, KitchenError> {
    validate_multiplier(multiplier)?;

    let mut scaled = recipe.clone();
    for ingredient in scaled.sections.iter_mut().flat_map(|s| s.ingredients.iter_mut()) {
        ingredient.quantity = scale_quantity(ingredient.quantity, multiplier);
        ingredient.parenthetical_quantity = scale_quantity(ingredient.parenthetical_quantity, multiplier);
    }

    debug!(multiplier, ingredients = scaled.ingredient_count(), "scaled recipe");
    Ok(scaled)
}

// ============ scale_recipe ============

pub struct ScaleRecipe;

static SCALE_RECIPE_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("recipe", "Recipe", "Parsed recipe"),
    ArgMeta::required("multiplier", "Number", "Scale factor (> 0)"),
];

static SCALE_RECIPE_EXAMPLES: [&str; 2] = [
    "scale_recipe(recipe, 2) → recipe with doubled quantities",
    "scale_recipe(recipe, 0.5) → half batch",
];

static SCALE_RECIPE_RELATED: [&str; 2] = ["to_metric", "display_quantity"];

impl FunctionPlugin for ScaleRecipe {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "scale_recipe",
            description: "Multiply every quantity in a recipe",
            usage: "scale_recipe(recipe, multiplier)",
            args: &SCALE_RECIPE_ARGS,
            returns: "Recipe",
            examples: &SCALE_RECIPE_EXAMPLES,
            category: "kitchen",
            related: &SCALE_RECIPE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let Err(e) = require_args(args, 2, "scale_recipe") {
            return Value::Error(e);
        }

        let recipe = match extract_recipe(&args[0], "scale_recipe", "recipe") {
            Ok(r) => r,
            Err(e) => return Value::Error(e),
        };
        let multiplier = match extract_number(&args[1], "scale_recipe", "multiplier") {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };

        match scale_recipe(recipe, multiplier) {
            Ok(scaled) => Value::from(scaled),
            Err(e) => Value::Error(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mise_parse::parse_recipe_text;

    fn ctx() -> EvalContext {
        EvalContext::default()
    }

    #[test]
    fn test_scale_recipe_double() {
        let recipe = parse_recipe_text("2 cups flour\n1 1/2 tsp salt (7g)\nsalt to taste");
        let scaled = scale_recipe(&recipe, 2.0).unwrap();
        let quantities: Vec<Option<f64>> = scaled.ingredients().map(|i| i.quantity).collect();
        assert_eq!(quantities, vec![Some(4.0), Some(3.0), None]);
        assert_eq!(scaled.sections[0].ingredients[1].parenthetical_quantity, Some(14.0));
    }

    #[test]
    fn test_scale_leaves_input_untouched() {
        let recipe = parse_recipe_text("2 eggs");
        let _ = scale_recipe(&recipe, 3.0).unwrap();
        assert_eq!(recipe.sections[0].ingredients[0].quantity, Some(2.0));
    }

    #[test]
    fn test_scale_keeps_ids_and_text() {
        let recipe = parse_recipe_text("2 eggs");
        let scaled = scale_recipe(&recipe, 0.5).unwrap();
        assert_eq!(scaled.sections[0].ingredients[0].id, recipe.sections[0].ingredients[0].id);
        assert_eq!(scaled.sections[0].ingredients[0].original_text, "2 eggs");
    }

    #[test]
    fn test_invalid_multiplier() {
        let recipe = parse_recipe_text("2 eggs");
        for m in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(scale_recipe(&recipe, m), Err(KitchenError::InvalidMultiplier(_))));
        }
    }

    #[test]
    fn test_scale_plugin() {
        let recipe = Value::from(parse_recipe_text("1 cup milk"));
        let result = ScaleRecipe.call(&[recipe.clone(), Value::Number(3.0)], &ctx());
        assert_eq!(result.as_recipe().and_then(|r| r.ingredients().next()).and_then(|i| i.quantity), Some(3.0));

        let result = ScaleRecipe.call(&[recipe, Value::Number(0.0)], &ctx());
        match result {
            Value::Error(e) => assert_eq!(e.code, codes::DOMAIN_ERROR),
            other => panic!("expected error, got {:?}", other),
        }
    }
}
