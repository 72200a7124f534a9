//! Quantity display for checklist rows

use mise_plugin::prelude::*;
use mise_plugin::helpers::{extract_ingredient, extract_optional_bool, require_args};
use mise_units::{format_number, UNITS};

/// "1½ cup", "250 g", "3" or "" when there is no quantity
pub fn display_quantity(ingredient: &ParsedIngredient, use_fractions: bool) -> String {
    let quantity = match ingredient.quantity {
        Some(q) => q,
        None => return String::new(),
    };
    let number = format_number(quantity, use_fractions);
    match ingredient.unit.as_deref() {
        Some(key) => {
            let symbol = UNITS.get(key).map_or(key, |u| u.symbol);
            format!("{} {}", number, symbol)
        }
        None => number,
    }
}

// ============ display_quantity ============

pub struct DisplayQuantity;

static DISPLAY_QUANTITY_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("ingredient", "Ingredient", "Parsed ingredient"),
    ArgMeta::optional("use_fractions", "Bool", "Fraction glyphs (defaults to how the quantity was written)", "isFractional"),
];

static DISPLAY_QUANTITY_EXAMPLES: [&str; 2] = [
    "display_quantity(parse_ingredient(\"1 1/2 cups milk\")) → \"1½ cup\"",
    "display_quantity(parse_ingredient(\"1.5 l milk\")) → \"1.5 L\"",
];

static DISPLAY_QUANTITY_RELATED: [&str; 2] = ["format_number", "scale_recipe"];

impl FunctionPlugin for DisplayQuantity {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "display_quantity",
            description: "Render an ingredient's quantity and unit for display",
            usage: "display_quantity(ingredient, [use_fractions])",
            args: &DISPLAY_QUANTITY_ARGS,
            returns: "Text",
            examples: &DISPLAY_QUANTITY_EXAMPLES,
            category: "kitchen",
            related: &DISPLAY_QUANTITY_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let Err(e) = require_args(args, 1, "display_quantity") {
            return Value::Error(e);
        }
        let ingredient = match extract_ingredient(&args[0], "display_quantity", "ingredient") {
            Ok(i) => i,
            Err(e) => return Value::Error(e),
        };
        let use_fractions = extract_optional_bool(args, 1).unwrap_or(ingredient.is_fractional);
        Value::Text(display_quantity(ingredient, use_fractions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mise_parse::parse_ingredient_line;

    fn ing(line: &str) -> ParsedIngredient {
        parse_ingredient_line(line).unwrap()
    }

    #[test]
    fn test_display_with_unit() {
        assert_eq!(display_quantity(&ing("1 1/2 cups milk"), true), "1½ cup");
        assert_eq!(display_quantity(&ing("1.5 l milk"), false), "1.5 L");
        assert_eq!(display_quantity(&ing("4 fl oz cream"), false), "4 fl oz");
    }

    #[test]
    fn test_display_without_unit_or_quantity() {
        assert_eq!(display_quantity(&ing("3 eggs"), true), "3");
        assert_eq!(display_quantity(&ing("salt to taste"), true), "");
    }

    #[test]
    fn test_plugin_defaults_to_written_form() {
        let ctx = EvalContext::default();
        let fractional = Value::from(ing("1/3 cup oil"));
        assert_eq!(DisplayQuantity.call(&[fractional.clone()], &ctx).as_text(), Some("⅓ cup"));
        assert_eq!(DisplayQuantity.call(&[fractional, Value::Bool(false)], &ctx).as_text(), Some("0.33 cup"));

        let decimal = Value::from(ing("0.5 cup oil"));
        assert_eq!(DisplayQuantity.call(&[decimal], &ctx).as_text(), Some("0.5 cup"));
    }
}
