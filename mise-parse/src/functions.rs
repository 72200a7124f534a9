//! Parse plugin functions

use std::collections::HashMap;
use mise_plugin::prelude::*;
use mise_plugin::helpers::{extract_text, require_args};
use crate::ingredient::parse_ingredient_line;
use crate::instructions::parse_instructions;
use crate::measurement::{is_single_measurement, parse_single_measurement};
use crate::recipe::parse_recipe_text;
use crate::sanitize::sanitize_line;

/// Shared prologue: one Text argument
fn text_arg<'a>(args: &'a [Value], func: &str, arg: &str) -> Result<&'a str, MiseError> {
    require_args(args, 1, func)?;
    extract_text(&args[0], func, arg)
}

// ============ parse_recipe ============

pub struct ParseRecipe;

static PARSE_RECIPE_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("text", "Text", "Pasted recipe text"),
];

static PARSE_RECIPE_EXAMPLES: [&str; 1] = [
    "parse_recipe(\"Ingredients:\\n2 cups flour\\nInstructions:\\nMix.\") → Recipe",
];

static PARSE_RECIPE_RELATED: [&str; 2] = ["parse_ingredient", "parse_instructions"];

impl FunctionPlugin for ParseRecipe {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "parse_recipe",
            description: "Parse free-form recipe text into sections, ingredients and steps",
            usage: "parse_recipe(text)",
            args: &PARSE_RECIPE_ARGS,
            returns: "Recipe",
            examples: &PARSE_RECIPE_EXAMPLES,
            category: "parse",
            related: &PARSE_RECIPE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match text_arg(args, "parse_recipe", "text") {
            Ok(text) => Value::from(parse_recipe_text(text)),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ parse_ingredient ============

pub struct ParseIngredient;

static PARSE_INGREDIENT_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("line", "Text", "One ingredient line"),
];

static PARSE_INGREDIENT_EXAMPLES: [&str; 2] = [
    "parse_ingredient(\"2 cups flour\") → {quantity: 2, unit: \"cup\", ingredient: \"flour\"}",
    "parse_ingredient(\"1 1/2 tsp salt (7g)\") → {quantity: 1.5, unit: \"tsp\", parentheticalQuantity: 7}",
];

static PARSE_INGREDIENT_RELATED: [&str; 2] = ["parse_recipe", "parse_measurement"];

impl FunctionPlugin for ParseIngredient {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "parse_ingredient",
            description: "Parse one ingredient line (null for blank input)",
            usage: "parse_ingredient(line)",
            args: &PARSE_INGREDIENT_ARGS,
            returns: "Ingredient",
            examples: &PARSE_INGREDIENT_EXAMPLES,
            category: "parse",
            related: &PARSE_INGREDIENT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match text_arg(args, "parse_ingredient", "line") {
            Ok(line) => parse_ingredient_line(line).map(Value::from).unwrap_or(Value::Null),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ parse_instructions ============

pub struct ParseInstructions;

static PARSE_INSTRUCTIONS_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("text", "Text", "Instruction text"),
];

static PARSE_INSTRUCTIONS_EXAMPLES: [&str; 1] = [
    "parse_instructions(\"1. Mix\\n2. Bake\") → [\"Mix\", \"Bake\"]",
];

static PARSE_INSTRUCTIONS_RELATED: [&str; 1] = ["parse_recipe"];

impl FunctionPlugin for ParseInstructions {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "parse_instructions",
            description: "Split instruction text into ordered steps",
            usage: "parse_instructions(text)",
            args: &PARSE_INSTRUCTIONS_ARGS,
            returns: "List",
            examples: &PARSE_INSTRUCTIONS_EXAMPLES,
            category: "parse",
            related: &PARSE_INSTRUCTIONS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match text_arg(args, "parse_instructions", "text") {
            Ok(text) => Value::List(parse_instructions(text).into_iter().map(Value::Text).collect()),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ parse_measurement ============

pub struct ParseMeasurement;

static PARSE_MEASUREMENT_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("text", "Text", "Text such as \"2 cups\""),
];

static PARSE_MEASUREMENT_EXAMPLES: [&str; 2] = [
    "parse_measurement(\"2 cups\") → {quantity: 2, unit: \"cup\"}",
    "parse_measurement(\"2 cups flour\") → null",
];

static PARSE_MEASUREMENT_RELATED: [&str; 2] = ["is_measurement", "convert"];

impl FunctionPlugin for ParseMeasurement {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "parse_measurement",
            description: "Parse text that is exactly a quantity and a unit",
            usage: "parse_measurement(text)",
            args: &PARSE_MEASUREMENT_ARGS,
            returns: "Object",
            examples: &PARSE_MEASUREMENT_EXAMPLES,
            category: "parse",
            related: &PARSE_MEASUREMENT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let text = match text_arg(args, "parse_measurement", "text") {
            Ok(t) => t,
            Err(e) => return Value::Error(e),
        };
        match parse_single_measurement(text) {
            Some(input) => {
                let mut obj = HashMap::new();
                obj.insert("quantity".to_string(), Value::Number(input.quantity));
                obj.insert("unit".to_string(), Value::Text(input.unit));
                Value::Object(obj)
            }
            None => Value::Null,
        }
    }
}

// ============ is_measurement ============

pub struct IsMeasurement;

static IS_MEASUREMENT_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("text", "Text", "Text to test"),
];

static IS_MEASUREMENT_EXAMPLES: [&str; 2] = [
    "is_measurement(\"250 ml\") → true",
    "is_measurement(\"250 ml milk\") → false",
];

static IS_MEASUREMENT_RELATED: [&str; 1] = ["parse_measurement"];

impl FunctionPlugin for IsMeasurement {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "is_measurement",
            description: "True when the text is one line holding only a measurement",
            usage: "is_measurement(text)",
            args: &IS_MEASUREMENT_ARGS,
            returns: "Bool",
            examples: &IS_MEASUREMENT_EXAMPLES,
            category: "parse",
            related: &IS_MEASUREMENT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match text_arg(args, "is_measurement", "text") {
            Ok(text) => Value::Bool(is_single_measurement(text)),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ sanitize_line ============

pub struct SanitizeLine;

static SANITIZE_LINE_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("line", "Text", "Raw pasted line"),
];

static SANITIZE_LINE_EXAMPLES: [&str; 1] = [
    "sanitize_line(\"<li>☐ 2 cups flour</li>\") → \"2 cups flour\"",
];

static SANITIZE_LINE_RELATED: [&str; 1] = ["parse_ingredient"];

impl FunctionPlugin for SanitizeLine {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "sanitize_line",
            description: "Strip markup, links, checkboxes and bullets from a line",
            usage: "sanitize_line(line)",
            args: &SANITIZE_LINE_ARGS,
            returns: "Text",
            examples: &SANITIZE_LINE_EXAMPLES,
            category: "parse",
            related: &SANITIZE_LINE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match text_arg(args, "sanitize_line", "line") {
            Ok(line) => Value::Text(sanitize_line(line)),
            Err(e) => Value::Error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> EvalContext {
        EvalContext::default()
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_parse_recipe_plugin() {
        let result = ParseRecipe.call(&[text("2 cups flour\nMethod\nMix.")], &ctx());
        let recipe = result.as_recipe().unwrap();
        assert_eq!(recipe.ingredient_count(), 1);
        assert_eq!(recipe.instructions, vec!["Mix."]);
    }

    #[test]
    fn test_parse_ingredient_plugin() {
        let result = ParseIngredient.call(&[text("3 eggs")], &ctx());
        assert_eq!(result.as_ingredient().and_then(|i| i.quantity), Some(3.0));
        assert!(ParseIngredient.call(&[text("  ")], &ctx()).is_null());
    }

    #[test]
    fn test_parse_instructions_plugin() {
        let result = ParseInstructions.call(&[text("1. Mix\n2. Bake")], &ctx());
        assert_eq!(result.as_list().map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_parse_measurement_plugin() {
        let result = ParseMeasurement.call(&[text("2 cups")], &ctx());
        assert_eq!(result.get("unit").as_text(), Some("cup"));
        assert!(ParseMeasurement.call(&[text("2 cups flour")], &ctx()).is_null());
    }

    #[test]
    fn test_arg_errors() {
        assert!(ParseRecipe.call(&[], &ctx()).is_error());
        assert!(IsMeasurement.call(&[Value::Number(2.0)], &ctx()).is_error());
    }
}
