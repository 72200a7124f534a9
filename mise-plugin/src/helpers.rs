//! Argument extraction shared by all plugin libraries

use mise_core::{MiseError, ParsedIngredient, ParsedRecipe, Value};

/// Fail with ARG_COUNT unless at least `expected` arguments were passed
pub fn require_args(args: &[Value], expected: usize, func: &str) -> Result<(), MiseError> {
    if args.len() < expected {
        return Err(MiseError::arg_count(func, expected, args.len()));
    }
    Ok(())
}

/// Extract a Number from a Value, returning error context
pub fn extract_number(value: &Value, func: &str, arg: &str) -> Result<f64, MiseError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Error(e) => Err(e.clone()),
        other => Err(MiseError::arg_type(func, arg, "Number", other.type_name())),
    }
}

/// Extract a Text string from a Value
pub fn extract_text<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a str, MiseError> {
    match value {
        Value::Text(s) => Ok(s.as_str()),
        Value::Error(e) => Err(e.clone()),
        other => Err(MiseError::arg_type(func, arg, "Text", other.type_name())),
    }
}

pub fn extract_recipe<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a ParsedRecipe, MiseError> {
    match value {
        Value::Recipe(r) => Ok(r),
        Value::Error(e) => Err(e.clone()),
        other => Err(MiseError::arg_type(func, arg, "Recipe", other.type_name())),
    }
}

pub fn extract_ingredient<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a ParsedIngredient, MiseError> {
    match value {
        Value::Ingredient(i) => Ok(i),
        Value::Error(e) => Err(e.clone()),
        other => Err(MiseError::arg_type(func, arg, "Ingredient", other.type_name())),
    }
}

/// Extract optional Bool (may be missing or null)
pub fn extract_optional_bool(args: &[Value], index: usize) -> Option<bool> {
    args.get(index).and_then(Value::as_bool)
}
