//! Runtime values passed through the plugin layer
//!
//! Values can be numbers, text, booleans, recipe model objects, generic
//! objects, lists, null, or errors. Plugin functions take and return values
//! so tool hosts can call any function by name.

use crate::{MiseError, ParsedIngredient, ParsedRecipe};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;

/// Runtime value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    Recipe(Box<ParsedRecipe>),
    Ingredient(Box<ParsedIngredient>),
    Object(HashMap<String, Value>),
    List(Vec<Value>),
    Null,
    Error(MiseError),
}

impl Value {
    // ========== Safe Accessors (never panic) ==========

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_recipe(&self) -> Option<&ParsedRecipe> {
        match self {
            Value::Recipe(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_ingredient(&self) -> Option<&ParsedIngredient> {
        match self {
            Value::Ingredient(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Field of an object value, `Null` when absent
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(map) => map.get(key).cloned().unwrap_or(Value::Null),
            Value::Error(e) => Value::Error(e.clone()),
            _ => Value::Error(MiseError::type_error("Object", self.type_name())),
        }
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Text(_) => "Text",
            Value::Bool(_) => "Bool",
            Value::Recipe(_) => "Recipe",
            Value::Ingredient(_) => "Ingredient",
            Value::Object(_) => "Object",
            Value::List(_) => "List",
            Value::Null => "Null",
            Value::Error(_) => "Error",
        }
    }

    /// Wrap an optional number, `None` becomes `Null`
    pub fn from_option_number(n: Option<f64>) -> Value {
        n.map(Value::Number).unwrap_or(Value::Null)
    }

    /// Wrap an optional text, `None` becomes `Null`
    pub fn from_option_text<S: Into<String>>(s: Option<S>) -> Value {
        s.map(|s| Value::Text(s.into())).unwrap_or(Value::Null)
    }

    // ========== JSON bridge ==========

    /// Convert to plain JSON (recipe objects use their serde form)
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => json!(n),
            Value::Text(s) => JsonValue::String(s.clone()),
            Value::Recipe(r) => serde_json::to_value(r.as_ref()).unwrap_or(JsonValue::Null),
            Value::Ingredient(i) => serde_json::to_value(i.as_ref()).unwrap_or(JsonValue::Null),
            Value::List(l) => JsonValue::Array(l.iter().map(Value::to_json).collect()),
            Value::Object(o) => JsonValue::Object(o.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()),
            Value::Error(e) => json!({"_error": {"code": e.code, "message": e.message}}),
        }
    }

    /// Convert from plain JSON. Objects shaped like a recipe (a `sections`
    /// array) or an ingredient (`originalText`) become typed values.
    pub fn from_json(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            JsonValue::String(s) => Value::Text(s.clone()),
            JsonValue::Array(arr) => Value::List(arr.iter().map(Value::from_json).collect()),
            JsonValue::Object(obj) => {
                if obj.get("sections").map_or(false, JsonValue::is_array) {
                    if let Ok(recipe) = serde_json::from_value::<ParsedRecipe>(json.clone()) {
                        return Value::Recipe(Box::new(recipe));
                    }
                }
                if obj.contains_key("originalText") {
                    if let Ok(ingredient) = serde_json::from_value::<ParsedIngredient>(json.clone()) {
                        return Value::Ingredient(Box::new(ingredient));
                    }
                }
                Value::Object(obj.iter().map(|(k, v)| (k.clone(), Value::from_json(v))).collect())
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Recipe(r) => write!(f, "[Recipe: {} ingredients, {} steps]",
                r.ingredient_count(), r.instructions.len()),
            Value::Ingredient(i) => write!(f, "[Ingredient: {}]", i.ingredient),
            Value::Object(_) => write!(f, "[Object]"),
            Value::List(items) => {
                // Show values for small lists, count for large
                if items.len() <= 5 {
                    let contents: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                    write!(f, "[{}]", contents.join(", "))
                } else {
                    write!(f, "[{}]", items.len())
                }
            }
            Value::Null => write!(f, "null"),
            Value::Error(e) => write!(f, "#ERROR: {}", e.code),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<ParsedRecipe> for Value {
    fn from(r: ParsedRecipe) -> Self {
        Value::Recipe(Box::new(r))
    }
}

impl From<ParsedIngredient> for Value {
    fn from(i: ParsedIngredient) -> Self {
        Value::Ingredient(Box::new(i))
    }
}

impl From<MiseError> for Value {
    fn from(e: MiseError) -> Self {
        Value::Error(e)
    }
}
