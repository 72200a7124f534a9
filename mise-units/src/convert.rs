//! Unit lookup and conversion, plus the unit plugin functions

use std::collections::HashMap;
use mise_plugin::prelude::*;
use mise_plugin::helpers::{extract_number, extract_optional_bool, extract_text, require_args};
use tracing::{debug, trace};
use crate::unit::{Category, ConversionError, System, Unit};
use crate::units::UNITS;

/// Units a whole-recipe conversion may pick, per system
const EVERYDAY_UNITS: [&str; 9] = ["ml", "l", "g", "kg", "tsp", "tbsp", "cup", "oz", "lb"];

/// Resolve any spelling to its canonical key
pub fn find_unit(text: &str) -> Option<&'static str> {
    UNITS.lookup(text).map(|u| u.key)
}

/// Convert between two units, `None` when either is unknown or they don't bridge
pub fn convert_unit(value: f64, from: &str, to: &str) -> Option<f64> {
    try_convert(value, from, to).ok()
}

/// Fallible conversion with the reason for failure
pub fn try_convert(value: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
    let from_unit = resolve(from)?;
    let to_unit = resolve(to)?;
    let result = from_unit.convert_to(value, to_unit)?;
    trace!(value, from = from_unit.key, to = to_unit.key, result, "converted");
    Ok(result)
}

fn resolve(text: &str) -> Result<&'static Unit, ConversionError> {
    UNITS.lookup(text).ok_or_else(|| ConversionError::UnknownUnit(text.to_string()))
}

/// Every unit `key` converts into, excluding itself.
///
/// Imperial first when `prefer_imperial`, metric first otherwise, neutral last.
pub fn compatible_units(key: &str, prefer_imperial: bool) -> Vec<&'static str> {
    let unit = match UNITS.lookup(key) {
        Some(u) => u,
        None => return Vec::new(),
    };

    let mut candidates: Vec<&Unit> = UNITS.all()
        .iter()
        .filter(|u| u.key != unit.key && unit.is_compatible(u))
        .collect();
    candidates.sort_by_key(|u| system_rank(u.system, prefer_imperial));
    candidates.into_iter().map(|u| u.key).collect()
}

fn system_rank(system: System, prefer_imperial: bool) -> u8 {
    match (system, prefer_imperial) {
        (System::Imperial, true) | (System::Metric, false) => 0,
        (System::Metric, true) | (System::Imperial, false) => 1,
        (System::Neutral, _) => 2,
    }
}

/// Pick the unit of `system` that displays `value` (in `from`) most readably.
///
/// Candidates are the everyday units of the same category. The largest one
/// whose converted value reaches the threshold wins (1 for metric, ¼ for
/// imperial since "¼ cup" reads well); otherwise the smallest candidate.
pub fn simplify(value: f64, from: &str, system: System) -> Option<(&'static str, f64)> {
    let unit = UNITS.lookup(from)?;
    if unit.category == Category::Count {
        return None;
    }

    let mut candidates: Vec<&Unit> = EVERYDAY_UNITS.iter()
        .filter_map(|key| UNITS.get(key))
        .filter(|u| u.category == unit.category && u.system == system)
        .collect();
    candidates.sort_by(|a, b| a.to_base.total_cmp(&b.to_base));

    let threshold = if system == System::Imperial { 0.25 } else { 1.0 };
    let magnitude = value.abs();
    let mut best = None;
    for candidate in &candidates {
        let converted = unit.convert_to(value, candidate).ok()?;
        if best.is_none() || converted.abs() >= threshold {
            best = Some((candidate.key, converted));
        }
        if magnitude == 0.0 {
            break;
        }
    }

    debug!(value, from = unit.key, system = %system, choice = ?best, "simplified");
    best
}

/// Describe a unit as an object value
fn unit_to_value(unit: &Unit) -> Value {
    let mut obj = HashMap::new();
    obj.insert("key".to_string(), Value::Text(unit.key.to_string()));
    obj.insert("name".to_string(), Value::Text(unit.name.to_string()));
    obj.insert("symbol".to_string(), Value::Text(unit.symbol.to_string()));
    obj.insert("category".to_string(), Value::Text(unit.category.name().to_string()));
    obj.insert("system".to_string(), Value::Text(unit.system.name().to_string()));
    obj.insert("toBase".to_string(), Value::Number(unit.to_base));
    obj.insert("aliases".to_string(), Value::List(
        unit.aliases.iter().map(|a| Value::Text(a.to_string())).collect()
    ));
    Value::Object(obj)
}

// ============ convert ============

pub struct Convert;

static CONVERT_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("value", "Number", "Quantity to convert"),
    ArgMeta::required("from_unit", "Text", "Source unit (e.g., \"cup\")"),
    ArgMeta::required("to_unit", "Text", "Target unit (e.g., \"ml\")"),
];

static CONVERT_EXAMPLES: [&str; 3] = [
    "convert(1, \"cup\", \"ml\") → 236.588",
    "convert(1, \"ml\", \"g\") → 1",
    "convert(2, \"lb\", \"kg\") → 0.907",
];

static CONVERT_RELATED: [&str; 2] = ["compatible_units", "find_unit"];

impl FunctionPlugin for Convert {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert",
            description: "Convert a quantity between kitchen units (1 ml = 1 g)",
            usage: "convert(value, from_unit, to_unit)",
            args: &CONVERT_ARGS,
            returns: "Number",
            examples: &CONVERT_EXAMPLES,
            category: "units",
            related: &CONVERT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let Err(e) = require_args(args, 3, "convert") {
            return Value::Error(e);
        }

        let value = match extract_number(&args[0], "convert", "value") {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };
        let from = match extract_text(&args[1], "convert", "from_unit") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };
        let to = match extract_text(&args[2], "convert", "to_unit") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        match try_convert(value, from, to) {
            Ok(result) => Value::Number(result),
            Err(e) => Value::Error(e.into()),
        }
    }
}

// ============ find_unit ============

pub struct FindUnit;

static FIND_UNIT_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("text", "Text", "Unit spelling (e.g., \"Tablespoons\")"),
];

static FIND_UNIT_EXAMPLES: [&str; 3] = [
    "find_unit(\"Tablespoons\") → \"tbsp\"",
    "find_unit(\"fl oz\") → \"floz\"",
    "find_unit(\"smidgen\") → null",
];

static FIND_UNIT_RELATED: [&str; 2] = ["unit_info", "list_units"];

impl FunctionPlugin for FindUnit {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "find_unit",
            description: "Resolve a unit spelling to its canonical key (null if unknown)",
            usage: "find_unit(text)",
            args: &FIND_UNIT_ARGS,
            returns: "Text",
            examples: &FIND_UNIT_EXAMPLES,
            category: "units",
            related: &FIND_UNIT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let Err(e) = require_args(args, 1, "find_unit") {
            return Value::Error(e);
        }
        match extract_text(&args[0], "find_unit", "text") {
            Ok(s) => Value::from_option_text(find_unit(s)),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ compatible_units ============

pub struct CompatibleUnits;

static COMPATIBLE_UNITS_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("unit", "Text", "Unit key or spelling"),
    ArgMeta::optional("prefer_imperial", "Bool", "List imperial units first (defaults to context preference)", "context"),
];

static COMPATIBLE_UNITS_EXAMPLES: [&str; 2] = [
    "compatible_units(\"dozen\") → [\"piece\"]",
    "compatible_units(\"g\", false) → [\"ml\", \"l\", \"kg\", ...]",
];

static COMPATIBLE_UNITS_RELATED: [&str; 2] = ["convert", "list_units"];

impl FunctionPlugin for CompatibleUnits {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "compatible_units",
            description: "List units a quantity in the given unit can be converted to",
            usage: "compatible_units(unit, [prefer_imperial])",
            args: &COMPATIBLE_UNITS_ARGS,
            returns: "List",
            examples: &COMPATIBLE_UNITS_EXAMPLES,
            category: "units",
            related: &COMPATIBLE_UNITS_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        if let Err(e) = require_args(args, 1, "compatible_units") {
            return Value::Error(e);
        }
        let key = match extract_text(&args[0], "compatible_units", "unit") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };
        if find_unit(key).is_none() {
            return Value::Error(MiseError::unknown_unit(key));
        }
        let prefer_imperial = extract_optional_bool(args, 1).unwrap_or(ctx.prefer_imperial);
        Value::List(compatible_units(key, prefer_imperial)
            .into_iter()
            .map(|k| Value::Text(k.to_string()))
            .collect())
    }
}

// ============ list_units ============

pub struct ListUnits;

static LIST_UNITS_ARGS: [ArgMeta; 1] = [
    ArgMeta::optional("category", "Text", "volume, weight or count", "all"),
];

static LIST_UNITS_EXAMPLES: [&str; 2] = [
    "list_units() → [{key: \"tsp\", ...}, ...]",
    "list_units(\"count\") → [{key: \"piece\", ...}, {key: \"dozen\", ...}]",
];

static LIST_UNITS_RELATED: [&str; 1] = ["unit_info"];

impl FunctionPlugin for ListUnits {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "list_units",
            description: "List the unit table, optionally for one category",
            usage: "list_units([category])",
            args: &LIST_UNITS_ARGS,
            returns: "List",
            examples: &LIST_UNITS_EXAMPLES,
            category: "units",
            related: &LIST_UNITS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let category = match args.first() {
            None | Some(Value::Null) => None,
            Some(value) => match extract_text(value, "list_units", "category") {
                Ok(name) => match parse_category(name) {
                    Some(c) => Some(c),
                    None => return Value::Error(MiseError::domain_error(
                        format!("unknown category '{}'", name))
                        .with_suggestion("Use volume, weight or count")),
                },
                Err(e) => return Value::Error(e),
            },
        };

        Value::List(UNITS.all()
            .iter()
            .filter(|u| category.map_or(true, |c| u.category == c))
            .map(unit_to_value)
            .collect())
    }
}

fn parse_category(name: &str) -> Option<Category> {
    match name.trim().to_lowercase().as_str() {
        "volume" => Some(Category::Volume),
        "weight" | "mass" => Some(Category::Weight),
        "count" => Some(Category::Count),
        _ => None,
    }
}

// ============ unit_info ============

pub struct UnitInfo;

static UNIT_INFO_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("unit", "Text", "Unit key or spelling"),
];

static UNIT_INFO_EXAMPLES: [&str; 1] = [
    "unit_info(\"cups\") → {key: \"cup\", category: \"volume\", toBase: 236.588, ...}",
];

static UNIT_INFO_RELATED: [&str; 2] = ["find_unit", "list_units"];

impl FunctionPlugin for UnitInfo {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "unit_info",
            description: "Describe a unit: key, name, symbol, category, system, factor",
            usage: "unit_info(unit)",
            args: &UNIT_INFO_ARGS,
            returns: "Object",
            examples: &UNIT_INFO_EXAMPLES,
            category: "units",
            related: &UNIT_INFO_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let Err(e) = require_args(args, 1, "unit_info") {
            return Value::Error(e);
        }
        let text = match extract_text(&args[0], "unit_info", "unit") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };
        match UNITS.lookup(text) {
            Some(unit) => unit_to_value(unit),
            None => Value::Error(MiseError::unknown_unit(text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> EvalContext {
        EvalContext::default()
    }

    #[test]
    fn test_find_unit_spellings() {
        assert_eq!(find_unit("Tablespoons"), Some("tbsp"));
        assert_eq!(find_unit("fl oz"), Some("floz"));
        assert_eq!(find_unit("LBS"), Some("lb"));
        assert_eq!(find_unit("smidgen"), None);
    }

    #[test]
    fn test_convert_same_category() {
        let ml = convert_unit(1.0, "cup", "ml").unwrap();
        assert!((ml - 236.588).abs() < 1e-9);
        let tsp = convert_unit(1.0, "tbsp", "tsp").unwrap();
        assert!((tsp - 14.787 / 4.929).abs() < 1e-9);
    }

    #[test]
    fn test_convert_volume_weight_bridge() {
        assert_eq!(convert_unit(1.0, "ml", "g"), Some(1.0));
        assert_eq!(convert_unit(1.0, "g", "ml"), Some(1.0));
        let grams = convert_unit(1.0, "cup", "g").unwrap();
        assert!((grams - 236.588).abs() < 1e-9);
    }

    #[test]
    fn test_convert_count_never_bridges() {
        assert_eq!(convert_unit(1.0, "dozen", "g"), None);
        assert_eq!(convert_unit(1.0, "cup", "piece"), None);
        assert_eq!(convert_unit(2.0, "dozen", "piece"), Some(24.0));
    }

    #[test]
    fn test_convert_unknown() {
        assert_eq!(convert_unit(1.0, "smidgen", "g"), None);
        assert!(matches!(try_convert(1.0, "g", "smidgen"), Err(ConversionError::UnknownUnit(_))));
    }

    #[test]
    fn test_compatible_units_imperial_first() {
        assert_eq!(compatible_units("g", true), vec![
            "tsp", "tbsp", "floz", "cup", "pint", "quart", "gallon", "oz", "lb",
            "ml", "l", "kg", "mg",
            "pinch", "dash",
        ]);
    }

    #[test]
    fn test_compatible_units_metric_first() {
        let units = compatible_units("cup", false);
        assert_eq!(&units[..5], &["ml", "l", "g", "kg", "mg"]);
        assert!(!units.contains(&"cup"));
    }

    #[test]
    fn test_compatible_units_count_and_unknown() {
        assert_eq!(compatible_units("dozen", true), vec!["piece"]);
        assert!(compatible_units("smidgen", true).is_empty());
    }

    #[test]
    fn test_simplify_metric() {
        let (unit, value) = simplify(2.0, "cup", System::Metric).unwrap();
        assert_eq!(unit, "ml");
        assert!((value - 473.176).abs() < 1e-9);

        let (unit, value) = simplify(8.0, "cup", System::Metric).unwrap();
        assert_eq!(unit, "l");
        assert!((value - 1.892704).abs() < 1e-9);
    }

    #[test]
    fn test_simplify_imperial() {
        assert_eq!(simplify(500.0, "ml", System::Imperial).map(|(u, _)| u), Some("cup"));
        assert_eq!(simplify(10.0, "ml", System::Imperial).map(|(u, _)| u), Some("tbsp"));
        assert_eq!(simplify(100.0, "g", System::Imperial).map(|(u, _)| u), Some("oz"));
        assert_eq!(simplify(1000.0, "g", System::Imperial).map(|(u, _)| u), Some("lb"));
    }

    #[test]
    fn test_simplify_count_untouched() {
        assert_eq!(simplify(2.0, "dozen", System::Metric), None);
    }

    #[test]
    fn test_convert_plugin() {
        let args = vec![Value::Number(1.0), Value::Text("kg".into()), Value::Text("g".into())];
        assert_eq!(Convert.call(&args, &ctx()).as_number(), Some(1000.0));
    }

    #[test]
    fn test_convert_plugin_incompatible() {
        let args = vec![Value::Number(1.0), Value::Text("g".into()), Value::Text("dozen".into())];
        match Convert.call(&args, &ctx()) {
            Value::Error(e) => assert_eq!(e.code, codes::INCOMPATIBLE_UNITS),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_compatible_units_plugin_context_preference() {
        let metric = ctx().with_prefer_imperial(false);
        let result = CompatibleUnits.call(&[Value::Text("cup".into())], &metric);
        assert_eq!(result.as_list().and_then(|l| l.first()).and_then(Value::as_text), Some("ml"));
    }

    #[test]
    fn test_list_units_by_category() {
        let result = ListUnits.call(&[Value::Text("count".into())], &ctx());
        assert_eq!(result.as_list().map(|l| l.len()), Some(2));
        assert!(ListUnits.call(&[Value::Text("heat".into())], &ctx()).is_error());
    }

    #[test]
    fn test_unit_info() {
        let info = UnitInfo.call(&[Value::Text("cups".into())], &ctx());
        assert_eq!(info.get("key").as_text(), Some("cup"));
        assert_eq!(info.get("toBase").as_number(), Some(236.588));
        assert!(UnitInfo.call(&[Value::Text("smidgen".into())], &ctx()).is_error());
    }
}
