//! Quantity display formatting and the fraction plugin functions

use mise_plugin::prelude::*;
use mise_plugin::helpers::{extract_number, extract_optional_bool, extract_text, require_args};
use crate::fraction::{decimal_to_fraction, fraction_to_decimal, snap};

/// Render a quantity for display.
///
/// With `use_fractions` the remainder snaps to the nearest of ⅛ ¼ ⅓ ⅜ ½ ⅝ ⅔ ¾ ⅞
/// ("1½", "⅓"); otherwise a decimal with at most two fractional digits and
/// no trailing zeros ("2.5", "0.33").
pub fn format_number(value: f64, use_fractions: bool) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if use_fractions {
        format_fraction(value)
    } else {
        format_decimal(value)
    }
}

fn format_fraction(value: f64) -> String {
    let snapped = snap(value);
    let sign = if snapped.negative { "-" } else { "" };
    match snapped.fraction {
        None => format!("{}{:.0}", sign, snapped.whole),
        Some(f) if snapped.whole == 0.0 => format!("{}{}", sign, f.glyph),
        Some(f) => format!("{}{:.0}{}", sign, snapped.whole, f.glyph),
    }
}

fn format_decimal(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

// ============ format_number ============

pub struct FormatNumber;

static FORMAT_NUMBER_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("value", "Number", "Quantity to render"),
    ArgMeta::optional("use_fractions", "Bool", "Snap to vulgar fractions (defaults to context preference)", "context"),
];

static FORMAT_NUMBER_EXAMPLES: [&str; 3] = [
    "format_number(1.5, true) → \"1½\"",
    "format_number(0.333, true) → \"⅓\"",
    "format_number(2.5, false) → \"2.5\"",
];

static FORMAT_NUMBER_RELATED: [&str; 2] = ["decimal_to_fraction", "fraction_to_decimal"];

impl FunctionPlugin for FormatNumber {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "format_number",
            description: "Render a quantity as a fraction-glyph or trimmed decimal string",
            usage: "format_number(value, [use_fractions])",
            args: &FORMAT_NUMBER_ARGS,
            returns: "Text",
            examples: &FORMAT_NUMBER_EXAMPLES,
            category: "units",
            related: &FORMAT_NUMBER_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        if let Err(e) = require_args(args, 1, "format_number") {
            return Value::Error(e);
        }
        let value = match extract_number(&args[0], "format_number", "value") {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };
        let use_fractions = extract_optional_bool(args, 1).unwrap_or(ctx.use_fractions);
        Value::Text(format_number(value, use_fractions))
    }
}

// ============ decimal_to_fraction ============

pub struct DecimalToFraction;

static DECIMAL_TO_FRACTION_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("value", "Number", "Decimal quantity"),
];

static DECIMAL_TO_FRACTION_EXAMPLES: [&str; 2] = [
    "decimal_to_fraction(1.5) → \"1 1/2\"",
    "decimal_to_fraction(0.33) → \"1/3\"",
];

static DECIMAL_TO_FRACTION_RELATED: [&str; 2] = ["fraction_to_decimal", "format_number"];

impl FunctionPlugin for DecimalToFraction {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "decimal_to_fraction",
            description: "Render a quantity as an ASCII mixed fraction",
            usage: "decimal_to_fraction(value)",
            args: &DECIMAL_TO_FRACTION_ARGS,
            returns: "Text",
            examples: &DECIMAL_TO_FRACTION_EXAMPLES,
            category: "units",
            related: &DECIMAL_TO_FRACTION_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let Err(e) = require_args(args, 1, "decimal_to_fraction") {
            return Value::Error(e);
        }
        match extract_number(&args[0], "decimal_to_fraction", "value") {
            Ok(n) => Value::Text(decimal_to_fraction(n)),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ fraction_to_decimal ============

pub struct FractionToDecimal;

static FRACTION_TO_DECIMAL_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("text", "Text", "Decimal, fraction, mixed number or glyph"),
];

static FRACTION_TO_DECIMAL_EXAMPLES: [&str; 3] = [
    "fraction_to_decimal(\"1 1/2\") → 1.5",
    "fraction_to_decimal(\"¾\") → 0.75",
    "fraction_to_decimal(\"pinch\") → null",
];

static FRACTION_TO_DECIMAL_RELATED: [&str; 2] = ["decimal_to_fraction", "format_number"];

impl FunctionPlugin for FractionToDecimal {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "fraction_to_decimal",
            description: "Parse a quantity string into a number (null if unrecognised)",
            usage: "fraction_to_decimal(text)",
            args: &FRACTION_TO_DECIMAL_ARGS,
            returns: "Number",
            examples: &FRACTION_TO_DECIMAL_EXAMPLES,
            category: "units",
            related: &FRACTION_TO_DECIMAL_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if let Err(e) = require_args(args, 1, "fraction_to_decimal") {
            return Value::Error(e);
        }
        match extract_text(&args[0], "fraction_to_decimal", "text") {
            Ok(s) => Value::from_option_number(fraction_to_decimal(s)),
            Err(e) => Value::Error(e),
        }
    }
}
