//! Ingredient line parsing
//!
//! A line is split into an optional quantity, an optional unit (always a unit
//! table key), a description, and an optional parenthetical annotation such
//! as "(7g)". Parsing never fails on non-empty input: text that has no
//! recognisable quantity becomes the description as-is.

use std::sync::LazyLock;
use regex::Regex;
use tracing::trace;
use mise_core::{IdGenerator, ParsedIngredient};
use mise_units::{convert_unit, UNITS};
use crate::quantity::{leading_quantity, leading_unit};
use crate::sanitize::collapse_whitespace;

static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^()]*)\)").unwrap());

static SPACE_BEFORE_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+,").unwrap());

/// Joiner between the two halves of a combined quantity
static COMBINER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*(?:\+|and\b)").unwrap());

/// Parse one line with a throwaway id generator
pub fn parse_ingredient_line(line: &str) -> Option<ParsedIngredient> {
    parse_ingredient_line_with(line, &mut IdGenerator::new())
}

/// Parse one line, drawing the ingredient id from `ids`.
///
/// Returns `None` only for empty or whitespace-only input.
pub fn parse_ingredient_line_with(line: &str, ids: &mut IdGenerator) -> Option<ParsedIngredient> {
    if line.trim().is_empty() {
        return None;
    }

    let mut ingredient = ParsedIngredient::plain(ids.next("ing"), line);

    if let Some(caps) = PARENTHETICAL.captures(line) {
        let inner = caps.get(1).map_or("", |m| m.as_str());
        ingredient.parenthetical = Some(inner.to_string());
        if let Some((quantity, unit)) = parse_annotation(inner) {
            ingredient.parenthetical_quantity = Some(quantity);
            ingredient.parenthetical_unit = unit.map(str::to_string);
        }
    }

    let main = main_text(line);
    let amount = combined_amount(&main).or_else(|| standard_amount(&main));

    match amount {
        Some(amount) => {
            ingredient.quantity = Some(amount.quantity);
            ingredient.unit = amount.unit.map(str::to_string);
            ingredient.is_fractional = amount.fractional;
            ingredient.ingredient = amount.description;
        }
        None => ingredient.ingredient = main,
    }

    Some(ingredient)
}

/// Line with every parenthetical group removed
fn main_text(line: &str) -> String {
    let without = PARENTHETICAL.replace_all(line, " ");
    let collapsed = collapse_whitespace(&without);
    SPACE_BEFORE_COMMA.replace_all(&collapsed, ",").into_owned()
}

/// "7g", "about 50 ml" is not accepted: the quantity must lead
fn parse_annotation(inner: &str) -> Option<(f64, Option<&'static str>)> {
    let quantity = leading_quantity(inner)?;
    let unit = leading_unit(quantity.rest).map(|(key, _)| key);
    Some((quantity.value, unit))
}

struct Amount {
    quantity: f64,
    unit: Option<&'static str>,
    fractional: bool,
    description: String,
}

/// `quantity [unit] description`
fn standard_amount(text: &str) -> Option<Amount> {
    let quantity = leading_quantity(text)?;
    let (unit, rest) = match leading_unit(quantity.rest) {
        Some((key, rest)) => (Some(key), rest),
        None => (None, quantity.rest),
    };
    Some(Amount {
        quantity: quantity.value,
        unit,
        fractional: quantity.fractional,
        description: rest.trim().to_string(),
    })
}

/// `quantity1 [unit1] (+|and) quantity2 [unit2] description`
///
/// Units in different categories (cups and pounds) can't be summed, and the
/// whole match is dropped so the line parses the standard way.
fn combined_amount(text: &str) -> Option<Amount> {
    let first = leading_quantity(text)?;
    let (first_unit, after_first) = match leading_unit(first.rest) {
        Some((key, rest)) => (Some(key), rest),
        None => (None, first.rest),
    };

    let joiner = COMBINER.find(after_first)?;
    let second = leading_quantity(&after_first[joiner.end()..])?;
    let (second_unit, rest) = match leading_unit(second.rest) {
        Some((key, rest)) => (Some(key), rest),
        None => (None, second.rest),
    };

    let (quantity, unit) = match (first_unit, second_unit) {
        (Some(a), Some(b)) if a == b => (first.value + second.value, Some(a)),
        (Some(a), Some(b)) => {
            let same_category = UNITS.get(a)
                .zip(UNITS.get(b))
                .map_or(false, |(ua, ub)| ua.category == ub.category);
            if !same_category {
                trace!(first = a, second = b, "combined quantity across categories, not combining");
                return None;
            }
            let converted = convert_unit(second.value, b, a)?;
            (first.value + converted, Some(a))
        }
        (Some(a), None) | (None, Some(a)) => (first.value + second.value, Some(a)),
        (None, None) => (first.value + second.value, None),
    };

    trace!(quantity, unit = ?unit, "combined quantity");
    Some(Amount {
        quantity,
        unit,
        fractional: first.fractional || second.fractional,
        description: rest.trim().to_string(),
    })
}
