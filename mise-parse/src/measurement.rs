//! Single measurement detection ("2 cups", "1 1/2 fl oz")
//!
//! Used to route a pasted line straight to the unit converter instead of the
//! recipe parser.

use mise_core::ConversionInput;
use crate::quantity::leading_quantity;
use mise_units::find_unit;

/// Parse text that is exactly `quantity unit` and nothing else
pub fn parse_single_measurement(text: &str) -> Option<ConversionInput> {
    let quantity = leading_quantity(text.trim())?;
    if !quantity.rest.starts_with(char::is_whitespace) {
        return None;
    }

    let words: Vec<&str> = quantity.rest.split_whitespace().collect();
    if words.is_empty() || words.len() > 2 {
        return None;
    }
    let token = words.join(" ");
    let key = find_unit(&token).or_else(|| find_unit(token.strip_suffix('.')?))?;

    Some(ConversionInput::new(quantity.value, key))
}

/// True when `text` is a single line holding only a measurement
pub fn is_single_measurement(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && !trimmed.contains('\n') && parse_single_measurement(trimmed).is_some()
}
