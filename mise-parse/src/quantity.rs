//! Leading quantity and unit token extraction

use std::sync::LazyLock;
use regex::Regex;
use mise_units::{find_unit, fraction_to_decimal, is_fraction_glyph, VULGAR_FRACTIONS};

/// Leading quantity, most specific form first: "1½" / "1 ½", "1 1/2", "1/2",
/// "½", "1.5" / ".5", "2"
static LEADING_QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    let glyphs: String = VULGAR_FRACTIONS.iter().map(|(g, _)| *g).collect();
    let pattern = format!(
        r"^(?:\d+\s*[{g}]|\d+\s+\d+\s*/\s*\d+|\d+\s*/\s*\d+|[{g}]|\d*\.\d+|\d+)",
        g = glyphs
    );
    Regex::new(&pattern).unwrap()
});

/// A quantity read from the start of a text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadingQuantity<'a> {
    pub value: f64,
    /// Written as a fraction or glyph
    pub fractional: bool,
    /// Text after the quantity, untrimmed
    pub rest: &'a str,
}

/// Read a quantity from the start of `text` (leading whitespace ignored)
pub fn leading_quantity(text: &str) -> Option<LeadingQuantity<'_>> {
    let text = text.trim_start();
    let m = LEADING_QUANTITY.find(text)?;
    let written = m.as_str();
    let value = fraction_to_decimal(written)?;
    Some(LeadingQuantity {
        value,
        fractional: written.contains('/') || written.chars().any(is_fraction_glyph),
        rest: &text[m.end()..],
    })
}

/// Split off the first whitespace-delimited word
fn split_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    match text.find(char::is_whitespace) {
        Some(end) => Some((&text[..end], &text[end..])),
        None => Some((text, "")),
    }
}

/// Read a unit token from the start of `text`: the two-word form first
/// ("fl oz"), then a single word. A trailing '.' is ignored ("tsp.").
///
/// Returns the unit key and the text after the token. An unrecognised token
/// is not consumed.
pub fn leading_unit(text: &str) -> Option<(&'static str, &str)> {
    let (first, after_first) = split_word(text)?;

    if let Some((second, after_second)) = split_word(after_first) {
        let pair = format!("{} {}", first, second);
        if let Some(key) = unit_for_token(&pair) {
            return Some((key, after_second));
        }
    }

    unit_for_token(first).map(|key| (key, after_first))
}

fn unit_for_token(token: &str) -> Option<&'static str> {
    find_unit(token).or_else(|| find_unit(token.strip_suffix('.')?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(text: &str) -> Option<f64> {
        leading_quantity(text).map(|q| q.value)
    }

    #[test]
    fn test_quantity_forms() {
        assert_eq!(value("2 cups"), Some(2.0));
        assert_eq!(value("1.5 l"), Some(1.5));
        assert_eq!(value(".5 tsp"), Some(0.5));
        assert_eq!(value("1/2 cup"), Some(0.5));
        assert_eq!(value("1 1/2 cup"), Some(1.5));
        assert_eq!(value("1 ½ cup"), Some(1.5));
        assert_eq!(value("1½ cup"), Some(1.5));
        assert_eq!(value("¾ cup"), Some(0.75));
        assert_eq!(value("2 3 / 4 oz"), Some(2.75));
    }

    #[test]
    fn test_quantity_rest_and_fractional_flag() {
        let q = leading_quantity("1 1/2 tsp salt").unwrap();
        assert_eq!(q.rest, " tsp salt");
        assert!(q.fractional);

        let q = leading_quantity("200g flour").unwrap();
        assert_eq!(q.value, 200.0);
        assert_eq!(q.rest, "g flour");
        assert!(!q.fractional);
    }

    #[test]
    fn test_no_quantity() {
        assert!(leading_quantity("salt to taste").is_none());
        assert!(leading_quantity("").is_none());
    }

    #[test]
    fn test_unit_tokens() {
        assert_eq!(leading_unit(" cups flour"), Some(("cup", " flour")));
        assert_eq!(leading_unit("tsp. salt"), Some(("tsp", " salt")));
        assert_eq!(leading_unit(" fl oz milk"), Some(("floz", " milk")));
        assert_eq!(leading_unit("g"), Some(("g", "")));
    }

    #[test]
    fn test_unknown_unit_not_consumed() {
        assert_eq!(leading_unit(" eggs, beaten"), None);
        assert_eq!(leading_unit("   "), None);
    }
}
