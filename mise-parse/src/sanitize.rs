//! Line cleanup applied before classification
//!
//! Pasted recipes carry markup, links, checklist glyphs and list bullets.
//! None of these carry meaning for parsing.

use std::sync::LazyLock;
use regex::Regex;
use mise_units::FRACTION_SLASH;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").unwrap());

static CHECKBOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[☐☑☒✓✔✗✘□■▢▣◻◼]|\[[ xX✓]?\]").unwrap());

/// Symbol bullets only; numbered markers are left alone since "1." may be a quantity
static LEADING_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*•·▪◦‣–—]+\s+").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Clean one line of pasted text
pub fn sanitize_line(line: &str) -> String {
    let text = HTML_TAG.replace_all(line, " ");
    let text = decode_entities(&text);
    let text = URL.replace_all(&text, " ");
    let text = CHECKBOX.replace_all(&text, " ");
    let text = text.replace(FRACTION_SLASH, "/");
    let text = LEADING_BULLET.replace(&text, "");
    collapse_whitespace(&text)
}

/// Collapse runs of whitespace to one space and trim
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&frac12;", "½")
        .replace("&frac14;", "¼")
        .replace("&frac34;", "¾")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_html() {
        assert_eq!(sanitize_line("<li><b>2 cups</b> flour</li>"), "2 cups flour");
        assert_eq!(sanitize_line("salt &amp; pepper"), "salt & pepper");
    }

    #[test]
    fn test_strips_urls() {
        assert_eq!(sanitize_line("1 cup sugar https://example.com/sugar?x=1"), "1 cup sugar");
        assert_eq!(sanitize_line("see www.example.com for more"), "see for more");
    }

    #[test]
    fn test_strips_checkboxes_and_bullets() {
        assert_eq!(sanitize_line("☐ 2 eggs"), "2 eggs");
        assert_eq!(sanitize_line("[ ] 1 onion"), "1 onion");
        assert_eq!(sanitize_line("  • 1 tsp salt"), "1 tsp salt");
        assert_eq!(sanitize_line("- 3 carrots"), "3 carrots");
    }

    #[test]
    fn test_keeps_numbered_lines() {
        assert_eq!(sanitize_line("1. Mix well"), "1. Mix well");
        assert_eq!(sanitize_line("-5 degrees"), "-5 degrees");
    }

    #[test]
    fn test_normalizes_fraction_slash_and_whitespace() {
        assert_eq!(sanitize_line("1\u{2044}2   cup\tmilk "), "1/2 cup milk");
    }

    #[test]
    fn test_blank_stays_blank() {
        assert_eq!(sanitize_line("   "), "");
        assert_eq!(sanitize_line("☐"), "");
    }
}
