//! Fraction ⇄ decimal conversion
//!
//! Parsing accepts decimals, ASCII fractions, mixed numbers and Unicode
//! vulgar fraction glyphs. Rendering snaps to a fixed set of cooking
//! fractions and is therefore lossy.

/// Every vulgar fraction glyph recognised on input
pub const VULGAR_FRACTIONS: [(char, f64); 18] = [
    ('½', 1.0 / 2.0),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('¼', 1.0 / 4.0),
    ('¾', 3.0 / 4.0),
    ('⅕', 1.0 / 5.0),
    ('⅖', 2.0 / 5.0),
    ('⅗', 3.0 / 5.0),
    ('⅘', 4.0 / 5.0),
    ('⅙', 1.0 / 6.0),
    ('⅚', 5.0 / 6.0),
    ('⅐', 1.0 / 7.0),
    ('⅛', 1.0 / 8.0),
    ('⅜', 3.0 / 8.0),
    ('⅝', 5.0 / 8.0),
    ('⅞', 7.0 / 8.0),
    ('⅑', 1.0 / 9.0),
    ('⅒', 1.0 / 10.0),
];

/// A fraction that quantities are snapped to for display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayFraction {
    pub value: f64,
    pub glyph: char,
    pub ascii: &'static str,
}

/// Display fractions in ascending order; ties go to the earlier entry
pub const DISPLAY_FRACTIONS: [DisplayFraction; 9] = [
    DisplayFraction { value: 1.0 / 8.0, glyph: '⅛', ascii: "1/8" },
    DisplayFraction { value: 1.0 / 4.0, glyph: '¼', ascii: "1/4" },
    DisplayFraction { value: 1.0 / 3.0, glyph: '⅓', ascii: "1/3" },
    DisplayFraction { value: 3.0 / 8.0, glyph: '⅜', ascii: "3/8" },
    DisplayFraction { value: 1.0 / 2.0, glyph: '½', ascii: "1/2" },
    DisplayFraction { value: 5.0 / 8.0, glyph: '⅝', ascii: "5/8" },
    DisplayFraction { value: 2.0 / 3.0, glyph: '⅔', ascii: "2/3" },
    DisplayFraction { value: 3.0 / 4.0, glyph: '¾', ascii: "3/4" },
    DisplayFraction { value: 7.0 / 8.0, glyph: '⅞', ascii: "7/8" },
];

/// Remainders below this print without a fraction
const SNAP_THRESHOLD: f64 = 1.0 / 16.0;

/// Unicode fraction slash, treated as '/'
pub const FRACTION_SLASH: char = '\u{2044}';

/// Value of a vulgar fraction glyph
pub fn glyph_value(c: char) -> Option<f64> {
    VULGAR_FRACTIONS.iter().find(|(g, _)| *g == c).map(|(_, v)| *v)
}

pub fn is_fraction_glyph(c: char) -> bool {
    glyph_value(c).is_some()
}

/// Parse "1.5", ".5", "1/2", "1 1/2", "½", "1½" or "1 ½" into a number.
///
/// Returns `None` for anything else, including a zero denominator.
pub fn fraction_to_decimal(text: &str) -> Option<f64> {
    let normalized = text.trim().replace(FRACTION_SLASH, "/");
    if normalized.is_empty() {
        return None;
    }

    // Trailing glyph, optionally after a whole number
    if let Some(last) = normalized.chars().last() {
        if let Some(frac) = glyph_value(last) {
            let whole_text = normalized[..normalized.len() - last.len_utf8()].trim();
            if whole_text.is_empty() {
                return Some(frac);
            }
            return parse_whole(whole_text).map(|w| w + frac);
        }
    }

    if normalized.contains('/') {
        return parse_ascii_fraction(&normalized);
    }

    parse_decimal(&normalized)
}

/// "3/4" or "1 3/4", whitespace around the slash tolerated
fn parse_ascii_fraction(text: &str) -> Option<f64> {
    let (head, denominator) = text.rsplit_once('/')?;
    let denominator = parse_whole(denominator.trim())?;
    if denominator == 0.0 {
        return None;
    }

    let head = head.trim_end();
    let (whole, numerator) = match head.rsplit_once(char::is_whitespace) {
        Some((whole, numerator)) => (Some(parse_whole(whole.trim())?), numerator),
        None => (None, head),
    };
    let numerator = parse_whole(numerator)?;

    Some(whole.unwrap_or(0.0) + numerator / denominator)
}

fn parse_whole(text: &str) -> Option<f64> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Plain decimal: optional sign, digits with at most one point
fn parse_decimal(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let digits = unsigned.chars().filter(|c| c.is_ascii_digit()).count();
    let points = unsigned.chars().filter(|&c| c == '.').count();
    if digits == 0 || points > 1 || digits + points != unsigned.chars().count() {
        return None;
    }
    text.parse().ok()
}

/// A value split into sign, whole part and nearest display fraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapped {
    pub negative: bool,
    pub whole: f64,
    pub fraction: Option<DisplayFraction>,
}

impl Snapped {
    pub fn is_zero(&self) -> bool {
        self.whole == 0.0 && self.fraction.is_none()
    }
}

/// Snap a value to a whole number plus the nearest display fraction
pub fn snap(value: f64) -> Snapped {
    let negative = value < 0.0;
    let abs = value.abs();
    let whole = abs.floor();
    let remainder = abs - whole;

    let fraction = if remainder < SNAP_THRESHOLD {
        None
    } else {
        let mut best = DISPLAY_FRACTIONS[0];
        for candidate in &DISPLAY_FRACTIONS[1..] {
            if (remainder - candidate.value).abs() < (remainder - best.value).abs() {
                best = *candidate;
            }
        }
        Some(best)
    };

    let snapped = Snapped { negative, whole, fraction };
    Snapped { negative: negative && !snapped.is_zero(), ..snapped }
}

/// ASCII fraction rendering: "1 1/2", "1/3", "2"
pub fn decimal_to_fraction(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let snapped = snap(value);
    let sign = if snapped.negative { "-" } else { "" };
    match (snapped.whole, snapped.fraction) {
        (w, None) => format!("{}{:.0}", sign, w),
        (w, Some(f)) if w == 0.0 => format!("{}{}", sign, f.ascii),
        (w, Some(f)) => format!("{}{:.0} {}", sign, w, f.ascii),
    }
}
