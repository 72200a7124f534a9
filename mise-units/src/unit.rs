//! Unit representation with conversion factors

use std::fmt;
use serde::Serialize;
use thiserror::Error;

/// What a unit measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Base unit: milliliter
    Volume,
    /// Base unit: gram
    Weight,
    /// Base unit: one item
    Count,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::Volume => "volume",
            Category::Weight => "weight",
            Category::Count => "count",
        }
    }

    /// Volume and weight share the water-density bridge (1 ml = 1 g)
    pub fn bridges_to(&self, other: Category) -> bool {
        match (self, other) {
            (Category::Count, Category::Count) => true,
            (Category::Count, _) | (_, Category::Count) => false,
            _ => true,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Measurement system, used for ordering and preference only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum System {
    Metric,
    Imperial,
    /// Pinch, dash and count units
    Neutral,
}

impl System {
    pub fn name(&self) -> &'static str {
        match self {
            System::Metric => "metric",
            System::Imperial => "imperial",
            System::Neutral => "neutral",
        }
    }

    /// Parse a system name ("metric", "imperial", "us", "neutral")
    pub fn from_name(name: &str) -> Option<System> {
        match name.trim().to_lowercase().as_str() {
            "metric" | "si" => Some(System::Metric),
            "imperial" | "us" | "customary" => Some(System::Imperial),
            "neutral" => Some(System::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A kitchen unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    /// Canonical key stored in parsed ingredients (e.g. "tbsp")
    pub key: &'static str,
    /// Full name (e.g. "tablespoon")
    pub name: &'static str,
    /// Short display form (e.g. "tbsp", "fl oz")
    pub symbol: &'static str,
    /// Additional recognised spellings, lowercase
    pub aliases: &'static [&'static str],
    pub category: Category,
    pub system: System,
    /// Multiplier to the category's base unit
    pub to_base: f64,
}

impl Unit {
    /// Check if two units can be converted into each other
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.category.bridges_to(other.category)
    }

    /// Convert a value from this unit to its base unit
    pub fn to_base(&self, value: f64) -> f64 {
        value * self.to_base
    }

    /// Convert a value from the base unit to this unit
    pub fn from_base(&self, base_value: f64) -> f64 {
        base_value / self.to_base
    }

    /// Convert a value from this unit to another unit
    pub fn convert_to(&self, value: f64, target: &Unit) -> Result<f64, ConversionError> {
        if !self.is_compatible(target) {
            return Err(ConversionError::Incompatible {
                from: self.key.to_string(),
                to: target.key.to_string(),
                from_category: self.category,
                to_category: target.category,
            });
        }
        Ok(target.from_base(self.to_base(value)))
    }

    /// Every spelling `find_unit` accepts for this unit
    pub fn spellings(&self) -> impl Iterator<Item = &'static str> {
        let aliases: &'static [&'static str] = self.aliases;
        [self.key, self.name, self.symbol].into_iter().chain(aliases.iter().copied())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// Errors that can occur during unit conversion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("cannot convert {from} ({from_category}) to {to} ({to_category})")]
    Incompatible {
        from: String,
        to: String,
        from_category: Category,
        to_category: Category,
    },
}

impl From<ConversionError> for mise_core::MiseError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::UnknownUnit(u) => mise_core::MiseError::unknown_unit(&u),
            ConversionError::Incompatible { from, to, .. } => {
                mise_core::MiseError::incompatible_units(&from, &to)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cup() -> Unit {
        Unit { key: "cup", name: "cup", symbol: "cup", aliases: &["cups"],
            category: Category::Volume, system: System::Imperial, to_base: 236.588 }
    }

    fn gram() -> Unit {
        Unit { key: "g", name: "gram", symbol: "g", aliases: &[],
            category: Category::Weight, system: System::Metric, to_base: 1.0 }
    }

    fn dozen() -> Unit {
        Unit { key: "dozen", name: "dozen", symbol: "dozen", aliases: &[],
            category: Category::Count, system: System::Neutral, to_base: 12.0 }
    }

    #[test]
    fn test_compatible_units() {
        assert!(cup().is_compatible(&gram()));
        assert!(!cup().is_compatible(&dozen()));
        assert!(dozen().is_compatible(&dozen()));
    }

    #[test]
    fn test_to_base_conversion() {
        assert!((cup().to_base(2.0) - 473.176).abs() < 1e-9);
        assert!((cup().from_base(236.588) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cross_category_conversion() {
        let grams = cup().convert_to(1.0, &gram()).unwrap();
        assert!((grams - 236.588).abs() < 1e-9);
    }

    #[test]
    fn test_incompatible_conversion() {
        let err = gram().convert_to(1.0, &dozen()).unwrap_err();
        assert!(matches!(err, ConversionError::Incompatible { .. }));
        assert_eq!(err.to_string(), "cannot convert g (weight) to dozen (count)");
    }

    #[test]
    fn test_system_from_name() {
        assert_eq!(System::from_name(" Metric "), Some(System::Metric));
        assert_eq!(System::from_name("us"), Some(System::Imperial));
        assert_eq!(System::from_name("martian"), None);
    }

    #[test]
    fn test_spellings_include_key_and_name() {
        let spellings: Vec<&str> = gram().spellings().collect();
        assert!(spellings.contains(&"g"));
        assert!(spellings.contains(&"gram"));
    }
}
