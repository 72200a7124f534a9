//! Unit definitions - the kitchen unit table
//!
//! Volume factors are milliliters per unit, weight factors grams per unit.

use std::collections::HashMap;
use std::sync::LazyLock;
use crate::unit::{Category, System, Unit};

/// Global unit registry
pub static UNITS: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// Registry of all known units, in table order
pub struct UnitRegistry {
    units: Vec<Unit>,
    /// Lowercased spelling -> index into `units`
    lookup: HashMap<String, usize>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        let mut registry = UnitRegistry {
            units: Vec::new(),
            lookup: HashMap::new(),
        };
        registry.register_volume_units();
        registry.register_weight_units();
        registry.register_count_units();
        registry
    }

    /// Get a unit by canonical key
    pub fn get(&self, key: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.key == key)
    }

    /// Get a unit by any spelling (case-insensitive, trimmed)
    pub fn lookup(&self, text: &str) -> Option<&Unit> {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }
        self.lookup.get(&normalized).map(|&idx| &self.units[idx])
    }

    /// Get all units in a category, table order
    pub fn by_category(&self, category: Category) -> Vec<&Unit> {
        self.units.iter().filter(|u| u.category == category).collect()
    }

    pub fn all(&self) -> &[Unit] {
        &self.units
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.units.iter().map(|u| u.key).collect()
    }

    fn register(&mut self, unit: Unit) {
        let idx = self.units.len();
        for spelling in unit.spellings() {
            self.lookup.insert(spelling.to_lowercase(), idx);
        }
        self.units.push(unit);
    }

    fn register_volume_units(&mut self) {
        use Category::Volume;

        self.register(Unit { key: "tsp", name: "teaspoon", symbol: "tsp",
            aliases: &["teaspoons", "tsps"],
            category: Volume, system: System::Imperial, to_base: 4.929 });
        self.register(Unit { key: "tbsp", name: "tablespoon", symbol: "tbsp",
            aliases: &["tablespoons", "tbsps", "tbs", "tbl"],
            category: Volume, system: System::Imperial, to_base: 14.787 });
        self.register(Unit { key: "floz", name: "fluid ounce", symbol: "fl oz",
            aliases: &["fl. oz", "fluid ounces"],
            category: Volume, system: System::Imperial, to_base: 29.574 });
        self.register(Unit { key: "cup", name: "cup", symbol: "cup",
            aliases: &["cups", "c"],
            category: Volume, system: System::Imperial, to_base: 236.588 });
        self.register(Unit { key: "pint", name: "pint", symbol: "pt",
            aliases: &["pints"],
            category: Volume, system: System::Imperial, to_base: 473.176 });
        self.register(Unit { key: "quart", name: "quart", symbol: "qt",
            aliases: &["quarts"],
            category: Volume, system: System::Imperial, to_base: 946.353 });
        self.register(Unit { key: "gallon", name: "gallon", symbol: "gal",
            aliases: &["gallons"],
            category: Volume, system: System::Imperial, to_base: 3785.41 });
        self.register(Unit { key: "ml", name: "milliliter", symbol: "ml",
            aliases: &["milliliters", "millilitre", "millilitres"],
            category: Volume, system: System::Metric, to_base: 1.0 });
        self.register(Unit { key: "l", name: "liter", symbol: "L",
            aliases: &["liters", "litre", "litres"],
            category: Volume, system: System::Metric, to_base: 1000.0 });
        self.register(Unit { key: "pinch", name: "pinch", symbol: "pinch",
            aliases: &["pinches"],
            category: Volume, system: System::Neutral, to_base: 0.308 });
        self.register(Unit { key: "dash", name: "dash", symbol: "dash",
            aliases: &["dashes"],
            category: Volume, system: System::Neutral, to_base: 0.616 });
    }

    fn register_weight_units(&mut self) {
        use Category::Weight;

        self.register(Unit { key: "g", name: "gram", symbol: "g",
            aliases: &["grams", "gramme", "grammes"],
            category: Weight, system: System::Metric, to_base: 1.0 });
        self.register(Unit { key: "kg", name: "kilogram", symbol: "kg",
            aliases: &["kilograms", "kilo", "kilos"],
            category: Weight, system: System::Metric, to_base: 1000.0 });
        self.register(Unit { key: "mg", name: "milligram", symbol: "mg",
            aliases: &["milligrams"],
            category: Weight, system: System::Metric, to_base: 0.001 });
        self.register(Unit { key: "oz", name: "ounce", symbol: "oz",
            aliases: &["ounces"],
            category: Weight, system: System::Imperial, to_base: 28.3495 });
        self.register(Unit { key: "lb", name: "pound", symbol: "lb",
            aliases: &["pounds", "lbs"],
            category: Weight, system: System::Imperial, to_base: 453.592 });
    }

    fn register_count_units(&mut self) {
        use Category::Count;

        self.register(Unit { key: "piece", name: "piece", symbol: "pc",
            aliases: &["pieces", "pcs", "each", "ea"],
            category: Count, system: System::Neutral, to_base: 1.0 });
        self.register(Unit { key: "dozen", name: "dozen", symbol: "dozen",
            aliases: &["dozens", "doz"],
            category: Count, system: System::Neutral, to_base: 12.0 });
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}
