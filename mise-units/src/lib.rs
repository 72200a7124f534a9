//! Mise Units - Kitchen Units, Conversion and Quantity Formatting
//!
//! Categories:
//! - Volume (tsp, tbsp, fl oz, cup, pint, quart, gallon, ml, L, pinch, dash)
//! - Weight (g, kg, mg, oz, lb)
//! - Count (piece, dozen)
//!
//! Volume and weight convert into each other assuming the density of water
//! (1 ml = 1 g). Count units only convert among themselves.

mod unit;
mod units;
mod fraction;
mod format;
mod convert;

pub use unit::{Unit, Category, System, ConversionError};
pub use units::{UNITS, UnitRegistry};
pub use fraction::{
    fraction_to_decimal, decimal_to_fraction, glyph_value, is_fraction_glyph, snap, Snapped,
    DisplayFraction, DISPLAY_FRACTIONS, VULGAR_FRACTIONS, FRACTION_SLASH,
};
pub use format::format_number;
pub use convert::{find_unit, convert_unit, try_convert, compatible_units, simplify};

use mise_plugin::PluginRegistry;

/// Load unit functions into registry
pub fn load_units_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Lookup (4 functions)
        .with_function(convert::FindUnit)
        .with_function(convert::CompatibleUnits)
        .with_function(convert::ListUnits)
        .with_function(convert::UnitInfo)

        // Conversion (1 function)
        .with_function(convert::Convert)

        // Formatting (3 functions)
        .with_function(format::FormatNumber)
        .with_function(format::DecimalToFraction)
        .with_function(format::FractionToDecimal)
}
