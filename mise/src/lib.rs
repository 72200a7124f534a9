//! Mise - Recipe Text Parsing and Kitchen Unit Conversion
//!
//! Paste a recipe, get a checklist: sections of ingredients with quantities
//! and units, plus ordered steps. Recipes scale, convert between metric and
//! imperial, and edit as immutable values.
//!
//! ```
//! use mise::Mise;
//!
//! let mise = Mise::with_standard_library();
//! let recipe = mise.parse("Ingredients:\n2 cups flour\nInstructions:\n1. Mix");
//! assert_eq!(recipe.ingredient_count(), 1);
//! assert_eq!(recipe.instructions, vec!["Mix"]);
//! ```

pub use mise_core::{
    codes, ConversionInput, IdGenerator, MiseError, ParsedIngredient, ParsedRecipe, ParsedSection,
    Severity, Value,
};
pub use mise_plugin::{ArgMeta, EvalContext, FunctionMeta, FunctionPlugin, PluginRegistry};
pub use mise_units::{
    compatible_units, convert_unit, decimal_to_fraction, find_unit, format_number,
    fraction_to_decimal, Category, ConversionError, System, Unit, UNITS,
};
pub use mise_parse::{
    is_single_measurement, parse_ingredient_line, parse_ingredient_line_with, parse_instructions,
    parse_recipe_text, parse_single_measurement, RecipeParser,
};
pub use mise_kitchen::{
    add_ingredient, add_step, convert_ingredient, delete_ingredient, delete_step,
    display_quantity, move_ingredient, move_step, scale_quantity, scale_recipe, set_all_checked,
    to_measurement_system, toggle_checked, update_ingredient, update_step, KitchenError,
};

use std::sync::Arc;
use tracing::debug;

/// Registry with the units, parse and kitchen libraries loaded
pub fn standard_registry() -> PluginRegistry {
    let registry = PluginRegistry::new();
    let registry = mise_units::load_units_library(registry);
    let registry = mise_parse::load_parse_library(registry);
    mise_kitchen::load_kitchen_library(registry)
}

/// Main Mise engine
pub struct Mise {
    registry: Arc<PluginRegistry>,
    use_fractions: bool,
    prefer_imperial: bool,
}

impl Mise {
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            use_fractions: true,
            prefer_imperial: true,
        }
    }

    pub fn with_standard_library() -> Self {
        Self::new(standard_registry())
    }

    pub fn with_fractions(mut self, enabled: bool) -> Self {
        self.use_fractions = enabled;
        self
    }

    pub fn with_prefer_imperial(mut self, enabled: bool) -> Self {
        self.prefer_imperial = enabled;
        self
    }

    pub fn use_fractions(&self) -> bool {
        self.use_fractions
    }

    pub fn prefer_imperial(&self) -> bool {
        self.prefer_imperial
    }

    /// Context handed to plugin functions
    pub fn context(&self) -> EvalContext {
        EvalContext::new(self.registry.clone())
            .with_fractions(self.use_fractions)
            .with_prefer_imperial(self.prefer_imperial)
    }

    /// Call any registered function by name
    pub fn call(&self, name: &str, args: &[Value]) -> Value {
        let result = self.registry.call_function(name, args, &self.context());
        if let Value::Error(e) = &result {
            debug!(function = name, code = %e.code, "call failed");
        }
        result
    }

    pub fn parse(&self, text: &str) -> ParsedRecipe {
        parse_recipe_text(text)
    }

    pub fn parse_ingredient(&self, line: &str) -> Option<ParsedIngredient> {
        parse_ingredient_line(line)
    }

    pub fn instructions(&self, text: &str) -> Vec<String> {
        parse_instructions(text)
    }

    pub fn measurement(&self, text: &str) -> Option<ConversionInput> {
        parse_single_measurement(text)
    }

    /// Units `key` converts into, ordered by the imperial preference
    pub fn compatible_units(&self, key: &str) -> Vec<&'static str> {
        compatible_units(key, self.prefer_imperial)
    }

    /// Quantity text for a checklist row. Fractions are used when the
    /// quantity was written as one and the fraction preference is on.
    pub fn display(&self, ingredient: &ParsedIngredient) -> String {
        display_quantity(ingredient, self.use_fractions && ingredient.is_fractional)
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        self.registry.help(name)
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        self.registry.list_functions(category)
    }
}

impl Default for Mise {
    fn default() -> Self {
        Self::with_standard_library()
    }
}

/// Build a `Vec<Value>` argument list for `Mise::call`
#[macro_export]
macro_rules! args {
    () => { Vec::<$crate::Value>::new() };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Value::from($value)),+]
    };
}
