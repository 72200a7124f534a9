//! Mise Kitchen - Recipe Transformations
//!
//! Pure operations on a parsed recipe. Each returns a new value and leaves
//! its input untouched.
//! - Scaling by a multiplier
//! - Unit conversion of one ingredient, or of the whole recipe to metric/imperial
//! - Checklist editing: check, edit, delete, move, add (ingredients and steps)
//! - Quantity display
//!
//! Volume↔weight conversion assumes 1 ml = 1 g.

mod error;
mod scaling;
mod convert;
mod edit;
mod display;

pub use error::KitchenError;
pub use scaling::{scale_recipe, scale_quantity, validate_multiplier};
pub use convert::{convert_ingredient, to_measurement_system};
pub use edit::{
    toggle_checked, set_all_checked, update_ingredient, delete_ingredient, move_ingredient,
    add_ingredient, update_step, delete_step, move_step, add_step,
};
pub use display::display_quantity;

use mise_plugin::PluginRegistry;

/// Load kitchen functions into registry
pub fn load_kitchen_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Scaling (1 function)
        .with_function(scaling::ScaleRecipe)

        // Conversion (3 functions)
        .with_function(convert::ConvertIngredient)
        .with_function(convert::TO_METRIC)
        .with_function(convert::TO_IMPERIAL)

        // Display (1 function)
        .with_function(display::DisplayQuantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_kitchen_library() {
        let registry = PluginRegistry::new();
        let registry = load_kitchen_library(registry);

        assert!(registry.get_function("scale_recipe").is_some());
        assert!(registry.get_function("convert_ingredient").is_some());
        assert!(registry.get_function("to_metric").is_some());
        assert!(registry.get_function("to_imperial").is_some());
        assert!(registry.get_function("display_quantity").is_some());
    }
}
