//! Mise Core - Fundamental types
//!
//! This crate provides the core types used throughout Mise:
//! - `ParsedRecipe` / `ParsedSection` / `ParsedIngredient`: the recipe model
//! - `IdGenerator`: per-parse identifier source
//! - `Value`: runtime values exchanged with plugin functions
//! - `MiseError`: structured errors

mod recipe;
mod id;
mod value;
mod error;

pub use recipe::{ParsedRecipe, ParsedSection, ParsedIngredient, ConversionInput};
pub use id::IdGenerator;
pub use value::Value;
pub use error::{MiseError, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{ParsedRecipe, ParsedSection, ParsedIngredient, ConversionInput};
    pub use crate::{IdGenerator, Value, MiseError, Severity};
    pub use crate::error::codes;
}
