//! Errors from recipe transformations

use mise_core::MiseError;
use mise_units::ConversionError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KitchenError {
    #[error("multiplier must be a finite number above zero, got {0}")]
    InvalidMultiplier(f64),

    #[error("ingredient '{0}' has no quantity")]
    NoQuantity(String),

    #[error("ingredient '{0}' has no unit")]
    NoUnit(String),

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("cannot convert {from} to {to}")]
    Incompatible { from: String, to: String },

    #[error("no {what} with id '{id}'")]
    NotFound { what: &'static str, id: String },

    #[error("step {index} out of range ({len} steps)")]
    StepOutOfRange { index: usize, len: usize },
}

impl KitchenError {
    pub fn ingredient_not_found(id: &str) -> Self {
        KitchenError::NotFound { what: "ingredient", id: id.to_string() }
    }

    pub fn section_not_found(id: &str) -> Self {
        KitchenError::NotFound { what: "section", id: id.to_string() }
    }
}

impl From<ConversionError> for KitchenError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::UnknownUnit(u) => KitchenError::UnknownUnit(u),
            ConversionError::Incompatible { from, to, .. } => KitchenError::Incompatible { from, to },
        }
    }
}

impl From<KitchenError> for MiseError {
    fn from(err: KitchenError) -> Self {
        match &err {
            KitchenError::UnknownUnit(u) => MiseError::unknown_unit(u),
            KitchenError::Incompatible { from, to } => MiseError::incompatible_units(from, to),
            KitchenError::NotFound { what, id } => MiseError::not_found(what, id),
            KitchenError::StepOutOfRange { index, .. } => MiseError::not_found("step", &index.to_string()),
            KitchenError::InvalidMultiplier(_) => MiseError::domain_error(err.to_string())
                .with_suggestion("Use a multiplier such as 0.5, 2 or 3"),
            KitchenError::NoQuantity(_) | KitchenError::NoUnit(_) => MiseError::domain_error(err.to_string()),
        }
    }
}
