//! Error types for the pipeline crate.

use thiserror::Error;

/// Malformed merge parameters.
///
/// Raised before any child filter runs; the whole call fails.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid parameter: 'filters' must be an array, but {found}")]
    FiltersNotArray { found: String },

    #[error("Invalid parameter: 'filters[{index}]' must be a string or an object, but {found}")]
    InvalidChild { index: usize, found: String },

    #[error("Invalid parameter: 'filters[{index}].name' must be a string, but {found}")]
    InvalidName { index: usize, found: String },

    #[error("Invalid parameter: 'limit' of '{name}' must be a number, but {found}")]
    InvalidLimit { name: String, found: String },

    #[error("Invalid parameter: 'weight' of '{name}' must be a number, but {found}")]
    InvalidWeight { name: String, found: String },

    #[error("Invalid parameter: 'weight' must be greater than 0, but {weight}")]
    NonPositiveWeight { name: String, weight: f64 },

    #[error("Invalid parameter: 'unique' must be a boolean, but {found}")]
    InvalidUnique { found: String },
}
