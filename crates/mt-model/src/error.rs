//! Data-model and lookup errors.

use mt_core::{MtError, Real};
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by the data model, the lookup engine and the calculators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Material not found: {name}")]
    MaterialNotFound { name: String },

    #[error("Property '{property}' not found in {material}")]
    PropertyNotFound { property: String, material: String },

    #[error("Parameter '{parameter}' not found in property '{property}'")]
    ParameterNotFound { parameter: String, property: String },

    /// Independent and dependent series differ in length.
    #[error(
        "Inconsistent lengths in '{property}': {independent} has {independent_len} values, {dependent} has {dependent_len}"
    )]
    InconsistentLength {
        property: String,
        independent: String,
        independent_len: usize,
        dependent: String,
        dependent_len: usize,
    },

    /// Query lies outside the stored range by more than the tolerance.
    #[error("No value for {parameter} within {tolerance} of {query}")]
    OutOfRange {
        parameter: String,
        query: Real,
        tolerance: Real,
    },

    #[error("Unsupported interpolation method '{method}' (expected 'linear' or 'nearest')")]
    UnsupportedMethod { method: String },

    #[error("Non-numeric value '{value}' in {parameter}")]
    NonNumeric { parameter: String, value: String },

    #[error("No values stored for {parameter}")]
    EmptySeries { parameter: String },

    /// A calculator input is missing from a material.
    #[error("Precondition failed for {material}: {missing}")]
    Precondition { material: String, missing: String },

    #[error("Invalid argument: {what}")]
    InvalidArgument { what: String },

    #[error(transparent)]
    Core(#[from] MtError),
}
