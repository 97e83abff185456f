//! Stored data points.

use mt_core::Real;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a parameter series.
///
/// Serialized untagged: a number, `null` for a missing point, or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(Real),
    Text(String),
    Missing,
}

impl Value {
    pub fn as_number(&self) -> Option<Real> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Parse a cell from a text source: numbers become `Number`, blanks `Missing`.
    pub fn parse(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Value::Missing;
        }
        match trimmed.parse::<Real>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }
}

impl From<Real> for Value {
    fn from(v: Real) -> Self {
        Value::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Option<Real>> for Value {
    fn from(v: Option<Real>) -> Self {
        v.map_or(Value::Missing, Value::Number)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Missing => Ok(()),
        }
    }
}
