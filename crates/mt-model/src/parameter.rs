//! A named, unit-tagged series.

use crate::value::Value;
use mt_core::Real;
use serde::{Deserialize, Serialize};

/// One named data series within a property, e.g. "Temperature" or "Young's Modulus".
///
/// `units` is either parallel to `values` or holds a single label for the whole series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub units: Vec<String>,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, units: Vec<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            units,
            values,
        }
    }

    /// Numeric series with one unit label.
    pub fn numeric(
        name: impl Into<String>,
        unit: impl Into<String>,
        values: impl IntoIterator<Item = Real>,
    ) -> Self {
        Self {
            name: name.into(),
            units: vec![unit.into()],
            values: values.into_iter().map(Value::Number).collect(),
        }
    }

    /// Replace the stored series.
    pub fn set_values(&mut self, values: impl IntoIterator<Item = Value>) {
        self.values = values.into_iter().collect();
    }

    /// The series unit, taken from the first label.
    pub fn unit(&self) -> Option<&str> {
        self.units.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values as numbers, or `None` if any entry is not numeric.
    pub fn numbers(&self) -> Option<Vec<Real>> {
        self.values.iter().map(Value::as_number).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_constructor() {
        let p = Parameter::numeric("Temperature", "C", [20.0, 500.0]);
        assert_eq!(p.unit(), Some("C"));
        assert_eq!(p.len(), 2);
        assert_eq!(p.numbers(), Some(vec![20.0, 500.0]));
    }

    #[test]
    fn numbers_rejects_text() {
        let p = Parameter::new("Notes", vec![], vec![Value::Number(1.0), Value::from("-")]);
        assert_eq!(p.numbers(), None);
        assert_eq!(p.unit(), None);
    }
}
