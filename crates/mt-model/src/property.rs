//! A measured or derived material property and its parameters.

use crate::error::{ModelError, ModelResult};
use crate::parameter::Parameter;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named bag of parameters that share an independent variable.
///
/// `self_parameter` holds raw values recorded under the property's own name when
/// a source tabulates only one axis; it answers lookups for that name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_parameter: Option<Parameter>,
}

/// One item of a property, as seen by writers walking it generically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyEntry<'a> {
    Metadata(&'static str, &'a str),
    Parameter(&'a Parameter),
}

impl Property {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.data_source = Some(source.into());
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.insert_parameter(parameter);
        self
    }

    /// Insert a parameter keyed by its name, returning any parameter it replaced.
    pub fn insert_parameter(&mut self, parameter: Parameter) -> Option<Parameter> {
        self.parameters.insert(parameter.name.clone(), parameter)
    }

    pub fn get_parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name).or_else(|| {
            self.self_parameter
                .as_ref()
                .filter(|_| name == self.name)
        })
    }

    pub fn parameter(&self, name: &str) -> ModelResult<&Parameter> {
        self.get_parameter(name)
            .ok_or_else(|| ModelError::ParameterNotFound {
                parameter: name.to_string(),
                property: self.name.clone(),
            })
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.get_parameter(name).is_some()
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    /// Co-indexed `(independent, dependent)` pairs.
    pub fn series(&self, independent: &str, dependent: &str) -> ModelResult<Vec<(&Value, &Value)>> {
        let xs = self.parameter(independent)?;
        let ys = self.parameter(dependent)?;
        if xs.len() != ys.len() {
            return Err(ModelError::InconsistentLength {
                property: self.name.clone(),
                independent: independent.to_string(),
                independent_len: xs.len(),
                dependent: dependent.to_string(),
                dependent_len: ys.len(),
            });
        }
        Ok(xs.values.iter().zip(ys.values.iter()).collect())
    }

    /// Metadata first, then parameters in name order, then the self-parameter.
    pub fn entries(&self) -> impl Iterator<Item = PropertyEntry<'_>> {
        let metadata = [
            ("DataSource", self.data_source.as_deref()),
            ("Comments", self.comments.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| PropertyEntry::Metadata(key, v)));

        metadata
            .chain(self.parameters.values().map(PropertyEntry::Parameter))
            .chain(self.self_parameter.iter().map(PropertyEntry::Parameter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elasticity() -> Property {
        Property::new("Elasticity")
            .with_parameter(Parameter::numeric("Temperature", "C", [20.0, 500.0, 1000.0]))
            .with_parameter(Parameter::numeric("Young's Modulus", "Pa", [210e9, 180e9, 150e9]))
    }

    #[test]
    fn series_pairs_values() {
        let prop = elasticity();
        let pairs = prop.series("Temperature", "Young's Modulus").unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[1], (&Value::Number(500.0), &Value::Number(180e9)));
    }

    #[test]
    fn missing_parameter_is_reported() {
        let prop = elasticity();
        let err = prop.series("Temperature", "Poisson's Ratio").unwrap_err();
        assert!(matches!(
            err,
            ModelError::ParameterNotFound { ref parameter, .. } if parameter == "Poisson's Ratio"
        ));
    }

    #[test]
    fn length_mismatch_is_reported() {
        let prop = elasticity()
            .with_parameter(Parameter::numeric("Poisson's Ratio", "-", [0.3, 0.31]));
        let err = prop.series("Temperature", "Poisson's Ratio").unwrap_err();
        assert!(matches!(
            err,
            ModelError::InconsistentLength {
                independent_len: 3,
                dependent_len: 2,
                ..
            }
        ));
    }

    #[test]
    fn self_parameter_answers_own_name_only() {
        let mut prop = Property::new("Density");
        prop.self_parameter = Some(Parameter::numeric("Density", "kg/m3", [7850.0]));
        assert!(prop.has_parameter("Density"));
        assert!(!prop.has_parameter("Temperature"));
    }

    #[test]
    fn entries_tag_kinds() {
        let prop = elasticity().with_source("handbook");
        let entries: Vec<_> = prop.entries().collect();
        assert_eq!(entries[0], PropertyEntry::Metadata("DataSource", "handbook"));
        let params = entries
            .iter()
            .filter(|e| matches!(e, PropertyEntry::Parameter(_)))
            .count();
        assert_eq!(params, 2);
    }
}
