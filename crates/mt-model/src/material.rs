//! Materials: named bundles of properties plus descriptive metadata.

use crate::error::{ModelError, ModelResult};
use crate::parameter::Parameter;
use crate::property::Property;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form metadata carried through import/export untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
    #[serde(default)]
    pub properties: BTreeMap<String, Property>,
}

/// One item of a material, as seen by writers walking it generically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialEntry<'a> {
    Metadata(&'a str, &'a str),
    Property(&'a Property),
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with_data_source(mut self, source: impl Into<String>) -> Self {
        self.data_source = Some(source.into());
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.insert_property(property);
        self
    }

    /// Insert a property keyed by its name, returning any property it replaced.
    pub fn insert_property(&mut self, property: Property) -> Option<Property> {
        self.properties.insert(property.name.clone(), property)
    }

    pub fn remove_property(&mut self, name: &str) -> Option<Property> {
        self.properties.remove(name)
    }

    pub fn property(&self, name: &str) -> ModelResult<&Property> {
        self.properties
            .get(name)
            .ok_or_else(|| ModelError::PropertyNotFound {
                property: name.to_string(),
                material: self.name.clone(),
            })
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn has_parameter(&self, property: &str, parameter: &str) -> bool {
        self.properties
            .get(property)
            .is_some_and(|p| p.has_parameter(parameter))
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Raw ordered values of one parameter.
    pub fn get_points(&self, property: &str, parameter: &str) -> ModelResult<&[Value]> {
        Ok(self.property(property)?.parameter(parameter)?.values.as_slice())
    }

    /// Unit label of one parameter (`None` when the source gave none).
    pub fn get_units(&self, property: &str, parameter: &str) -> ModelResult<Option<&str>> {
        Ok(self.property(property)?.parameter(parameter)?.unit())
    }

    /// Create or replace `property` with two co-indexed numeric series.
    ///
    /// The dependent parameter defaults to the property name.
    pub fn set_value(
        &mut self,
        property: &str,
        independent_values: Vec<f64>,
        dependent_values: Vec<f64>,
        independent_name: &str,
        dependent_name: Option<&str>,
    ) {
        let dependent_name = dependent_name.unwrap_or(property);
        let mut prop = self
            .properties
            .remove(property)
            .unwrap_or_else(|| Property::new(property));
        prop.insert_parameter(Parameter::new(
            independent_name,
            Vec::new(),
            independent_values.into_iter().map(Value::Number).collect(),
        ));
        prop.insert_parameter(Parameter::new(
            dependent_name,
            Vec::new(),
            dependent_values.into_iter().map(Value::Number).collect(),
        ));
        self.insert_property(prop);
    }

    /// Identity metadata, extra metadata, then properties in name order.
    pub fn entries(&self) -> impl Iterator<Item = MaterialEntry<'_>> {
        let identity = [
            ("Condition", self.condition.as_deref()),
            ("DataSource", self.data_source.as_deref()),
            ("Description", self.description.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| MaterialEntry::Metadata(key, v)));

        identity
            .chain(
                self.extra
                    .iter()
                    .map(|(k, v)| MaterialEntry::Metadata(k.as_str(), v.as_str())),
            )
            .chain(self.properties.values().map(MaterialEntry::Property))
    }
}
