//! Named sets of materials and the merge policy used during import.

use crate::error::{ModelError, ModelResult};
use crate::material::Material;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Materials keyed by name, plus where they came from.
///
/// `material_names` mirrors the keys of `materials` and is rebuilt after every
/// structural change, including deserialization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "CollectionRepr")]
pub struct MaterialCollection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    materials: BTreeMap<String, Material>,
    #[serde(default)]
    imported_filenames: Vec<String>,
    #[serde(skip)]
    material_names: Vec<String>,
}

#[derive(Deserialize)]
struct CollectionRepr {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    materials: BTreeMap<String, Material>,
    #[serde(default)]
    imported_filenames: Vec<String>,
}

impl From<CollectionRepr> for MaterialCollection {
    fn from(repr: CollectionRepr) -> Self {
        let mut collection = Self {
            source: repr.source,
            materials: repr.materials,
            imported_filenames: repr.imported_filenames,
            material_names: Vec::new(),
        };
        collection.refresh_names();
        collection
    }
}

impl MaterialCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// Add `material` under `desired_name`.
    ///
    /// On a collision the incumbent moves aside to `"{name} ({condition})"`, or
    /// `"{name} ({condition}) ({data_source})"` if that is taken too, and the
    /// incoming material takes the bare name. Returns the incumbent's new key.
    pub fn add_material(
        &mut self,
        material: Material,
        desired_name: impl Into<String>,
    ) -> Option<String> {
        let desired_name = desired_name.into();
        let moved_to = match self.materials.remove(&desired_name) {
            Some(incumbent) => {
                let key = self.relocation_key(&desired_name, &incumbent);
                info!(from = %desired_name, to = %key, "material exists, moving incumbent");
                self.materials.insert(key.clone(), incumbent);
                Some(key)
            }
            None => None,
        };
        self.materials.insert(desired_name, material);
        self.refresh_names();
        moved_to
    }

    /// Add `material` under its own name.
    pub fn insert(&mut self, material: Material) -> Option<String> {
        let name = material.name.clone();
        self.add_material(material, name)
    }

    fn relocation_key(&self, name: &str, incumbent: &Material) -> String {
        let condition = incumbent.condition.as_deref();
        let source = incumbent.data_source.as_deref();
        let first = format!("{name} ({})", condition.or(source).unwrap_or("unspecified"));
        if !self.materials.contains_key(&first) {
            return first;
        }
        let mut candidate = first.clone();
        if let (Some(_), Some(source)) = (condition, source) {
            candidate = format!("{first} ({source})");
            if !self.materials.contains_key(&candidate) {
                return candidate;
            }
        }
        let mut n = 2;
        loop {
            let numbered = format!("{candidate} ({n})");
            if !self.materials.contains_key(&numbered) {
                return numbered;
            }
            n += 1;
        }
    }

    /// Merge every material of `other` through [`MaterialCollection::add_material`].
    pub fn import_collection(&mut self, other: MaterialCollection) {
        for (name, material) in other.materials {
            self.add_material(material, name);
        }
        self.imported_filenames.extend(other.imported_filenames);
    }

    pub fn remove_material(&mut self, name: &str) -> ModelResult<Material> {
        let removed = self
            .materials
            .remove(name)
            .ok_or_else(|| ModelError::MaterialNotFound {
                name: name.to_string(),
            })?;
        self.refresh_names();
        Ok(removed)
    }

    pub fn material(&self, name: &str) -> ModelResult<&Material> {
        self.materials
            .get(name)
            .ok_or_else(|| ModelError::MaterialNotFound {
                name: name.to_string(),
            })
    }

    pub fn material_mut(&mut self, name: &str) -> ModelResult<&mut Material> {
        self.materials
            .get_mut(name)
            .ok_or_else(|| ModelError::MaterialNotFound {
                name: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    pub fn names(&self) -> &[String] {
        &self.material_names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Material)> {
        self.materials.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn imported_filenames(&self) -> &[String] {
        &self.imported_filenames
    }

    pub fn record_filename(&mut self, filename: impl Into<String>) {
        self.imported_filenames.push(filename.into());
    }

    fn refresh_names(&mut self) {
        self.material_names = self.materials.keys().cloned().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steel(condition: &str, source: &str) -> Material {
        Material::new("Steel")
            .with_condition(condition)
            .with_data_source(source)
    }

    #[test]
    fn insert_without_collision() {
        let mut c = MaterialCollection::new();
        assert_eq!(c.insert(Material::new("Copper")), None);
        assert_eq!(c.names(), ["Copper"]);
    }

    #[test]
    fn collision_moves_incumbent_by_condition() {
        let mut c = MaterialCollection::new();
        c.insert(steel("Annealed", "A"));
        let moved = c.insert(steel("Cold Worked", "B"));

        assert_eq!(moved.as_deref(), Some("Steel (Annealed)"));
        assert_eq!(c.names(), ["Steel", "Steel (Annealed)"]);
        assert_eq!(c.get("Steel").unwrap().condition.as_deref(), Some("Cold Worked"));
        assert_eq!(
            c.get("Steel (Annealed)").unwrap().condition.as_deref(),
            Some("Annealed")
        );
    }

    #[test]
    fn second_collision_appends_data_source() {
        let mut c = MaterialCollection::new();
        c.insert(steel("Annealed", "A"));
        c.insert(steel("Annealed", "B"));
        let moved = c.insert(steel("Annealed", "C"));

        assert_eq!(moved.as_deref(), Some("Steel (Annealed) (B)"));
        assert_eq!(c.len(), 3);
        assert_eq!(c.get("Steel").unwrap().data_source.as_deref(), Some("C"));
        assert_eq!(
            c.get("Steel (Annealed)").unwrap().data_source.as_deref(),
            Some("A")
        );
    }

    #[test]
    fn exhausted_names_get_counter() {
        let mut c = MaterialCollection::new();
        for _ in 0..4 {
            c.insert(steel("Annealed", "A"));
        }
        assert_eq!(c.len(), 4);
        assert!(c.contains("Steel (Annealed) (A) (2)"));
    }

    #[test]
    fn missing_condition_falls_back_to_source() {
        let mut c = MaterialCollection::new();
        c.insert(Material::new("Steel").with_data_source("handbook"));
        let moved = c.insert(Material::new("Steel"));
        assert_eq!(moved.as_deref(), Some("Steel (handbook)"));
    }

    #[test]
    fn remove_refreshes_names() {
        let mut c = MaterialCollection::new();
        c.insert(Material::new("Copper"));
        c.insert(Material::new("Tungsten"));
        c.remove_material("Copper").unwrap();
        assert_eq!(c.names(), ["Tungsten"]);
        assert!(matches!(
            c.remove_material("Copper"),
            Err(ModelError::MaterialNotFound { .. })
        ));
    }

    #[test]
    fn import_collection_merges_with_policy() {
        let mut base = MaterialCollection::with_source("lib");
        base.insert(steel("Annealed", "A"));

        let mut incoming = MaterialCollection::new();
        incoming.insert(steel("Quenched", "B"));
        incoming.record_filename("steel.csv");

        base.import_collection(incoming);
        assert_eq!(base.names(), ["Steel", "Steel (Annealed)"]);
        assert_eq!(base.imported_filenames(), ["steel.csv"]);
    }

    #[test]
    fn deserialize_rebuilds_names() {
        let mut c = MaterialCollection::new();
        c.insert(Material::new("Copper"));
        let json = serde_json::to_string(&c).unwrap();
        assert!(!json.contains("material_names"));
        let back: MaterialCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(back.names(), ["Copper"]);
        assert_eq!(back, c);
    }
}
