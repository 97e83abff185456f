//! JSON and YAML persistence of whole collections.

use crate::IoResult;
use mt_model::MaterialCollection;
use std::path::Path;

pub fn load_json(path: &Path) -> IoResult<MaterialCollection> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_json(path: &Path, collection: &MaterialCollection) -> IoResult<()> {
    let content = serde_json::to_string_pretty(collection)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_yaml(path: &Path) -> IoResult<MaterialCollection> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

pub fn save_yaml(path: &Path, collection: &MaterialCollection) -> IoResult<()> {
    let content = serde_yaml::to_string(collection)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mt_model::{Material, Value};

    fn library() -> MaterialCollection {
        let mut steel = Material::new("Steel").with_condition("Annealed");
        steel.set_value(
            "Elasticity",
            vec![20.0, 500.0],
            vec![210e9, 180e9],
            "Temperature",
            Some("Young's Modulus"),
        );
        steel.extra.insert("Filename".into(), "steel.xlsx".into());
        let mut lib = MaterialCollection::with_source("handbook");
        lib.insert(steel);
        lib
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lib.json");
        let lib = library();
        save_json(&path, &lib).unwrap();
        assert_eq!(load_json(&path).unwrap(), lib);
    }

    #[test]
    fn yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lib.yaml");
        let lib = library();
        save_yaml(&path, &lib).unwrap();
        let loaded = load_yaml(&path).unwrap();
        assert_eq!(loaded, lib);
        assert_eq!(
            loaded.get("Steel").unwrap().get_points("Elasticity", "Temperature").unwrap()[1],
            Value::Number(500.0)
        );
    }

    #[test]
    fn json_accepts_integers_and_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hand.json");
        std::fs::write(
            &path,
            r#"{"materials": {"Copper": {"name": "Copper", "properties": {"Density": {
                "name": "Density",
                "parameters": {
                    "Temperature": {"name": "Temperature", "units": ["C"], "values": [20, null]},
                    "Density": {"name": "Density", "units": ["kg/m3"], "values": [8960, 8900]}
                }}}}}}"#,
        )
        .unwrap();
        let lib = load_json(&path).unwrap();
        assert_eq!(lib.names(), ["Copper"]);
        let temps = lib.get("Copper").unwrap().get_points("Density", "Temperature").unwrap();
        assert_eq!(temps, &[Value::Number(20.0), Value::Missing]);
    }
}
