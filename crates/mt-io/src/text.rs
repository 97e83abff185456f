//! Plain-text material sheets.
//!
//! ```text
//! Material Name = Tungsten
//! Condition = Annealed
//! Density = 19300 [kg/m3]
//! Supplier = Plansee
//! ```
//!
//! `Key = number [units]` lines become single-valued properties; any other
//! `Key = text` line is metadata. Lines starting with `#` are ignored.

use crate::csv_table::split_label;
use crate::{IoError, IoResult};
use mt_model::{Material, MaterialCollection, Parameter, Property, Value};
use std::io::BufRead;

const MATERIAL_NAME: &str = "Material Name";

pub fn read_text<R: BufRead>(reader: R, source_name: &str) -> IoResult<MaterialCollection> {
    let mut collection = MaterialCollection::new();
    let mut current: Option<Material> = None;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parse_error = |message: String| IoError::Parse {
            source_name: source_name.to_string(),
            line: i + 1,
            message,
        };

        let (key, value) = line
            .split_once('=')
            .map(|(k, v)| (k.trim(), v.trim()))
            .ok_or_else(|| parse_error(format!("expected 'key = value', found '{line}'")))?;

        if key == MATERIAL_NAME {
            if let Some(done) = current.replace(Material::new(value)) {
                collection.insert(done);
            }
            continue;
        }
        let material = current
            .as_mut()
            .ok_or_else(|| parse_error(format!("'{key}' appears before '{MATERIAL_NAME}'")))?;
        apply_line(material, key, value);
    }

    if let Some(done) = current {
        collection.insert(done);
    }
    Ok(collection)
}

fn apply_line(material: &mut Material, key: &str, value: &str) {
    let (number, unit) = split_label(value);
    if let Value::Number(n) = Value::parse(number) {
        let mut property = Property::new(key);
        property.self_parameter = Some(Parameter::new(
            key,
            unit.map(|u| vec![u.to_string()]).unwrap_or_default(),
            vec![Value::Number(n)],
        ));
        material.insert_property(property);
        return;
    }
    match key {
        "Condition" => material.condition = Some(value.to_string()),
        "Data Source" | "DataSource" => material.data_source = Some(value.to_string()),
        "Description" => material.description = Some(value.to_string()),
        _ => {
            material.extra.insert(key.to_string(), value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mt_model::{LookupQuery, ModelError};

    const SHEET: &str = "\
# supplier sheet
Material Name = Tungsten
Condition = Annealed
Density = 19300 [kg/m3]
Melting Point = 3422
Supplier = Plansee

Material Name = Copper
Data Source = handbook
Density = 8960 [kg/m3]
";

    #[test]
    fn numeric_lines_become_properties() {
        let c = read_text(SHEET.as_bytes(), "sheet.txt").unwrap();
        assert_eq!(c.names(), ["Copper", "Tungsten"]);

        let w = c.get("Tungsten").unwrap();
        assert_eq!(w.condition.as_deref(), Some("Annealed"));
        assert_eq!(w.get_units("Density", "Density").unwrap(), Some("kg/m3"));
        assert_eq!(w.get_points("Melting Point", "Melting Point").unwrap(), &[Value::Number(3422.0)]);
        assert!(matches!(
            w.get_value("Density", &LookupQuery::default()),
            Err(ModelError::ParameterNotFound { .. })
        ));
    }

    #[test]
    fn other_lines_become_metadata() {
        let c = read_text(SHEET.as_bytes(), "sheet.txt").unwrap();
        assert_eq!(
            c.get("Tungsten").unwrap().extra.get("Supplier").map(String::as_str),
            Some("Plansee")
        );
        assert_eq!(c.get("Copper").unwrap().data_source.as_deref(), Some("handbook"));
    }

    #[test]
    fn lines_need_a_material_and_an_equals_sign() {
        let err = read_text("Density = 1\n".as_bytes(), "a.txt").unwrap_err();
        assert!(matches!(err, IoError::Parse { line: 1, .. }));

        let err = read_text("Material Name = X\njust words\n".as_bytes(), "b.txt").unwrap_err();
        assert!(matches!(err, IoError::Parse { line: 2, .. }));
    }
}
