//! CSV tables: one material per file, temperature down the first column.
//!
//! ```text
//! Name,Tungsten
//! Temperature [C],Density [kg/m3],Thermal Conductivity [W/m-K]
//! 20,19300,173
//! 500,19200,
//! ```
//!
//! Each remaining column becomes a property holding a `Temperature` parameter
//! and a parameter named after the column. Blank or non-numeric cells drop that
//! temperature from the column's series only.

use crate::{IoError, IoResult};
use mt_model::{Material, Parameter, Property, Value};
use std::io::Read;
use tracing::{debug, warn};

const NAME_CELL: &str = "Name";
const TEMPERATURE: &str = "Temperature";

/// Split a header such as `Density [kg/m3]` into its name and unit.
pub fn split_label(label: &str) -> (&str, Option<&str>) {
    let label = label.trim();
    if let Some(open) = label.rfind('[')
        && label.ends_with(']')
    {
        let unit = label[open + 1..label.len() - 1].trim();
        let name = label[..open].trim_end();
        return (name, (!unit.is_empty()).then_some(unit));
    }
    (label, None)
}

fn units(unit: Option<&str>) -> Vec<String> {
    unit.map(|u| vec![u.to_string()]).unwrap_or_default()
}

/// Read one material from CSV text.
///
/// `fallback_name` names the material when the file has no `Name` row.
pub fn read_table<R: Read>(reader: R, source_name: &str, fallback_name: &str) -> IoResult<Material> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for record in rdr.records() {
        records.push(record?);
    }
    let mut rows = records.iter().enumerate().map(|(i, r)| (i + 1, r));

    let parse_error = |line: usize, message: String| IoError::Parse {
        source_name: source_name.to_string(),
        line,
        message,
    };

    let (mut material, (header_line, header)) = match rows.next() {
        Some((_, first)) if first.get(0) == Some(NAME_CELL) => {
            let name = first
                .get(1)
                .filter(|n| !n.is_empty())
                .unwrap_or(fallback_name);
            let header = rows
                .next()
                .ok_or_else(|| parse_error(2, "missing header row".to_string()))?;
            (Material::new(name), header)
        }
        Some(header) => (Material::new(fallback_name), header),
        None => return Err(parse_error(1, "empty file".to_string())),
    };

    let (first_label, temperature_unit) = split_label(header.get(0).unwrap_or_default());
    if first_label != TEMPERATURE {
        return Err(parse_error(
            header_line,
            format!("first column must be {TEMPERATURE}, found '{first_label}'"),
        ));
    }

    let columns: Vec<(usize, &str, Option<&str>)> = header
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, label)| !label.is_empty())
        .map(|(i, label)| {
            let (name, unit) = split_label(label);
            (i, name, unit)
        })
        .filter(|(_, name, _)| *name != TEMPERATURE)
        .collect();

    let mut series: Vec<(Vec<Value>, Vec<Value>)> = vec![(Vec::new(), Vec::new()); columns.len()];
    for (line, record) in rows {
        if record.iter().all(str::is_empty) {
            continue;
        }
        let Some(temperature) = record.get(0).and_then(|t| t.parse::<f64>().ok()) else {
            warn!(source = source_name, line, "skipping row without a numeric temperature");
            continue;
        };
        for ((column, name, _), (temps, values)) in columns.iter().zip(series.iter_mut()) {
            match record.get(*column).map(Value::parse) {
                Some(Value::Number(v)) => {
                    temps.push(Value::Number(temperature));
                    values.push(Value::Number(v));
                }
                _ => debug!(property = %name, temperature, "no value"),
            }
        }
    }

    for ((_, name, unit), (temps, values)) in columns.into_iter().zip(series) {
        material.insert_property(
            Property::new(name)
                .with_parameter(Parameter::new(TEMPERATURE, units(temperature_unit), temps))
                .with_parameter(Parameter::new(name, units(unit), values)),
        );
    }
    Ok(material)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TUNGSTEN: &str = "\
Name,Tungsten
Temperature [C],Density [kg/m3],Thermal Conductivity
20,19300,173
500,19200,
1000,n/a,118
";

    #[test]
    fn labels_split_into_name_and_unit() {
        assert_eq!(split_label("Density [kg/m3]"), ("Density", Some("kg/m3")));
        assert_eq!(split_label(" Temperature "), ("Temperature", None));
        assert_eq!(split_label("Ratio []"), ("Ratio", None));
    }

    #[test]
    fn columns_become_properties() {
        let m = read_table(TUNGSTEN.as_bytes(), "w.csv", "w").unwrap();
        assert_eq!(m.name, "Tungsten");
        assert_eq!(
            m.property_names().collect::<Vec<_>>(),
            ["Density", "Thermal Conductivity"]
        );
        assert_eq!(m.get_units("Density", "Density").unwrap(), Some("kg/m3"));
        assert_eq!(m.get_units("Density", "Temperature").unwrap(), Some("C"));
        assert_eq!(m.get_units("Thermal Conductivity", "Temperature").unwrap(), Some("C"));
        assert_eq!(
            m.get_units("Thermal Conductivity", "Thermal Conductivity").unwrap(),
            None
        );
    }

    #[test]
    fn blank_and_text_cells_drop_the_point() {
        let m = read_table(TUNGSTEN.as_bytes(), "w.csv", "w").unwrap();
        let temps = m.get_points("Density", "Temperature").unwrap();
        assert_eq!(temps, &[Value::Number(20.0), Value::Number(500.0)]);
        let temps = m.get_points("Thermal Conductivity", "Temperature").unwrap();
        assert_eq!(temps, &[Value::Number(20.0), Value::Number(1000.0)]);
        let k = m
            .get_points("Thermal Conductivity", "Thermal Conductivity")
            .unwrap();
        assert_eq!(k, &[Value::Number(173.0), Value::Number(118.0)]);
    }

    #[test]
    fn missing_name_row_uses_fallback() {
        let m = read_table("Temperature,Density\n20,8960\n".as_bytes(), "cu.csv", "cu").unwrap();
        assert_eq!(m.name, "cu");
        assert!(m.has_parameter("Density", "Density"));
    }

    #[test]
    fn header_must_start_with_temperature() {
        let err = read_table("Name,X\nPressure,Density\n1,2\n".as_bytes(), "x.csv", "x")
            .unwrap_err();
        assert!(matches!(err, IoError::Parse { line: 2, .. }));
    }
}
