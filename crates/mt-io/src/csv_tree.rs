//! CSV trees: a whole collection as an indented listing.
//!
//! ```text
//! Material Name,Steel
//! ,Condition,Annealed
//! ,Property Name,Elasticity
//! ,,DataSource,handbook
//! ,,Parameter Name,Temperature
//! ,,,Parameter Values,20,500
//! ,,,Parameter Units,C
//! ```
//!
//! The `Material Name` row carries the collection key. A material stored under
//! a different key (an incumbent moved aside on import) adds a `,Name,` row with
//! its own name. A property's self-parameter is written as `Self Parameter Name`.
//!
//! Cells are plain text, so reading normalizes values: a text value that parses
//! as a number comes back as a number, surrounding whitespace is trimmed, and an
//! empty text value comes back missing.

use crate::{IoError, IoResult};
use mt_model::{
    Material, MaterialCollection, MaterialEntry, Parameter, Property, PropertyEntry, Value,
};
use std::io::{Read, Write};

const MATERIAL_NAME: &str = "Material Name";
const PROPERTY_NAME: &str = "Property Name";
const PARAMETER_NAME: &str = "Parameter Name";
const SELF_PARAMETER_NAME: &str = "Self Parameter Name";
const PARAMETER_VALUES: &str = "Parameter Values";
const PARAMETER_UNITS: &str = "Parameter Units";
const NAME: &str = "Name";

/// True if `content` starts with a `Material Name` row.
pub fn is_tree(content: &str) -> bool {
    content
        .trim_start_matches('\u{feff}')
        .trim_start()
        .starts_with(MATERIAL_NAME)
}

pub fn write_tree<W: Write>(writer: W, collection: &MaterialCollection) -> IoResult<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    for (key, material) in collection.iter() {
        wtr.write_record([MATERIAL_NAME, key])?;
        if material.name != key {
            wtr.write_record(["", NAME, material.name.as_str()])?;
        }
        for entry in material.entries() {
            match entry {
                MaterialEntry::Metadata(key, value) => wtr.write_record(["", key, value])?,
                MaterialEntry::Property(property) => write_property(&mut wtr, property)?,
            }
        }
    }
    wtr.flush()?;
    Ok(())
}

fn write_property<W: Write>(wtr: &mut csv::Writer<W>, property: &Property) -> IoResult<()> {
    wtr.write_record(["", PROPERTY_NAME, property.name.as_str()])?;
    for entry in property.entries() {
        match entry {
            PropertyEntry::Metadata(key, value) => wtr.write_record(["", "", key, value])?,
            PropertyEntry::Parameter(parameter) => {
                let label = match &property.self_parameter {
                    Some(own) if std::ptr::eq(own, parameter) => SELF_PARAMETER_NAME,
                    _ => PARAMETER_NAME,
                };
                wtr.write_record(["", "", label, parameter.name.as_str()])?;
                let values = parameter.values.iter().map(Value::to_string);
                wtr.write_record(
                    ["", "", "", PARAMETER_VALUES]
                        .map(String::from)
                        .into_iter()
                        .chain(values),
                )?;
                wtr.write_record(
                    ["", "", "", PARAMETER_UNITS]
                        .iter()
                        .copied()
                        .chain(parameter.units.iter().map(String::as_str)),
                )?;
            }
        }
    }
    Ok(())
}

/// Read a collection written by [`write_tree`].
pub fn read_tree<R: Read>(reader: R, source_name: &str) -> IoResult<MaterialCollection> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut builder = TreeBuilder::default();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let cells: Vec<&str> = record.iter().collect();
        builder
            .row(&cells)
            .map_err(|message| IoError::Parse {
                source_name: source_name.to_string(),
                line: i + 1,
                message,
            })?;
    }
    Ok(builder.finish())
}

#[derive(Default)]
struct TreeBuilder {
    collection: MaterialCollection,
    /// Collection key and the material being filled.
    material: Option<(String, Material)>,
    property: Option<Property>,
    parameter: Option<Parameter>,
    parameter_is_self: bool,
}

impl TreeBuilder {
    fn row(&mut self, cells: &[&str]) -> Result<(), String> {
        let cell = |i: usize| cells.get(i).copied().unwrap_or_default();
        let rest = |i: usize| cells.iter().skip(i);

        match (cell(0), cell(1), cell(2), cell(3)) {
            _ if cells.iter().all(|c| c.trim().is_empty()) => {}
            (MATERIAL_NAME, name, _, _) => {
                self.close_material();
                self.material = Some((name.to_string(), Material::new(name)));
            }
            ("", PROPERTY_NAME, name, _) => {
                self.close_property();
                self.material_mut()?;
                self.property = Some(Property::new(name));
            }
            ("", "", label @ (PARAMETER_NAME | SELF_PARAMETER_NAME), name) => {
                self.close_parameter();
                self.property_mut()?;
                self.parameter = Some(Parameter::new(name, Vec::new(), Vec::new()));
                self.parameter_is_self = label == SELF_PARAMETER_NAME;
            }
            ("", "", "", PARAMETER_VALUES) => {
                self.parameter_mut()?
                    .set_values(rest(4).map(|c| Value::parse(c)));
            }
            ("", "", "", PARAMETER_UNITS) => {
                self.parameter_mut()?.units = rest(4)
                    .filter(|c| !c.is_empty())
                    .map(|c| c.to_string())
                    .collect();
            }
            ("", "", key, value) if !key.is_empty() => {
                self.close_parameter();
                let property = self.property_mut()?;
                match key {
                    "DataSource" => property.data_source = Some(value.to_string()),
                    "Comments" => property.comments = Some(value.to_string()),
                    other => return Err(format!("unknown property field '{other}'")),
                }
            }
            ("", key, value, _) if !key.is_empty() => {
                self.close_property();
                let material = self.material_mut()?;
                match key {
                    NAME => material.name = value.to_string(),
                    "Condition" => material.condition = Some(value.to_string()),
                    "DataSource" => material.data_source = Some(value.to_string()),
                    "Description" => material.description = Some(value.to_string()),
                    other => {
                        material.extra.insert(other.to_string(), value.to_string());
                    }
                }
            }
            (first, ..) => return Err(format!("unexpected row starting with '{first}'")),
        }
        Ok(())
    }

    fn material_mut(&mut self) -> Result<&mut Material, String> {
        self.material
            .as_mut()
            .map(|(_, material)| material)
            .ok_or_else(|| format!("row outside a '{MATERIAL_NAME}' block"))
    }

    fn property_mut(&mut self) -> Result<&mut Property, String> {
        self.property
            .as_mut()
            .ok_or_else(|| format!("row outside a '{PROPERTY_NAME}' block"))
    }

    fn parameter_mut(&mut self) -> Result<&mut Parameter, String> {
        self.parameter
            .as_mut()
            .ok_or_else(|| format!("row outside a '{PARAMETER_NAME}' block"))
    }

    fn close_parameter(&mut self) {
        let is_self = std::mem::take(&mut self.parameter_is_self);
        if let (Some(parameter), Some(property)) = (self.parameter.take(), self.property.as_mut()) {
            if is_self {
                property.self_parameter = Some(parameter);
            } else {
                property.insert_parameter(parameter);
            }
        }
    }

    fn close_property(&mut self) {
        self.close_parameter();
        if let (Some(property), Some((_, material))) = (self.property.take(), self.material.as_mut()) {
            material.insert_property(property);
        }
    }

    fn close_material(&mut self) {
        self.close_property();
        if let Some((key, material)) = self.material.take() {
            self.collection.add_material(material, key);
        }
    }

    fn finish(mut self) -> MaterialCollection {
        self.close_material();
        self.collection
    }
}
