//! Stable ids for property and parameter names, as used by MatML-style writers.

use crate::collection::MaterialCollection;
use crate::material::MaterialEntry;
use crate::property::PropertyEntry;
use core::fmt;
use core::num::NonZeroU32;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum ExportKind {
    Property,
    Parameter,
}

/// Compact id such as `pr0` or `pa3`.
///
/// Stores index+1 so `Option<ExportId>` stays the same size.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExportId {
    kind: ExportKind,
    index: NonZeroU32,
}

impl ExportId {
    pub fn new(kind: ExportKind, index: u32) -> Self {
        Self {
            kind,
            index: NonZeroU32::MIN.saturating_add(index),
        }
    }

    pub fn kind(self) -> ExportKind {
        self.kind
    }

    pub fn index(self) -> u32 {
        self.index.get() - 1
    }
}

impl fmt::Debug for ExportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExportId({self})")
    }
}

impl fmt::Display for ExportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            ExportKind::Property => "pr",
            ExportKind::Parameter => "pa",
        };
        write!(f, "{prefix}{}", self.index())
    }
}

/// Deduplicated property and parameter names of a collection, in first-seen order.
///
/// Derived on demand from a collection; it is not kept in sync with later edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportIds {
    properties: Vec<String>,
    parameters: Vec<String>,
}

impl ExportIds {
    pub fn generate(collection: &MaterialCollection) -> Self {
        let mut ids = Self::default();
        for (_, material) in collection.iter() {
            for entry in material.entries() {
                let MaterialEntry::Property(property) = entry else {
                    continue;
                };
                push_unique(&mut ids.properties, &property.name);
                for entry in property.entries() {
                    if let PropertyEntry::Parameter(parameter) = entry {
                        push_unique(&mut ids.parameters, &parameter.name);
                    }
                }
            }
        }
        ids
    }

    pub fn property_id(&self, name: &str) -> Option<ExportId> {
        position(&self.properties, name).map(|i| ExportId::new(ExportKind::Property, i))
    }

    pub fn parameter_id(&self, name: &str) -> Option<ExportId> {
        position(&self.parameters, name).map(|i| ExportId::new(ExportKind::Parameter, i))
    }

    pub fn properties(&self) -> impl Iterator<Item = (ExportId, &str)> {
        enumerate(&self.properties, ExportKind::Property)
    }

    pub fn parameters(&self) -> impl Iterator<Item = (ExportId, &str)> {
        enumerate(&self.parameters, ExportKind::Parameter)
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}

fn position(names: &[String], name: &str) -> Option<u32> {
    names
        .iter()
        .position(|n| n == name)
        .and_then(|i| u32::try_from(i).ok())
}

fn enumerate(names: &[String], kind: ExportKind) -> impl Iterator<Item = (ExportId, &str)> {
    (0_u32..)
        .zip(names)
        .map(move |(i, name)| (ExportId::new(kind, i), name.as_str()))
}
