//! mt-model: material-property data model and lookup engine.
//!
//! Provides:
//! - The `MaterialCollection → Material → Property → Parameter` hierarchy
//! - `Material::get_value`, nearest and piecewise-linear lookup with tolerance
//! - Rename-the-incumbent merge policy for colliding material names
//! - Derived-quantity calculators (thermal stress figure of merit, mismatch stress)
//! - Export id index for writers that need stable `pr{i}`/`pa{i}` ids
//!
//! # Example
//!
//! ```
//! use mt_model::{LookupQuery, Material, Method, Value};
//!
//! let mut steel = Material::new("Steel");
//! steel.set_value(
//!     "Elasticity",
//!     vec![20.0, 500.0, 1000.0],
//!     vec![210e9, 180e9, 150e9],
//!     "Temperature",
//!     Some("Young's Modulus"),
//! );
//!
//! let query = LookupQuery::at(500.0).dependent("Young's Modulus");
//! let e = steel.get_value("Elasticity", &query).unwrap();
//! assert_eq!(e, Some(Value::Number(180e9)));
//!
//! let miss = steel
//!     .get_value("Elasticity", &query.clone().at_value(550.0).method(Method::Nearest).tolerance(10.0))
//!     .unwrap();
//! assert_eq!(miss, None);
//! ```

pub mod calculators;
pub mod collection;
pub mod error;
pub mod ids;
pub mod lookup;
pub mod material;
pub mod parameter;
pub mod property;
pub mod value;

// Re-exports for ergonomics
pub use calculators::{
    MismatchInputs, THERMAL_STRESS_FOM, check_units, populate_thermal_stress_fom,
    thermal_mismatch_stress, thermal_stress_fom,
};
pub use collection::MaterialCollection;
pub use error::{ModelError, ModelResult};
pub use ids::{ExportId, ExportIds, ExportKind};
pub use lookup::{LookupQuery, Method};
pub use material::{Material, MaterialEntry};
pub use parameter::Parameter;
pub use property::{Property, PropertyEntry};
pub use value::Value;
