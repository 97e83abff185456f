//! Derived-quantity calculators built on the lookup engine.
//!
//! Every calculator checks that the material carries the properties it needs
//! before computing, and names the first missing one in a
//! [`ModelError::Precondition`].

use crate::error::{ModelError, ModelResult};
use crate::lookup::{DEFAULT_INDEPENDENT, LookupQuery};
use crate::material::Material;
use crate::parameter::Parameter;
use crate::property::Property;
use mt_core::{
    Length, Real, Temperature, TemperatureScale, ensure_finite, k, kelvin, labels_agree, meters,
};
use tracing::{debug, warn};

/// Name of the derived thermal stress figure of merit property.
pub const THERMAL_STRESS_FOM: &str = "Thermal Stress Figure of Merit";

/// Short alias accepted wherever the full name is.
pub const THERMAL_STRESS_FOM_ALIAS: &str = "Thermal Stress FOM";

/// Temperature used when a figure of merit is requested without one.
pub const DEFAULT_FOM_TEMPERATURE: Real = 20.0;

/// Reference (stress-free) temperature for mismatch stress, in kelvin.
pub const MISMATCH_REFERENCE_K: Real = 293.0;

const ULTIMATE_TENSILE_STRENGTH: &str = "Ultimate Tensile Strength";
const THERMAL_CONDUCTIVITY: &str = "Thermal Conductivity";
const THERMAL_EXPANSION: &str = "Coefficient of Thermal Expansion";
const ELASTICITY: &str = "Elasticity";
const POISSONS_RATIO: &str = "Poisson's Ratio";
const YOUNGS_MODULUS: &str = "Young's Modulus";

/// (property, parameter) pairs needed by the figure of merit.
const FOM_INPUTS: [(&str, &str); 5] = [
    (ULTIMATE_TENSILE_STRENGTH, ULTIMATE_TENSILE_STRENGTH),
    (THERMAL_CONDUCTIVITY, THERMAL_CONDUCTIVITY),
    (THERMAL_EXPANSION, THERMAL_EXPANSION),
    (ELASTICITY, POISSONS_RATIO),
    (ELASTICITY, YOUNGS_MODULUS),
];

const MISMATCH_INPUTS: [(&str, &str); 4] = [
    (THERMAL_EXPANSION, THERMAL_EXPANSION),
    (ELASTICITY, POISSONS_RATIO),
    (ELASTICITY, YOUNGS_MODULUS),
    (THERMAL_CONDUCTIVITY, THERMAL_CONDUCTIVITY),
];

const MISMATCH_ITERATIONS: usize = 3;
const MISMATCH_TOLERANCE: Real = 200.0;

pub(crate) fn is_thermal_stress_fom(name: &str) -> bool {
    name == THERMAL_STRESS_FOM || name == THERMAL_STRESS_FOM_ALIAS
}

fn require(material: &Material, inputs: &[(&str, &str)]) -> ModelResult<()> {
    for &(property, parameter) in inputs {
        if !material.has_property(property) {
            return Err(ModelError::Precondition {
                material: material.name.clone(),
                missing: format!("property '{property}'"),
            });
        }
        if !material.has_parameter(property, parameter) {
            return Err(ModelError::Precondition {
                material: material.name.clone(),
                missing: format!("parameter '{parameter}' of '{property}'"),
            });
        }
    }
    Ok(())
}

/// Thermal stress figure of merit `M = σ_UTS k (1 - ν) / (α E)` at `temperature`.
///
/// `temperature` is in the units the material tabulates its data in.
pub fn thermal_stress_fom(material: &Material, temperature: Real) -> ModelResult<Real> {
    require(material, &FOM_INPUTS)?;

    let value = |property: &str, parameter: &str| {
        material.value_within(property, &LookupQuery::at(temperature).dependent(parameter))
    };
    let uts = value(ULTIMATE_TENSILE_STRENGTH, ULTIMATE_TENSILE_STRENGTH)?;
    let k_th = value(THERMAL_CONDUCTIVITY, THERMAL_CONDUCTIVITY)?;
    let alpha = value(THERMAL_EXPANSION, THERMAL_EXPANSION)?;
    let nu = value(ELASTICITY, POISSONS_RATIO)?;
    let e = value(ELASTICITY, YOUNGS_MODULUS)?;

    let m = (uts * k_th * (1.0 - nu)) / (alpha * e);
    Ok(ensure_finite(m, "thermal stress figure of merit")?)
}

/// Tabulate the figure of merit over `temperatures` and store it on the material.
///
/// Temperatures where an input is unavailable are skipped. Fails when no
/// temperature could be evaluated.
pub fn populate_thermal_stress_fom(
    material: &mut Material,
    temperatures: impl IntoIterator<Item = Real>,
) -> ModelResult<&Property> {
    require(material, &FOM_INPUTS)?;

    let mut temps = Vec::new();
    let mut foms = Vec::new();
    for t in temperatures {
        match thermal_stress_fom(material, t) {
            Ok(m) => {
                temps.push(t);
                foms.push(m);
            }
            Err(err) => debug!(material = %material.name, t, %err, "skipping figure of merit point"),
        }
    }
    if temps.is_empty() {
        return Err(ModelError::Precondition {
            material: material.name.clone(),
            missing: "thermal stress figure of merit could not be evaluated at any temperature"
                .to_string(),
        });
    }

    let temperature_unit = material
        .get_units(ELASTICITY, DEFAULT_INDEPENDENT)
        .ok()
        .flatten()
        .unwrap_or("C")
        .to_string();
    let property = Property::new(THERMAL_STRESS_FOM)
        .with_source("calculated")
        .with_parameter(Parameter::numeric(DEFAULT_INDEPENDENT, temperature_unit, temps))
        .with_parameter(Parameter::numeric(THERMAL_STRESS_FOM, "-", foms));
    material.insert_property(property);
    material.property(THERMAL_STRESS_FOM)
}

/// Loading and geometry of a bonded armour/substructure pair.
#[derive(Debug, Clone, Copy)]
pub struct MismatchInputs {
    pub armour_thickness: Length,
    pub substructure_thickness: Length,
    /// Incident heat flux [W/m²]
    pub heat_flux_w_per_m2: Real,
    /// Convective heat transfer coefficient [W/(m²·K)]
    pub htc_w_per_m2k: Real,
    pub coolant_temperature: Temperature,
    pub reference_temperature: Temperature,
}

impl MismatchInputs {
    pub fn new(
        armour_thickness: Length,
        substructure_thickness: Length,
        heat_flux_w_per_m2: Real,
        htc_w_per_m2k: Real,
        coolant_temperature: Temperature,
    ) -> Self {
        Self {
            armour_thickness,
            substructure_thickness,
            heat_flux_w_per_m2,
            htc_w_per_m2k,
            coolant_temperature,
            reference_temperature: k(MISMATCH_REFERENCE_K),
        }
    }
}

/// Scale a material tabulates a property against; kelvin when unlabelled.
fn temperature_scale(material: &Material, property: &str) -> TemperatureScale {
    let label = material
        .get_units(property, DEFAULT_INDEPENDENT)
        .ok()
        .flatten();
    match label.map(TemperatureScale::from_label) {
        Some(Ok(scale)) => scale,
        Some(Err(err)) => {
            warn!(material = %material.name, property, %err, "assuming kelvin");
            TemperatureScale::Kelvin
        }
        None => TemperatureScale::Kelvin,
    }
}

fn value_at(
    material: &Material,
    property: &str,
    parameter: &str,
    t: Temperature,
) -> ModelResult<Real> {
    let at = temperature_scale(material, property).value(t);
    material.value_within(
        property,
        &LookupQuery::at(at)
            .dependent(parameter)
            .tolerance(MISMATCH_TOLERANCE),
    )
}

struct LayerProps {
    alpha: Real,
    nu: Real,
    e: Real,
    k_th: Real,
}

fn layer_props(material: &Material, t: Temperature) -> ModelResult<LayerProps> {
    Ok(LayerProps {
        alpha: value_at(material, THERMAL_EXPANSION, THERMAL_EXPANSION, t)?,
        nu: value_at(material, ELASTICITY, POISSONS_RATIO, t)?,
        e: value_at(material, ELASTICITY, YOUNGS_MODULUS, t)?,
        k_th: value_at(material, THERMAL_CONDUCTIVITY, THERMAL_CONDUCTIVITY, t)?,
    })
}

/// Thermal mismatch stress [Pa] between an armour layer and its substructure.
///
/// Layer mean temperatures are found by fixed-point iteration, re-evaluating the
/// temperature-dependent properties at the previous estimate:
///
/// ```text
/// T1 = Tc + q/h + q t1 / (2 k1)
/// T2 = Tc + q/h + q t1 / k1 + q t2 / (2 k2)
/// σ  = (α2 (T2 - Tref) - α1 (T1 - Tref)) / ((1 - ν2) t1 / (t2 E2) + (1 - ν1) / E1)
/// ```
pub fn thermal_mismatch_stress(
    armour: &Material,
    substructure: &Material,
    inputs: &MismatchInputs,
) -> ModelResult<Real> {
    require(armour, &MISMATCH_INPUTS)?;
    require(substructure, &MISMATCH_INPUTS)?;

    let q = inputs.heat_flux_w_per_m2;
    let h = inputs.htc_w_per_m2k;
    if h <= 0.0 {
        return Err(ModelError::InvalidArgument {
            what: format!("heat transfer coefficient must be positive, got {h}"),
        });
    }
    let t1 = meters(inputs.armour_thickness);
    let t2 = meters(inputs.substructure_thickness);
    let t_coolant = kelvin(inputs.coolant_temperature);
    let t_ref = kelvin(inputs.reference_temperature);

    let mean_temperatures = |p1: &LayerProps, p2: &LayerProps| {
        let surface = t_coolant + q / h;
        (
            surface + (q * t1) / (2.0 * p1.k_th),
            surface + (q * t1) / p1.k_th + (q * t2) / (2.0 * p2.k_th),
        )
    };

    let mut p1 = layer_props(armour, k(t_coolant))?;
    let mut p2 = layer_props(substructure, k(t_coolant))?;
    let (mut t1_mean, mut t2_mean) = mean_temperatures(&p1, &p2);
    for _ in 1..MISMATCH_ITERATIONS {
        p1 = layer_props(armour, k(t1_mean))?;
        p2 = layer_props(substructure, k(t2_mean))?;
        (t1_mean, t2_mean) = mean_temperatures(&p1, &p2);
    }
    debug!(t1_mean, t2_mean, "layer mean temperatures [K]");

    let stress = (p2.alpha * (t2_mean - t_ref) - p1.alpha * (t1_mean - t_ref))
        / (((1.0 - p2.nu) * t1) / (t2 * p2.e) + (1.0 - p1.nu) / p1.e);
    Ok(ensure_finite(stress, "thermal mismatch stress")?)
}

/// True when every unit label of every parameter agrees.
pub fn check_units(parameters: &[&Parameter]) -> bool {
    labels_agree(
        parameters
            .iter()
            .flat_map(|p| p.units.iter().map(String::as_str)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use mt_core::{degc, mm};

    fn tungsten() -> Material {
        let mut m = Material::new("Tungsten").with_data_source("handbook");
        m.set_value(
            ULTIMATE_TENSILE_STRENGTH,
            vec![20.0, 500.0, 1000.0],
            vec![500e6, 200e6, 100e6],
            "Temperature",
            None,
        );
        m.set_value(
            THERMAL_CONDUCTIVITY,
            vec![20.0, 1000.0],
            vec![173.0, 118.0],
            "Temperature",
            None,
        );
        m.set_value(
            THERMAL_EXPANSION,
            vec![20.0, 1000.0],
            vec![4.5e-6, 4.7e-6],
            "Temperature",
            None,
        );
        m.set_value(ELASTICITY, vec![20.0, 1000.0], vec![0.28, 0.29], "Temperature", Some(POISSONS_RATIO));
        m.set_value(ELASTICITY, vec![20.0, 1000.0], vec![398e9, 370e9], "Temperature", Some(YOUNGS_MODULUS));
        m
    }

    #[test]
    fn fom_at_stored_temperature() {
        let m = tungsten();
        let got = thermal_stress_fom(&m, 20.0).unwrap();
        let expected = (500e6 * 173.0 * (1.0 - 0.28)) / (4.5e-6 * 398e9);
        assert!((got - expected).abs() < 1e-9 * expected);
    }

    #[test]
    fn get_value_computes_reserved_name() {
        let m = tungsten();
        let direct = thermal_stress_fom(&m, 500.0).unwrap();
        for name in [THERMAL_STRESS_FOM, THERMAL_STRESS_FOM_ALIAS] {
            let via_lookup = m.get_value(name, &LookupQuery::at(500.0)).unwrap();
            assert_eq!(via_lookup, Some(Value::Number(direct)));
        }
    }

    #[test]
    fn get_value_fom_rejects_other_axes() {
        let m = tungsten();
        let q = LookupQuery::at(500.0).independent("Pressure");
        assert!(matches!(
            m.get_value(THERMAL_STRESS_FOM, &q),
            Err(ModelError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn get_value_fom_rejects_other_dependents() {
        let m = tungsten();
        let q = LookupQuery::at(500.0).dependent(YOUNGS_MODULUS);
        assert!(matches!(
            m.get_value(THERMAL_STRESS_FOM, &q),
            Err(ModelError::InvalidArgument { .. })
        ));
        let q = LookupQuery::at(500.0).dependent(THERMAL_STRESS_FOM_ALIAS);
        assert!(m.get_number(THERMAL_STRESS_FOM, &q).unwrap().is_some());
    }

    #[test]
    fn fom_missing_input_is_precondition_failure() {
        let mut m = tungsten();
        m.remove_property(THERMAL_CONDUCTIVITY);
        let err = thermal_stress_fom(&m, 20.0).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Precondition { ref missing, .. } if missing.contains(THERMAL_CONDUCTIVITY)
        ));
    }

    #[test]
    fn fom_missing_parameter_is_precondition_failure() {
        let mut m = Material::new("Partial");
        m.set_value(ELASTICITY, vec![20.0], vec![0.3], "Temperature", Some(POISSONS_RATIO));
        for (p, _) in FOM_INPUTS.iter().filter(|(p, _)| *p != ELASTICITY) {
            m.set_value(p, vec![20.0], vec![1.0], "Temperature", None);
        }
        let err = thermal_stress_fom(&m, 20.0).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Precondition { ref missing, .. } if missing.contains(YOUNGS_MODULUS)
        ));
    }

    #[test]
    fn populate_skips_unreachable_temperatures() {
        let mut m = tungsten();
        let prop = populate_thermal_stress_fom(&mut m, [0.0, 500.0, 5000.0]).unwrap();
        let temps = prop.parameter("Temperature").unwrap().numbers().unwrap();
        assert_eq!(temps, vec![0.0, 500.0]);
        assert_eq!(prop.data_source.as_deref(), Some("calculated"));
        assert!(m.has_parameter(THERMAL_STRESS_FOM, THERMAL_STRESS_FOM));
    }

    #[test]
    fn populate_fails_when_nothing_evaluates() {
        let mut m = tungsten();
        let err = populate_thermal_stress_fom(&mut m, [5000.0, 6000.0]).unwrap_err();
        assert!(matches!(err, ModelError::Precondition { .. }));
        assert!(!m.has_property(THERMAL_STRESS_FOM));
    }

    fn layer(name: &str, alpha: Real, k_th: Real) -> Material {
        let mut m = Material::new(name);
        let temps = vec![250.0, 2000.0];
        m.set_value(THERMAL_EXPANSION, temps.clone(), vec![alpha, alpha], "Temperature", None);
        m.set_value(THERMAL_CONDUCTIVITY, temps.clone(), vec![k_th, k_th], "Temperature", None);
        m.set_value(ELASTICITY, temps.clone(), vec![0.3, 0.3], "Temperature", Some(POISSONS_RATIO));
        m.set_value(ELASTICITY, temps, vec![200e9, 200e9], "Temperature", Some(YOUNGS_MODULUS));
        m
    }

    #[test]
    fn mismatch_stress_matches_closed_form_for_constant_properties() {
        let armour = layer("W", 4.5e-6, 150.0);
        let sub = layer("CuCrZr", 17e-6, 350.0);
        let inputs = MismatchInputs::new(mm(5.0), mm(10.0), 1e6, 50_000.0, k(373.0));

        let got = thermal_mismatch_stress(&armour, &sub, &inputs).unwrap();

        let (q, h, t1, t2, tc, tr) = (1e6, 50_000.0, 0.005, 0.010, 373.0, 293.0);
        let t1m = tc + q / h + q * t1 / (2.0 * 150.0);
        let t2m = tc + q / h + q * t1 / 150.0 + q * t2 / (2.0 * 350.0);
        let expected = (17e-6 * (t2m - tr) - 4.5e-6 * (t1m - tr))
            / ((0.7 * t1) / (t2 * 200e9) + 0.7 / 200e9);
        assert!((got - expected).abs() < 1e-6 * expected.abs());
    }

    #[test]
    fn mismatch_uses_tabulated_temperature_scale() {
        let mut armour = Material::new("W");
        let celsius = |name: &str, parameter: &str, v: Real| {
            Property::new(name)
                .with_parameter(Parameter::numeric("Temperature", "C", [0.0, 100.0]))
                .with_parameter(Parameter::numeric(parameter, "-", [v, v]))
        };
        armour.insert_property(celsius(THERMAL_EXPANSION, THERMAL_EXPANSION, 4.5e-6));
        armour.insert_property(celsius(THERMAL_CONDUCTIVITY, THERMAL_CONDUCTIVITY, 150.0));
        armour.insert_property(
            celsius(ELASTICITY, POISSONS_RATIO, 0.3)
                .with_parameter(Parameter::numeric(YOUNGS_MODULUS, "Pa", [200e9, 200e9])),
        );
        let sub = layer("CuCrZr", 17e-6, 350.0);

        // ~375 K is ~102 C: within tolerance of the Celsius table, far outside it in kelvin.
        let inputs = MismatchInputs::new(mm(1.0), mm(10.0), 1e5, 50_000.0, degc(100.0));
        assert!(thermal_mismatch_stress(&armour, &sub, &inputs).is_ok());
    }

    #[test]
    fn mismatch_requires_inputs() {
        let armour = layer("W", 4.5e-6, 150.0);
        let sub = Material::new("Empty");
        let inputs = MismatchInputs::new(mm(5.0), mm(10.0), 1e6, 50_000.0, k(373.0));
        assert!(matches!(
            thermal_mismatch_stress(&armour, &sub, &inputs),
            Err(ModelError::Precondition { material, .. }) if material == "Empty"
        ));
    }

    #[test]
    fn check_units_compares_all_labels() {
        let a = Parameter::numeric("A", "Pa", [1.0]);
        let b = Parameter::numeric("B", "Pa", [2.0]);
        let c = Parameter::numeric("C", "MPa", [3.0]);
        assert!(check_units(&[&a, &b]));
        assert!(!check_units(&[&a, &b, &c]));
    }
}
