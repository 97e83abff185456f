//! Value lookup and interpolation over a property's parameter series.
//!
//! A lookup resolves one dependent parameter at one value of an independent
//! parameter (conventionally "Temperature"):
//!
//! 1. No query value: the first stored dependent value.
//! 2. Exact hit on a stored independent value: the co-indexed dependent value.
//! 3. Otherwise by [`Method`]:
//!    - `Nearest`: the closest stored point, or `Ok(None)` when it lies further
//!      than `tolerance` away.
//!    - `Linear`: interpolation between the bracketing points. Below the first
//!      or above the last point the end value is used when the gap is within
//!      `tolerance`, otherwise [`ModelError::OutOfRange`].
//!
//! The two methods report a tolerance miss differently. [`Material::value_within`]
//! turns both into `OutOfRange` for callers that want one policy.

use crate::calculators::{self, is_thermal_stress_fom};
use crate::error::{ModelError, ModelResult};
use crate::material::Material;
use crate::value::Value;
use mt_core::{Real, ensure_finite, lerp_from_upper};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Independent parameter used when a query does not name one.
pub const DEFAULT_INDEPENDENT: &str = "Temperature";

/// Tolerance used when a query does not set one.
pub const DEFAULT_TOLERANCE: Real = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Linear,
    Nearest,
}

impl FromStr for Method {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Method::Linear),
            "nearest" => Ok(Method::Nearest),
            _ => Err(ModelError::UnsupportedMethod {
                method: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Linear => write!(f, "linear"),
            Method::Nearest => write!(f, "nearest"),
        }
    }
}

/// Arguments of [`Material::get_value`].
#[derive(Debug, Clone, PartialEq)]
pub struct LookupQuery {
    /// Independent value to look up at; `None` asks for the first stored value.
    pub value: Option<Real>,
    pub independent: String,
    /// Dependent parameter; `None` means the parameter named like the property.
    pub dependent: Option<String>,
    pub method: Method,
    pub tolerance: Real,
}

impl Default for LookupQuery {
    fn default() -> Self {
        Self {
            value: None,
            independent: DEFAULT_INDEPENDENT.to_string(),
            dependent: None,
            method: Method::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl LookupQuery {
    pub fn at(value: Real) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn at_value(mut self, value: Real) -> Self {
        self.value = Some(value);
        self
    }

    pub fn independent(mut self, name: impl Into<String>) -> Self {
        self.independent = name.into();
        self
    }

    pub fn dependent(mut self, name: impl Into<String>) -> Self {
        self.dependent = Some(name.into());
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn tolerance(mut self, tolerance: Real) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn dependent_or<'a>(&'a self, property: &'a str) -> &'a str {
        self.dependent.as_deref().unwrap_or(property)
    }
}

impl Material {
    /// Look up a dependent value of `property`.
    ///
    /// `Ok(None)` is returned only by the nearest method when no stored point lies
    /// within the tolerance. The nearest method returns the co-indexed value even
    /// when it is `Missing`; linear interpolation only uses numeric points.
    ///
    /// The reserved name "Thermal Stress Figure of Merit" is computed from the
    /// material's other properties instead of looked up. Its inputs are read
    /// linearly with the default tolerance, so `method` and `tolerance` do not
    /// apply, and a `dependent` other than the reserved name is rejected.
    pub fn get_value(&self, property: &str, query: &LookupQuery) -> ModelResult<Option<Value>> {
        if is_thermal_stress_fom(property) {
            return self.computed_thermal_stress_fom(query).map(Some);
        }

        let prop = self.property(property)?;
        let dependent = query.dependent_or(property);
        let ys = prop.parameter(dependent)?;
        prop.parameter(&query.independent)?;

        let Some(at) = query.value else {
            return ys
                .values
                .first()
                .cloned()
                .map(Some)
                .ok_or_else(|| ModelError::EmptySeries {
                    parameter: dependent.to_string(),
                });
        };
        let at = ensure_finite(at, "lookup value")?;

        let pairs = prop.series(&query.independent, dependent)?;
        let points = numeric_points(&pairs, &query.independent)?;
        if points.is_empty() {
            return Err(ModelError::EmptySeries {
                parameter: query.independent.clone(),
            });
        }

        if let Some((_, y)) = points.iter().find(|(x, _)| *x == at) {
            return Ok(Some((*y).clone()));
        }

        match query.method {
            Method::Nearest => Ok(nearest(&points, at, query.tolerance, &self.name, dependent)),
            Method::Linear => linear(&points, at, query.tolerance, dependent).map(Some),
        }
    }

    /// [`Material::get_value`] restricted to numeric results.
    pub fn get_number(&self, property: &str, query: &LookupQuery) -> ModelResult<Option<Real>> {
        match self.get_value(property, query)? {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(Some(n)),
            Some(other) => Err(ModelError::NonNumeric {
                parameter: query.dependent_or(property).to_string(),
                value: other.to_string(),
            }),
        }
    }

    /// Numeric lookup that reports every tolerance miss as `OutOfRange`.
    pub fn value_within(&self, property: &str, query: &LookupQuery) -> ModelResult<Real> {
        self.get_number(property, query)?
            .ok_or_else(|| ModelError::OutOfRange {
                parameter: query.dependent_or(property).to_string(),
                query: query.value.unwrap_or(Real::NAN),
                tolerance: query.tolerance,
            })
    }

    fn computed_thermal_stress_fom(&self, query: &LookupQuery) -> ModelResult<Value> {
        if query.independent != DEFAULT_INDEPENDENT {
            return Err(ModelError::InvalidArgument {
                what: format!(
                    "thermal stress figure of merit is indexed by {DEFAULT_INDEPENDENT}, not {}",
                    query.independent
                ),
            });
        }
        if let Some(dependent) = query.dependent.as_deref()
            && !is_thermal_stress_fom(dependent)
        {
            return Err(ModelError::InvalidArgument {
                what: format!(
                    "thermal stress figure of merit has no parameter '{dependent}'"
                ),
            });
        }
        let temperature = query
            .value
            .unwrap_or(calculators::DEFAULT_FOM_TEMPERATURE);
        calculators::thermal_stress_fom(self, temperature).map(Value::Number)
    }
}

/// Pairs with a numeric independent value; pairs with a missing one are dropped.
fn numeric_points<'a>(
    pairs: &[(&Value, &'a Value)],
    independent: &str,
) -> ModelResult<Vec<(Real, &'a Value)>> {
    let mut points = Vec::with_capacity(pairs.len());
    for (x, y) in pairs {
        match x {
            Value::Number(n) => points.push((*n, *y)),
            Value::Missing => {}
            Value::Text(s) => {
                return Err(ModelError::NonNumeric {
                    parameter: independent.to_string(),
                    value: s.clone(),
                });
            }
        }
    }
    Ok(points)
}

fn nearest(
    points: &[(Real, &Value)],
    at: Real,
    tolerance: Real,
    material: &str,
    dependent: &str,
) -> Option<Value> {
    let mut best: Option<(Real, Real, &Value)> = None;
    for &(x, y) in points {
        let distance = (x - at).abs();
        if best.is_none_or(|(d, _, _)| distance < d) {
            best = Some((distance, x, y));
        }
    }

    let (distance, x, y) = best?;
    if distance > tolerance {
        debug!(
            material,
            dependent,
            at,
            tolerance,
            nearest = x,
            "no value within tolerance"
        );
        return None;
    }
    debug!(material, dependent, at, used = x, "using nearest stored point");
    Some(y.clone())
}

fn linear(points: &[(Real, &Value)], at: Real, tolerance: Real, dependent: &str) -> ModelResult<Value> {
    let mut sorted = Vec::with_capacity(points.len());
    for &(x, y) in points {
        match y {
            Value::Number(n) => sorted.push((x, *n)),
            Value::Missing => {}
            Value::Text(s) => {
                return Err(ModelError::NonNumeric {
                    parameter: dependent.to_string(),
                    value: s.clone(),
                });
            }
        }
    }
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let out_of_range = || ModelError::OutOfRange {
        parameter: dependent.to_string(),
        query: at,
        tolerance,
    };
    let (Some(&(x_min, y_min)), Some(&(x_max, y_max))) = (sorted.first(), sorted.last()) else {
        return Err(ModelError::EmptySeries {
            parameter: dependent.to_string(),
        });
    };

    if at < x_min {
        if x_min - at <= tolerance {
            debug!(dependent, at, used = x_min, "clamping to first value");
            return Ok(Value::Number(y_min));
        }
        return Err(out_of_range());
    }
    if at > x_max {
        if at - x_max <= tolerance {
            debug!(dependent, at, used = x_max, "clamping to last value");
            return Ok(Value::Number(y_max));
        }
        return Err(out_of_range());
    }

    // x_min < at < x_max and no stored point equals `at`, so 1 <= upper < len.
    let upper = sorted.partition_point(|&(x, _)| x < at);
    let (x1, y1) = sorted[upper - 1];
    let (x2, y2) = sorted[upper];
    Ok(Value::Number(lerp_from_upper(x1, y1, x2, y2, at)))
}
