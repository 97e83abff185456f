// mt-core/src/units.rs

use crate::{MtError, MtResult, Real};
use uom::si::f64::{Length as UomLength, ThermodynamicTemperature as UomTemperature};

pub type Length = UomLength;
pub type Temperature = UomTemperature;

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

/// Temperature scale named by a unit label in a data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureScale {
    Kelvin,
    Celsius,
    Fahrenheit,
}

impl TemperatureScale {
    /// Parse a unit label as written in material data ("C", "°C", "K", "degF", ...).
    pub fn from_label(label: &str) -> MtResult<Self> {
        match label.trim().to_lowercase().as_str() {
            "k" | "kelvin" => Ok(Self::Kelvin),
            "c" | "°c" | "degc" | "deg c" | "celsius" => Ok(Self::Celsius),
            "f" | "°f" | "degf" | "deg f" | "fahrenheit" => Ok(Self::Fahrenheit),
            _ => Err(MtError::UnknownUnit {
                unit: label.to_string(),
                quantity: "temperature",
            }),
        }
    }

    pub fn quantity(self, value: Real) -> Temperature {
        use uom::si::thermodynamic_temperature::{degree_celsius, degree_fahrenheit, kelvin};
        match self {
            Self::Kelvin => Temperature::new::<kelvin>(value),
            Self::Celsius => Temperature::new::<degree_celsius>(value),
            Self::Fahrenheit => Temperature::new::<degree_fahrenheit>(value),
        }
    }

    pub fn value(self, t: Temperature) -> Real {
        use uom::si::thermodynamic_temperature::{degree_celsius, degree_fahrenheit, kelvin};
        match self {
            Self::Kelvin => t.get::<kelvin>(),
            Self::Celsius => t.get::<degree_celsius>(),
            Self::Fahrenheit => t.get::<degree_fahrenheit>(),
        }
    }
}

/// Kelvin value of a temperature.
#[inline]
pub fn kelvin(t: Temperature) -> Real {
    TemperatureScale::Kelvin.value(t)
}

/// Metres value of a length.
#[inline]
pub fn meters(l: Length) -> Real {
    use uom::si::length::meter;
    l.get::<meter>()
}

/// True when every label names the same unit (whitespace ignored).
pub fn labels_agree<'a>(labels: impl IntoIterator<Item = &'a str>) -> bool {
    let mut iter = labels.into_iter().map(str::trim);
    match iter.next() {
        Some(first) => iter.all(|l| l == first),
        None => true,
    }
}
