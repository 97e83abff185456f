use crate::MtError;

/// Floating point type used throughout the workspace
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, MtError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(MtError::NonFinite { what, value: v })
    }
}

/// Linear interpolation through `(x1, y1)` and `(x2, y2)` evaluated at `x`,
/// anchored on the upper point.
pub fn lerp_from_upper(x1: Real, y1: Real, x2: Real, y2: Real, x: Real) -> Real {
    y2 - (x2 - x) * (y2 - y1) / (x2 - x1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn lerp_hits_endpoints() {
        assert_eq!(lerp_from_upper(20.0, 210.0, 500.0, 180.0, 500.0), 180.0);
        assert!((lerp_from_upper(20.0, 210.0, 500.0, 180.0, 20.0) - 210.0).abs() < 1e-12);
        assert!((lerp_from_upper(0.0, 0.0, 10.0, 10.0, 2.5) - 2.5).abs() < 1e-12);
    }
}
