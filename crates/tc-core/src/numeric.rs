use crate::{TcError, TcResult};

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> TcResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TcError::NonFinite { what, value: v })
    }
}

pub fn ensure_positive(v: Real, what: &'static str) -> TcResult<Real> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(TcError::InvalidArg { what })
    }
}

/// Inclusive range check, reported as [`TcError::OutOfRange`].
pub fn ensure_within(v: Real, min: Real, max: Real, what: &'static str) -> TcResult<Real> {
    let v = ensure_finite(v, what)?;
    if v < min || v > max {
        return Err(TcError::OutOfRange {
            what,
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

/// Round half away from zero to a fixed number of decimals (display values only).
pub fn round_to(v: Real, decimals: u32) -> Real {
    let scale = 10_f64.powi(decimals as i32);
    (v * scale).round() / scale
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
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(0.0, "thickness").is_err());
        assert_eq!(ensure_positive(0.05, "thickness").unwrap(), 0.05);
    }

    #[test]
    fn ensure_within_is_inclusive() {
        assert!(ensure_within(100.0, 0.0, 100.0, "rh").is_ok());
        let err = ensure_within(100.5, 0.0, 100.0, "rh").unwrap_err();
        assert!(matches!(err, TcError::OutOfRange { what: "rh", .. }));
    }

    #[test]
    fn round_to_display_precision() {
        assert_eq!(round_to(26.1739, 1), 26.2);
        assert_eq!(round_to(0.123_456, 3), 0.123);
        assert_eq!(round_to(-1.25, 1), -1.3);
    }

    proptest::proptest! {
        #[test]
        fn round_to_stays_within_half_a_unit(v in -1.0e6_f64..1.0e6, decimals in 0u32..4) {
            let rounded = round_to(v, decimals);
            let half = 0.5 / 10_f64.powi(decimals as i32);
            proptest::prop_assert!((rounded - v).abs() <= half + 1e-9 * v.abs().max(1.0));
        }

        #[test]
        fn ensure_within_accepts_its_own_bounds(min in -500.0_f64..0.0, span in 0.0_f64..1000.0) {
            let max = min + span;
            proptest::prop_assert!(ensure_within(min, min, max, "t").is_ok());
            proptest::prop_assert!(ensure_within(max, min, max, "t").is_ok());
        }
    }
}
