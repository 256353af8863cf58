//! Angular mapping between values, percentages and degrees.

/// Degrees per percent of a full revolution.
pub const DEGREES_PER_PERCENT: f64 = 3.6;

/// Convert a percentage of a full revolution to degrees.
#[must_use]
pub fn to_degree(percent: f64) -> f64 {
    percent * DEGREES_PER_PERCENT
}

/// Convert a value to a percentage of `max`, clamped to `[0, 100]`.
///
/// Total over all inputs: a non-positive or non-finite `max`, or a NaN
/// value, yields 0.
#[must_use]
pub fn to_percentage(value: f64, max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 || value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max) / max * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_full_revolution() {
        assert_eq!(to_degree(100.0), 360.0);
        assert_eq!(to_degree(0.0), 0.0);
        assert_eq!(to_degree(25.0), 90.0);
    }

    #[test]
    fn test_percentage_basic() {
        assert_eq!(to_percentage(42.0, 100.0), 42.0);
        assert_eq!(to_percentage(5.0, 10.0), 50.0);
    }

    #[test]
    fn test_percentage_clamps() {
        assert_eq!(to_percentage(150.0, 100.0), 100.0);
        assert_eq!(to_percentage(-3.0, 100.0), 0.0);
        assert_eq!(to_percentage(f64::INFINITY, 100.0), 100.0);
    }

    #[test]
    fn test_percentage_bad_max() {
        assert_eq!(to_percentage(10.0, 0.0), 0.0);
        assert_eq!(to_percentage(10.0, -5.0), 0.0);
        assert_eq!(to_percentage(10.0, f64::NAN), 0.0);
        assert_eq!(to_percentage(10.0, f64::INFINITY), 0.0);
        assert_eq!(to_percentage(f64::NAN, 100.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_percentage_in_range_matches_ratio(max in 0.001f64..1e6, frac in 0.0f64..=1.0) {
            let value = max * frac;
            let p = to_percentage(value, max);
            prop_assert!((p - value / max * 100.0).abs() < 1e-9);
        }

        #[test]
        fn prop_percentage_above_max_is_100(max in 0.001f64..1e6, extra in 0.0f64..1e6) {
            prop_assert_eq!(to_percentage(max + extra, max), 100.0);
        }

        #[test]
        fn prop_percentage_below_zero_is_0(max in 0.001f64..1e6, neg in 0.0f64..1e6) {
            prop_assert_eq!(to_percentage(-neg, max), 0.0);
        }

        #[test]
        fn prop_degree_is_linear(p in -1e6f64..1e6) {
            prop_assert_eq!(to_degree(p), p * 3.6);
        }
    }
}
