//! Mathematical primitives for the localization core.
//!
//! Headings and sonar bearings are measured in degrees; conversion to
//! radians happens only at trigonometry call sites.

/// Normalize an angle in degrees to [0, 360).
///
/// # Example
/// ```
/// use disha_mcl::core::math::wrap_degrees;
///
/// assert!((wrap_degrees(370.0) - 10.0).abs() < 1e-12);
/// assert!((wrap_degrees(-90.0) - 270.0).abs() < 1e-12);
/// ```
#[inline]
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round a tiny negative input up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Population mean and variance of a sequence of values.
///
/// Divides by `n`, not `n - 1`: the convergence test runs over the entire
/// particle population, not a sample of it. Returns `(0.0, 0.0)` for an
/// empty slice.
pub fn population_variance(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, variance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wrap_degrees_identity() {
        assert_relative_eq!(wrap_degrees(0.0), 0.0);
        assert_relative_eq!(wrap_degrees(180.0), 180.0);
        assert_relative_eq!(wrap_degrees(359.9), 359.9);
    }

    #[test]
    fn test_wrap_degrees_positive_overflow() {
        assert_relative_eq!(wrap_degrees(360.0), 0.0);
        assert_relative_eq!(wrap_degrees(370.0), 10.0, epsilon = 1e-12);
        assert_relative_eq!(wrap_degrees(720.0), 0.0);
        assert_relative_eq!(wrap_degrees(1085.0), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_wrap_degrees_negative() {
        assert_relative_eq!(wrap_degrees(-90.0), 270.0);
        assert_relative_eq!(wrap_degrees(-360.0), 0.0);
        assert_relative_eq!(wrap_degrees(-540.0), 180.0);
    }

    #[test]
    fn test_wrap_degrees_stays_in_range() {
        for i in -1000..1000 {
            let v = wrap_degrees(i as f64 * 7.3);
            assert!((0.0..360.0).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn test_wrap_degrees_tiny_negative() {
        let v = wrap_degrees(-1e-16);
        assert!((0.0..360.0).contains(&v), "out of range: {}", v);
    }

    #[test]
    fn test_population_variance_constant() {
        let (mean, var) = population_variance(&[4.0, 4.0, 4.0]);
        assert_relative_eq!(mean, 4.0);
        assert_relative_eq!(var, 0.0);
    }

    #[test]
    fn test_population_variance_known_values() {
        // Values 1..5: mean 3, population variance 2
        let (mean, var) = population_variance(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_relative_eq!(mean, 3.0);
        assert_relative_eq!(var, 2.0);
    }

    #[test]
    fn test_population_variance_empty() {
        let (mean, var) = population_variance(&[]);
        assert_eq!(mean, 0.0);
        assert_eq!(var, 0.0);
    }
}
