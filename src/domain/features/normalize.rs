//! Feature normalization

use super::vector::{FeatureVector, NormalizedFeatures, Scalar};

/// Decimal digits kept for float features
pub const FLOAT_PRECISION_DIGITS: i32 = 6;

// value * 10^6 must stay within the exactly representable integers of an f64.
const MAX_ROUNDABLE: f64 = 1e9;

/// Rounds float features to a fixed precision and keeps integers exact.
///
/// Requests that differ only by float noise below the precision collapse to the
/// same normalized vector, and so to the same cache key.
pub fn normalize(features: &FeatureVector) -> NormalizedFeatures {
    let values = features
        .values()
        .iter()
        .map(|value| match *value {
            Scalar::Int(v) => Scalar::Int(v),
            Scalar::Float(v) => Scalar::Float(round_to_precision(v)),
        })
        .collect();

    NormalizedFeatures::from_normalized(values)
}

fn round_to_precision(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= MAX_ROUNDABLE {
        return value;
    }

    let factor = 10f64.powi(FLOAT_PRECISION_DIGITS);
    let rounded = (value * factor).round() / factor;

    // keep -0.0 out of keys
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floats(values: &[f64]) -> FeatureVector {
        FeatureVector::new(values.iter().copied().map(Scalar::Float).collect())
    }

    #[test]
    fn test_normalize_rounds_floats() {
        let normalized = normalize(&floats(&[0.123_456_789, 45.7, 1.0]));

        assert_eq!(
            normalized.values(),
            &[
                Scalar::Float(0.123_457),
                Scalar::Float(45.7),
                Scalar::Float(1.0)
            ]
        );
    }

    #[test]
    fn test_normalize_keeps_integers() {
        let features = FeatureVector::new(vec![Scalar::Int(2), Scalar::Int(-20), Scalar::Int(i64::MAX)]);
        let normalized = normalize(&features);

        assert_eq!(normalized.values(), features.values());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            floats(&[0.1 + 0.2, 45.700_000_01, 1e-9, -3.141_592_65]),
            floats(&[123_456_789.123_456_7, 0.000_000_5, 2.5e14, 8_999_999_999.5]),
            FeatureVector::new(vec![Scalar::Int(7), Scalar::Float(0.27)]),
        ];

        for input in inputs {
            let once = normalize(&input);
            let twice = normalize(&once.clone().into_feature_vector());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_normalize_collapses_jitter() {
        let pairs = [
            (0.27, 0.27 + 4e-8),
            (45.7, 45.7 - 3e-8),
            (0.1 + 0.2, 0.3),
            (88.0, 88.000_000_02),
        ];

        for (a, b) in pairs {
            assert_eq!(normalize(&floats(&[a])), normalize(&floats(&[b])), "{a} vs {b}");
        }
    }

    #[test]
    fn test_normalize_distinguishes_values_beyond_precision() {
        assert_ne!(normalize(&floats(&[0.27])), normalize(&floats(&[0.270_01])));
    }

    #[test]
    fn test_normalize_leaves_huge_and_non_finite_values() {
        let normalized = normalize(&floats(&[1e300, f64::INFINITY]));
        assert_eq!(
            normalized.values(),
            &[Scalar::Float(1e300), Scalar::Float(f64::INFINITY)]
        );
    }

    #[test]
    fn test_normalize_negative_zero() {
        let normalized = normalize(&floats(&[-1e-9]));
        let json = serde_json::to_string(&normalized).unwrap();
        assert_eq!(json, "[0.0]");
    }
}
