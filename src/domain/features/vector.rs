//! Feature vector types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A single model input value
///
/// JSON integers deserialize as `Int`, numbers with a fraction or exponent as `Float`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
}

impl Scalar {
    pub fn as_f64(&self) -> f64 {
        match self {
            Scalar::Int(v) => *v as f64,
            Scalar::Float(v) => *v,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Scalar::Int(_) => true,
            Scalar::Float(v) => v.is_finite(),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{:?}", v),
        }
    }
}

impl std::str::FromStr for Scalar {
    type Err = DomainError;

    /// Parses `2` as an integer and `2.0` / `2e0` as a float
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(v) = s.parse::<i64>() {
            return Ok(Scalar::Int(v));
        }

        s.parse::<f64>()
            .map(Scalar::Float)
            .map_err(|_| DomainError::validation(format!("Invalid feature value: '{}'", s)))
    }
}

/// Raw ordered model input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<Scalar>);

impl FeatureVector {
    pub fn new(values: Vec<Scalar>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[Scalar] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Scalar>> for FeatureVector {
    fn from(values: Vec<Scalar>) -> Self {
        Self(values)
    }
}

/// Feature vector after rounding, used for cache keys and cache records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedFeatures(Vec<Scalar>);

impl NormalizedFeatures {
    pub(crate) fn from_normalized(values: Vec<Scalar>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[Scalar] {
        &self.0
    }

    pub fn into_feature_vector(self) -> FeatureVector {
        FeatureVector(self.0)
    }
}

/// Checks the caller-side preconditions of a feature vector
///
/// `expected_len` is the model's input arity when known.
pub fn validate_features(
    features: &FeatureVector,
    expected_len: Option<usize>,
) -> Result<(), DomainError> {
    if features.is_empty() {
        return Err(DomainError::validation("Feature vector must not be empty"));
    }

    if let Some(expected) = expected_len {
        if features.len() != expected {
            return Err(DomainError::validation(format!(
                "Expected {} features, got {}",
                expected,
                features.len()
            )));
        }
    }

    if let Some(pos) = features.values().iter().position(|v| !v.is_finite()) {
        return Err(DomainError::validation(format!(
            "Feature at position {} is not a finite number",
            pos
        )));
    }

    Ok(())
}
