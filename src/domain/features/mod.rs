//! Feature vectors and their normalization

mod normalize;
mod vector;

pub use normalize::{normalize, FLOAT_PRECISION_DIGITS};
pub use vector::{validate_features, FeatureVector, NormalizedFeatures, Scalar};
