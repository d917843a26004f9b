//! Prediction extraction from heterogeneous response payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::protocol::InferenceProtocol;

/// Probability at or above which the positive label is predicted
pub const POSITIVE_THRESHOLD: f64 = 0.5;

/// Known layouts of the first prediction datum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// `[p_negative, p_positive]`
    TwoClassProbabilities,
    /// A bare `0` or `1`
    DirectLabel,
    /// `[p]` or a bare probability, `0 <= p <= 1`
    SingleProbability,
}

/// Label and probability derived from a response
///
/// `shape` is `None` when no known layout matched; label and probability are
/// then absent as well.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Prediction {
    pub shape: Option<ResponseShape>,
    pub label: Option<u8>,
    pub probability: Option<f64>,
}

impl Prediction {
    fn from_probability(shape: ResponseShape, probability: f64) -> Self {
        let label = if probability >= POSITIVE_THRESHOLD { 1 } else { 0 };

        Self {
            shape: Some(shape),
            label: Some(label),
            probability: Some(probability),
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.shape.is_some()
    }
}

type Matcher = fn(&Value) -> Option<Prediction>;

// Evaluated in order, first match wins.
const MATCHERS: [Matcher; 3] = [
    match_two_class_probabilities,
    match_direct_label,
    match_single_probability,
];

/// Extracts the prediction from a raw response payload
pub fn extract_prediction(protocol: InferenceProtocol, response: &Value) -> Prediction {
    protocol
        .first_datum(response)
        .and_then(|datum| MATCHERS.iter().find_map(|matcher| matcher(datum)))
        .unwrap_or_default()
}

fn as_probability(value: &Value) -> Option<f64> {
    value.as_f64().filter(|p| (0.0..=1.0).contains(p))
}

fn match_two_class_probabilities(datum: &Value) -> Option<Prediction> {
    match datum.as_array()?.as_slice() {
        [_, positive] => Some(Prediction::from_probability(
            ResponseShape::TwoClassProbabilities,
            as_probability(positive)?,
        )),
        _ => None,
    }
}

fn match_direct_label(datum: &Value) -> Option<Prediction> {
    let value = datum.as_f64()?;

    let label = if value == 0.0 {
        0
    } else if value == 1.0 {
        1
    } else {
        return None;
    };

    Some(Prediction {
        shape: Some(ResponseShape::DirectLabel),
        label: Some(label),
        probability: None,
    })
}

fn match_single_probability(datum: &Value) -> Option<Prediction> {
    let probability = match datum {
        Value::Array(items) => match items.as_slice() {
            [only] => as_probability(only)?,
            _ => return None,
        },
        Value::Number(_) => as_probability(datum)?,
        _ => return None,
    };

    Some(Prediction::from_probability(
        ResponseShape::SingleProbability,
        probability,
    ))
}
