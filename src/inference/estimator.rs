//! Probability estimator interface

use serde::{Deserialize, Serialize};

use crate::models::Reading;

/// Which estimator actually produced a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Model,
    Rule,
}

/// A source of spoilage probabilities.
///
/// `estimate` returns `None` when the estimator cannot answer for this call
/// (no artifact loaded, inference failed). Unavailability is an ordinary
/// result here, not an error: the classifier walks its estimators in
/// priority order and takes the first answer, so an optional estimator can
/// decline without anything being thrown or caught.
pub trait ProbabilityEstimator: Send + Sync {
    /// Probability in [0, 1] that the reading represents a spoiling
    /// condition, or `None` when unavailable.
    fn estimate(&self, reading: &Reading) -> Option<f64>;

    /// Tag recorded on predictions this estimator produced.
    fn method(&self) -> Method;
}
