//! Risk inference engine
//!
//! Turns a sensor reading into a spoilage-risk classification. Probability
//! estimation is pluggable: a learned classifier when a trained artifact is
//! available, a deterministic rule-based scorer otherwise.

pub mod classifier;
pub mod estimator;
pub mod heuristic;
pub mod model;

// Re-export common types
pub use classifier::{Prediction, RiskClassifier, RiskLevel};
pub use estimator::{Method, ProbabilityEstimator};
pub use heuristic::RuleEstimator;
pub use model::{LearnedEstimator, ModelAdapter};
