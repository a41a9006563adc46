//! Risk classification policy
//!
//! Walks a priority-ordered estimator chain (learned first, rule last) and
//! maps the winning probability onto a three-level risk category. `predict`
//! is total: it always returns a prediction for finite input, whatever the
//! optional model does.

use serde::{Deserialize, Serialize};

use crate::models::Reading;

use super::estimator::{Method, ProbabilityEstimator};
use super::heuristic::{rule_probability, RuleEstimator};
use super::model::{LearnedEstimator, ModelAdapter};

/// Discretized spoilage risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Band boundaries are inclusive on their lower bound: exactly 0.25 is
    /// `Medium`, exactly 0.6 is `High`.
    pub fn from_probability(p: f64) -> Self {
        if p < 0.25 {
            RiskLevel::Low
        } else if p < 0.6 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

/// Classification output. Constructed fresh per call, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub risk: RiskLevel,
    /// Reported probability, rounded to 3 decimals.
    pub probability: f64,
    pub method: Method,
}

/// The decision policy around the estimator chain.
///
/// Built once at startup and injected into whatever serves prediction
/// requests; it holds no per-call state.
pub struct RiskClassifier {
    estimators: Vec<Box<dyn ProbabilityEstimator>>,
}

impl RiskClassifier {
    /// Standard chain: the learned estimator, then the rule fallback.
    pub fn new(adapter: ModelAdapter) -> Self {
        Self::with_estimators(vec![
            Box::new(LearnedEstimator::new(adapter)),
            Box::new(RuleEstimator),
        ])
    }

    pub fn with_estimators(estimators: Vec<Box<dyn ProbabilityEstimator>>) -> Self {
        Self { estimators }
    }

    /// Classify one reading.
    ///
    /// The first estimator that answers wins and stamps its method on the
    /// result. The rule estimator is total, so the chain always answers; the
    /// trailing direct fallback only guards an estimator list built without
    /// one.
    pub fn predict(&self, reading: &Reading) -> Prediction {
        let (probability, method) = self
            .estimators
            .iter()
            .find_map(|est| est.estimate(reading).map(|p| (p, est.method())))
            .unwrap_or_else(|| (rule_probability(reading), Method::Rule));

        // risk is mapped from the unrounded probability; rounding is for the
        // reported field only
        Prediction {
            risk: RiskLevel::from_probability(probability),
            probability: round3(probability),
            method,
        }
    }
}

fn round3(p: f64) -> f64 {
    (p * 1000.0).round() / 1000.0
}
