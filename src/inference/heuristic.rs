//! Rule-based spoilage scoring
//!
//! Deterministic fallback used whenever no trained model is usable. Three
//! banded factors are summed and normalized into a probability.

use crate::models::Reading;

use super::estimator::{Method, ProbabilityEstimator};

/// Always-available estimator backed by [`rule_probability`].
pub struct RuleEstimator;

impl ProbabilityEstimator for RuleEstimator {
    fn estimate(&self, reading: &Reading) -> Option<f64> {
        Some(rule_probability(reading))
    }

    fn method(&self) -> Method {
        Method::Rule
    }
}

/// Fixed three-factor additive score, normalized and clamped into [0, 1].
///
/// Contributions are accumulated in tenths and normalized as `tenths / 16`
/// (i.e. score / 1.6), so every reachable probability is an exact binary
/// fraction and the 0.25 band boundary is hit exactly rather than drifting
/// with float accumulation order. The maximum raw sum (18 tenths) exceeds
/// the divisor on purpose: the worst-case corner saturates at the clamp
/// ceiling instead of stretching the band layout.
///
/// Pure function: identical readings always score identically. Assumes
/// finite inputs.
pub fn rule_probability(reading: &Reading) -> f64 {
    let Reading {
        temperature: t,
        humidity: h,
        gas: g,
    } = *reading;

    let mut tenths = 0u32;

    // humidity: ideal 50-70 %
    if h < 50.0 {
        tenths += 1;
    } else if h <= 70.0 {
        // in range
    } else if h <= 80.0 {
        tenths += 3;
    } else {
        tenths += 6;
    }

    // temperature: ideal 10-25 °C
    if t < 10.0 {
        tenths += 1;
    } else if t <= 25.0 {
        // in range
    } else if t <= 30.0 {
        tenths += 2;
    } else {
        tenths += 5;
    }

    // gas: raw MQ-135 value bands
    if g < 200.0 {
        // clean air
    } else if g <= 400.0 {
        tenths += 2;
    } else if g <= 800.0 {
        tenths += 4;
    } else {
        tenths += 7;
    }

    (f64::from(tenths) / 16.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ideal_conditions_score_zero() {
        let p = rule_probability(&Reading::new(22.0, 65.0, 150.0));
        assert_eq!(p, 0.0);
    }

    #[test]
    fn test_moderate_conditions() {
        // contributions 0.2 (t) + 0.3 (h) + 0.2 (g) = 0.7, over 1.6
        let p = rule_probability(&Reading::new(27.0, 75.0, 300.0));
        assert_eq!(p, 0.4375);
    }

    #[test]
    fn test_worst_corner_saturates() {
        // raw sum 1.8 exceeds the divisor; clamp holds the ceiling
        assert_eq!(rule_probability(&Reading::new(32.0, 85.0, 900.0)), 1.0);
        assert_eq!(rule_probability(&Reading::new(35.0, 90.0, 1000.0)), 1.0);
    }

    #[test]
    fn test_quarter_boundary_is_reachable_exactly() {
        // cold + humid: 0.1 + 0.3 = 0.4, over 1.6 = exactly 0.25
        let p = rule_probability(&Reading::new(5.0, 75.0, 100.0));
        assert_eq!(p, 0.25);
    }

    #[test]
    fn test_band_edges() {
        // each factor's upper bound is inclusive in its band
        assert_eq!(rule_probability(&Reading::new(25.0, 70.0, 199.9)), 0.0);
        assert_eq!(rule_probability(&Reading::new(30.0, 80.0, 400.0)), 0.4375);
        assert_eq!(
            rule_probability(&Reading::new(30.1, 80.1, 800.0)),
            15.0 / 16.0
        );
    }

    #[test]
    fn test_deterministic() {
        let r = Reading::new(27.3, 76.2, 512.0);
        assert_eq!(rule_probability(&r), rule_probability(&r));
    }

    #[test]
    fn test_probability_in_range() {
        for t in [-40.0, 0.0, 9.9, 10.0, 25.0, 25.1, 30.0, 31.0, 120.0] {
            for h in [0.0, 49.9, 50.0, 70.0, 70.1, 80.0, 80.1, 100.0] {
                for g in [0.0, 199.0, 200.0, 400.0, 401.0, 800.0, 801.0, 4096.0] {
                    let p = rule_probability(&Reading::new(t, h, g));
                    assert!((0.0..=1.0).contains(&p), "p={p} for ({t},{h},{g})");
                }
            }
        }
    }
}
