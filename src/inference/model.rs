//! Learned classifier adapter - ONNX Runtime integration
//!
//! Wraps the optional trained spoilage classifier behind a uniform
//! probability query. The artifact contract: float32 input of shape
//! `[1, 3]` in fixed feature order (temperature, humidity, gas), output
//! tensor of class probabilities with the high-risk class last.
//!
//! A missing or unusable artifact is a supported configuration, never a
//! startup failure: the adapter settles into the "no model" state and every
//! query reports unavailable.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use thiserror::Error;

use crate::models::Reading;

use super::estimator::{Method, ProbabilityEstimator};

/// Feature order expected by the artifact.
pub const FEATURE_COUNT: usize = 3;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to load artifact: {0}")]
    Load(String),
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Holder of the optional trained classifier.
///
/// The session is established once at startup and never reloaded. ONNX
/// sessions need `&mut self` to run, so inference serializes on a mutex;
/// everything else is read-only and shares freely across tasks.
pub struct ModelAdapter {
    session: Option<Mutex<Session>>,
}

impl ModelAdapter {
    /// Adapter with no artifact; every query reports unavailable.
    pub fn disabled() -> Self {
        Self { session: None }
    }

    /// Load the classifier artifact at `path`.
    ///
    /// Missing file and corrupt/incompatible artifact both settle into the
    /// "no model" state; neither is fatal.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            tracing::info!(
                "No model artifact at {}, using rule-based scoring",
                path.display()
            );
            return Self::disabled();
        }

        match open_session(path) {
            Ok(session) => {
                tracing::info!("Model artifact loaded from {}", path.display());
                Self {
                    session: Some(Mutex::new(session)),
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring unusable model artifact at {}: {}",
                    path.display(),
                    e
                );
                Self::disabled()
            }
        }
    }

    /// Check if an artifact is held
    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    /// Probability of the high-risk class for this reading, or `None` when
    /// no artifact is held or this invocation failed.
    ///
    /// A per-call failure does not unload the artifact; the next call gets a
    /// fresh attempt.
    pub fn query(&self, reading: &Reading) -> Option<f64> {
        let session = self.session.as_ref()?;

        match run_inference(&mut session.lock(), reading) {
            Ok(prob) => Some(prob),
            Err(e) => {
                tracing::debug!("Model inference failed ({}), reporting unavailable", e);
                None
            }
        }
    }
}

fn open_session(path: &Path) -> Result<Session, ModelError> {
    Session::builder()
        .map_err(|e| ModelError::Load(format!("session builder: {e}")))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| ModelError::Load(format!("optimization level: {e}")))?
        .commit_from_file(path)
        .map_err(|e| ModelError::Load(e.to_string()))
}

fn run_inference(session: &mut Session, reading: &Reading) -> Result<f64, ModelError> {
    let features = vec![
        reading.temperature as f32,
        reading.humidity as f32,
        reading.gas as f32,
    ];

    let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), features)
        .map_err(|e| ModelError::Inference(format!("array error: {e}")))?;

    let output_name = session
        .outputs()
        .first()
        .map(|o| o.name().to_string())
        .ok_or_else(|| ModelError::Inference("no output defined".into()))?;

    let input_tensor = Value::from_array(input_array)
        .map_err(|e| ModelError::Inference(format!("tensor error: {e}")))?;

    let outputs = session
        .run(ort::inputs![input_tensor])
        .map_err(|e| ModelError::Inference(e.to_string()))?;

    let output = outputs
        .get(&output_name)
        .ok_or_else(|| ModelError::Inference("no output".into()))?;

    let output_tensor = output
        .try_extract_tensor::<f32>()
        .map_err(|e| ModelError::Inference(format!("extract error: {e}")))?;

    // class probabilities, high-risk last
    let prob = output_tensor
        .1
        .last()
        .copied()
        .ok_or_else(|| ModelError::Inference("empty output tensor".into()))? as f64;

    if !prob.is_finite() || !(0.0..=1.0).contains(&prob) {
        return Err(ModelError::Inference(format!(
            "probability out of range: {prob}"
        )));
    }

    Ok(prob)
}

/// Estimator view over the adapter, used by the classifier chain.
pub struct LearnedEstimator {
    adapter: ModelAdapter,
}

impl LearnedEstimator {
    pub fn new(adapter: ModelAdapter) -> Self {
        Self { adapter }
    }
}

impl ProbabilityEstimator for LearnedEstimator {
    fn estimate(&self, reading: &Reading) -> Option<f64> {
        self.adapter.query(reading)
    }

    fn method(&self) -> Method {
        Method::Model
    }
}
