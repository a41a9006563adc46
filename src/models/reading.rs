//! Sensor reading types

use serde::{Deserialize, Serialize};

use crate::inference::Prediction;

/// One environmental sensor sample: temperature (°C), relative humidity (%)
/// and raw gas-sensor value (MQ-135 analog reading).
///
/// Values are taken as-is; non-finite numbers are a caller error and must be
/// rejected before the reading enters the inference engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
    pub gas: f64,
}

impl Reading {
    pub fn new(temperature: f64, humidity: f64, gas: f64) -> Self {
        Self {
            temperature,
            humidity,
            gas,
        }
    }

    /// True when all three values are finite (no NaN, no ±infinity).
    pub fn is_finite(&self) -> bool {
        self.temperature.is_finite() && self.humidity.is_finite() && self.gas.is_finite()
    }
}

/// Persisted row of the append-only readings log. Also the schema the
/// offline training pipeline consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub timestamp: String,
    pub temperature: f64,
    pub humidity: f64,
    pub gas: f64,
}

impl ReadingRecord {
    pub fn reading(&self) -> Reading {
        Reading::new(self.temperature, self.humidity, self.gas)
    }
}

/// Body of `POST /api/data` as sent by field units and the replay sender.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub temperature: f64,
    pub humidity: f64,
    pub gas: f64,
    pub timestamp: Option<String>,
}

/// A persisted reading together with its classification.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedReading {
    #[serde(flatten)]
    pub record: ReadingRecord,
    pub prediction: Prediction,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub data: AnnotatedReading,
}

#[derive(Debug, Serialize)]
pub struct LatestResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AnnotatedReading>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub status: &'static str,
    pub data: Vec<ReadingRecord>,
}
