//! Reading ingestion and history handlers

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::models::{
    AnnotatedReading, HistoryResponse, IngestRequest, IngestResponse, LatestResponse, Reading,
    ReadingRecord,
};
use crate::{AppError, AppResult, AppState};

/// Ingest one sensor reading: persist it, classify it, echo both back.
///
/// Field units and the replay sender post here. The timestamp defaults to
/// now when the unit does not supply one.
pub async fn ingest(
    State(state): State<AppState>,
    Json(req): Json<IngestRequest>,
) -> AppResult<(StatusCode, Json<IngestResponse>)> {
    let reading = Reading::new(req.temperature, req.humidity, req.gas);

    // the inference engine assumes validated finite floats; reject here
    if !reading.is_finite() {
        return Err(AppError::InvalidReading(
            "temperature, humidity and gas must be finite numbers".to_string(),
        ));
    }

    let timestamp = req
        .timestamp
        .filter(|ts| !ts.is_empty())
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    let record = ReadingRecord {
        timestamp,
        temperature: reading.temperature,
        humidity: reading.humidity,
        gas: reading.gas,
    };
    state.store.append(&record)?;

    let prediction = state.predictor.predict(&reading);

    tracing::debug!(
        "Reading ingested: t={} h={} g={} -> {:?} ({:?})",
        reading.temperature,
        reading.humidity,
        reading.gas,
        prediction.risk,
        prediction.method
    );

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            status: "success",
            data: AnnotatedReading { record, prediction },
        }),
    ))
}

/// Most recent reading with a fresh prediction for it.
pub async fn latest(State(state): State<AppState>) -> AppResult<Json<LatestResponse>> {
    match state.store.latest()? {
        Some(record) => {
            let prediction = state.predictor.predict(&record.reading());
            Ok(Json(LatestResponse {
                status: "success",
                data: Some(AnnotatedReading { record, prediction }),
            }))
        }
        None => Ok(Json(LatestResponse {
            status: "empty",
            data: None,
        })),
    }
}

/// Recent readings, oldest first, capped at the configured history limit.
pub async fn history(State(state): State<AppState>) -> AppResult<Json<HistoryResponse>> {
    let data = state.store.tail(state.config.history_limit)?;
    Ok(Json(HistoryResponse {
        status: "success",
        data,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;
    use crate::inference::{ModelAdapter, RiskClassifier};
    use crate::store::ReadingStore;

    fn test_state(dir: &std::path::Path) -> AppState {
        let config = Config {
            port: 0,
            data_file: dir.join("log.csv").to_string_lossy().into_owned(),
            model_file: dir.join("missing.onnx").to_string_lossy().into_owned(),
            static_dir: "static".to_string(),
            history_limit: 5,
        };
        AppState {
            store: Arc::new(ReadingStore::open(&config.data_file).unwrap()),
            predictor: Arc::new(RiskClassifier::new(ModelAdapter::disabled())),
            model_loaded: false,
            config,
        }
    }

    fn request(t: f64, h: f64, g: f64) -> IngestRequest {
        IngestRequest {
            temperature: t,
            humidity: h,
            gas: g,
            timestamp: None,
        }
    }

    #[tokio::test]
    async fn test_ingest_persists_and_classifies() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let (status, Json(body)) = ingest(State(state.clone()), Json(request(27.0, 75.0, 300.0)))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.status, "success");
        assert_eq!(body.data.prediction.probability, 0.438);
        assert!(!body.data.record.timestamp.is_empty());
        assert_eq!(state.store.tail(10).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ingest_rejects_non_finite() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let result = ingest(State(state.clone()), Json(request(f64::NAN, 65.0, 150.0))).await;
        assert!(matches!(result, Err(AppError::InvalidReading(_))));

        // nothing persisted
        assert!(state.store.latest().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_empty_then_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let Json(body) = latest(State(state.clone())).await.unwrap();
        assert_eq!(body.status, "empty");
        assert!(body.data.is_none());

        ingest(State(state.clone()), Json(request(22.0, 65.0, 150.0)))
            .await
            .unwrap();

        let Json(body) = latest(State(state)).await.unwrap();
        assert_eq!(body.status, "success");
        let data = body.data.unwrap();
        assert_eq!(data.prediction.probability, 0.0);
    }

    #[tokio::test]
    async fn test_history_respects_limit() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        for i in 0..8 {
            ingest(
                State(state.clone()),
                Json(request(20.0 + i as f64, 65.0, 150.0)),
            )
            .await
            .unwrap();
        }

        let Json(body) = history(State(state)).await.unwrap();
        assert_eq!(body.data.len(), 5);
        assert_eq!(body.data.last().unwrap().temperature, 27.0);
    }
}
