//! Sample replay sender
//!
//! Stands in for the ESP32 field units during development: reads persisted
//! samples from the readings log and posts them to the ingestion endpoint in
//! a loop, one sample per interval, rewriting each timestamp to now. Send
//! failures are logged and the loop keeps going.

use std::env;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Sample {
    timestamp: String,
    temperature: f64,
    humidity: f64,
    gas: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "replay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let server = env::var("REPLAY_SERVER")
        .unwrap_or_else(|_| "http://localhost:8080/api/data".to_string());
    let sample_file =
        env::var("REPLAY_SAMPLE_FILE").unwrap_or_else(|_| "data/sensor_data.csv".to_string());
    let interval_secs = env::var("REPLAY_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5u64);

    let samples =
        read_samples(&sample_file).with_context(|| format!("reading samples from {sample_file}"))?;
    if samples.is_empty() {
        anyhow::bail!("no samples to send; add rows to {sample_file} beside the header");
    }

    tracing::info!(
        "Replaying {} samples to {} every {}s",
        samples.len(),
        server,
        interval_secs
    );

    let client = reqwest::Client::new();
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));

    for sample in samples.iter().cycle() {
        ticker.tick().await;

        let mut sample = sample.clone();
        sample.timestamp = Utc::now().to_rfc3339();

        match client.post(&server).json(&sample).send().await {
            Ok(res) => tracing::info!(
                "POST {} t={} h={} g={}",
                res.status(),
                sample.temperature,
                sample.humidity,
                sample.gas
            ),
            Err(e) => tracing::warn!("Send failed: {}", e),
        }
    }

    Ok(())
}

fn read_samples(path: &str) -> anyhow::Result<Vec<Sample>> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut samples = Vec::new();
    for row in reader.deserialize::<Sample>() {
        match row {
            Ok(sample) => samples.push(sample),
            // tolerate partial rows the same way the server's reader does
            Err(e) => tracing::debug!("Skipping row: {}", e),
        }
    }
    Ok(samples)
}
