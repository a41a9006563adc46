//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Path to the append-only readings log
    pub data_file: String,

    /// Path to the optional classifier artifact
    pub model_file: String,

    /// Directory of dashboard assets served as-is
    pub static_dir: String,

    /// Maximum rows returned by the history endpoint
    pub history_limit: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            data_file: env::var("DATA_FILE")
                .unwrap_or_else(|_| "data/sensor_data.csv".to_string()),

            model_file: env::var("MODEL_FILE")
                .unwrap_or_else(|_| "model/spoilage.onnx".to_string()),

            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),

            history_limit: env::var("HISTORY_LIMIT")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(500),
        }
    }
}
