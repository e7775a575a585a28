use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::pipeline_config::PipelineConfig;

/// Application-level constants
pub const APP_NAME: &str = "Labwise";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_TESSERACT_BINARY: &str = "tesseract";
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 30;

const ENV_BIND: &str = "LABWISE_BIND";
const ENV_KNOWLEDGE_BASE: &str = "LABWISE_KNOWLEDGE_BASE";
const ENV_MATCH_THRESHOLD: &str = "LABWISE_MATCH_THRESHOLD";
const ENV_TESSERACT: &str = "LABWISE_TESSERACT";
const ENV_OCR_TIMEOUT: &str = "LABWISE_OCR_TIMEOUT_SECS";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "labwise_lib=info,tower_http=warn"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Service settings resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    /// Knowledge base JSON file; `None` uses the bundled table.
    pub knowledge_base_path: Option<PathBuf>,
    pub pipeline: PipelineConfig,
    pub tesseract_binary: PathBuf,
    pub ocr_timeout: Duration,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup` (the environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = get(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_raw.trim().parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::Invalid {
                key: ENV_BIND,
                value: bind_raw.clone(),
                reason: e.to_string(),
            }
        })?;

        let mut pipeline = PipelineConfig::default();
        if let Some(raw) = get(ENV_MATCH_THRESHOLD) {
            let threshold: f64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: ENV_MATCH_THRESHOLD,
                value: raw.clone(),
                reason: "not a number".into(),
            })?;
            pipeline = pipeline.with_match_threshold(threshold)?;
        }

        let ocr_timeout_secs = match get(ENV_OCR_TIMEOUT) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: ENV_OCR_TIMEOUT,
                        value: raw,
                        reason: "must be a positive whole number of seconds".into(),
                    })
                }
            },
            None => DEFAULT_OCR_TIMEOUT_SECS,
        };

        Ok(Self {
            bind_addr,
            knowledge_base_path: get(ENV_KNOWLEDGE_BASE).map(PathBuf::from),
            pipeline,
            tesseract_binary: get(ENV_TESSERACT)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TESSERACT_BINARY)),
            ocr_timeout: Duration::from_secs(ocr_timeout_secs),
        })
    }
}
