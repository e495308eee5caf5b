use anyhow::Context as _;
use std::collections::HashMap;
use std::time::Duration;

use crate::card::SEARCH_PREFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Structured JSON lines
    #[default]
    Json,
    /// Human-readable, multi-line
    Pretty,
}

/// Runtime configuration, read once from the environment at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub log_format: LogFormat,
    /// Prediction endpoint; without one the recognizer counts as not configured
    pub recognizer_endpoint: Option<String>,
    pub recognizer_key: Option<String>,
    /// Upper bound on one prediction request
    pub recognizer_timeout: Duration,
    /// Seed for song picks; random when unset
    pub seed: Option<u64>,
    pub search_prefix: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            log_format: LogFormat::Json,
            recognizer_endpoint: None,
            recognizer_key: None,
            recognizer_timeout: Duration::from_secs(5),
            seed: None,
            search_prefix: SEARCH_PREFIX.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> anyhow::Result<Self> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let seed = get("RECOMMENDATION_SEED")
            .map(|s| s.parse::<u64>())
            .transpose()
            .context("RECOMMENDATION_SEED must be an unsigned integer")?;

        let recognizer_timeout = get("RECOGNIZER_TIMEOUT_SECS")
            .map(|s| s.parse::<u64>())
            .transpose()
            .context("RECOGNIZER_TIMEOUT_SECS must be an unsigned integer")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.recognizer_timeout);

        let log_format = match get("LOG_FORMAT").as_deref() {
            Some("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            log_format,
            recognizer_endpoint: get("RECOGNIZER_ENDPOINT"),
            recognizer_key: get("RECOGNIZER_KEY"),
            recognizer_timeout,
            seed,
            search_prefix: get("SEARCH_PREFIX").unwrap_or(defaults.search_prefix),
        })
    }
}
