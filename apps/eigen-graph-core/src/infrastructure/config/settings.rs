//! Stream Configuration Settings
//!
//! Configuration types for the live price stream, loaded from
//! environment variables.

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Path of the price stream WebSocket endpoint, relative to the base URL.
const STREAM_PATH: &str = "/v1/stream/ws";

/// Characters escaped in the symbol query value. Everything except the
/// unreserved marks, so a space becomes `%20`, never `+`.
const SYMBOL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Complete live-stream configuration.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// WebSocket base URL, e.g. `wss://api.example.com`.
    pub ws_base: String,
    /// Bound on the consumer-visible point sequence.
    pub max_points: usize,
    /// Idle time after which the connection is considered dead.
    pub heartbeat_timeout: Duration,
    /// Initial reconnection delay.
    pub backoff_base: Duration,
    /// Maximum reconnection delay.
    pub backoff_max: Duration,
    /// Interval at which pending points are flushed to consumers.
    pub flush_interval: Duration,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            ws_base: String::new(),
            max_points: 3000,
            heartbeat_timeout: Duration::from_secs(20),
            backoff_base: Duration::from_millis(1000),
            backoff_max: Duration::from_secs(30),
            flush_interval: Duration::from_millis(16),
        }
    }
}

impl StreamSettings {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `EIGEN_GRAPH_WS_BASE` is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `EIGEN_GRAPH_WS_BASE` is missing or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let ws_base = lookup("EIGEN_GRAPH_WS_BASE")
            .ok_or_else(|| ConfigError::MissingEnvVar("EIGEN_GRAPH_WS_BASE".to_string()))?;

        if ws_base.is_empty() {
            return Err(ConfigError::EmptyValue("EIGEN_GRAPH_WS_BASE".to_string()));
        }

        let defaults = Self::default();

        Ok(Self {
            ws_base: ws_base.trim_end_matches('/').to_string(),
            max_points: parse_usize(&lookup, "EIGEN_GRAPH_MAX_POINTS", defaults.max_points),
            heartbeat_timeout: parse_duration_millis(
                &lookup,
                "EIGEN_GRAPH_HEARTBEAT_TIMEOUT_MS",
                defaults.heartbeat_timeout,
            ),
            backoff_base: parse_duration_millis(
                &lookup,
                "EIGEN_GRAPH_BACKOFF_BASE_MS",
                defaults.backoff_base,
            ),
            backoff_max: parse_duration_millis(
                &lookup,
                "EIGEN_GRAPH_BACKOFF_MAX_MS",
                defaults.backoff_max,
            ),
            flush_interval: parse_duration_millis(
                &lookup,
                "EIGEN_GRAPH_FLUSH_INTERVAL_MS",
                defaults.flush_interval,
            ),
        })
    }

    /// Get the price stream WebSocket URL for `symbol`.
    ///
    /// The symbol is percent-encoded for the query string.
    #[must_use]
    pub fn stream_url(&self, symbol: &str) -> String {
        let encoded = utf8_percent_encode(symbol, SYMBOL_ENCODE_SET);
        format!("{}{STREAM_PATH}?symbol={encoded}", self.ws_base)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
}

fn parse_usize(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> usize {
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_duration_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Duration {
    lookup(key)
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_base_url_is_fatal() {
        let result = StreamSettings::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }

    #[test]
    fn empty_base_url_is_fatal() {
        let result = StreamSettings::from_lookup(lookup_from(&[("EIGEN_GRAPH_WS_BASE", "")]));
        assert!(matches!(result, Err(ConfigError::EmptyValue(_))));
    }

    #[test]
    fn defaults_apply_when_only_base_is_set() {
        let settings = StreamSettings::from_lookup(lookup_from(&[(
            "EIGEN_GRAPH_WS_BASE",
            "wss://api.example.com",
        )]))
        .unwrap();
        assert_eq!(settings.max_points, 3000);
        assert_eq!(settings.heartbeat_timeout, Duration::from_secs(20));
        assert_eq!(settings.backoff_base, Duration::from_millis(1000));
        assert_eq!(settings.backoff_max, Duration::from_secs(30));
        assert_eq!(settings.flush_interval, Duration::from_millis(16));
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = StreamSettings::from_lookup(lookup_from(&[
            ("EIGEN_GRAPH_WS_BASE", "wss://api.example.com/"),
            ("EIGEN_GRAPH_MAX_POINTS", "500"),
            ("EIGEN_GRAPH_BACKOFF_BASE_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(settings.ws_base, "wss://api.example.com");
        assert_eq!(settings.max_points, 500);
        assert_eq!(settings.backoff_base, Duration::from_millis(250));
    }

    #[test]
    fn malformed_override_falls_back_to_default() {
        let settings = StreamSettings::from_lookup(lookup_from(&[
            ("EIGEN_GRAPH_WS_BASE", "wss://api.example.com"),
            ("EIGEN_GRAPH_MAX_POINTS", "lots"),
        ]))
        .unwrap();
        assert_eq!(settings.max_points, 3000);
    }

    #[test]
    fn stream_url_appends_path_and_symbol() {
        let settings = StreamSettings::from_lookup(lookup_from(&[(
            "EIGEN_GRAPH_WS_BASE",
            "wss://api.example.com",
        )]))
        .unwrap();
        assert_eq!(
            settings.stream_url("rETH-USD"),
            "wss://api.example.com/v1/stream/ws?symbol=rETH-USD"
        );
        assert_eq!(
            settings.stream_url("a b"),
            "wss://api.example.com/v1/stream/ws?symbol=a%20b"
        );
        assert_eq!(
            settings.stream_url("A/B+C"),
            "wss://api.example.com/v1/stream/ws?symbol=A%2FB%2BC"
        );
    }
}
