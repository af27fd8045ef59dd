use super::{ConfigError, ConfigResult};
use crate::compress::CompressionPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SUMMARIZE_MODEL: &str = "gpt-4o-mini";

/// Proxy configuration, built once at startup and handed to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Chat-completion endpoint all requests are relayed to
    pub upstream_url: String,
    /// Bearer token sent to the upstream
    pub api_key: String,
    /// Model used for the history summarization call
    pub summarize_model: String,
    /// Compression runs only when a request carries more messages than this
    pub min_msgs_to_summarize: usize,
    /// Number of trailing messages kept verbatim after compression
    pub max_recent_msgs: usize,
    /// Ceiling on the text sent to the summarizer, in characters
    pub summary_input_max_chars: usize,
    /// Ceiling on the summary returned by the upstream, in characters
    pub summary_max_chars: usize,
    /// Maximum inbound payload size in bytes
    pub max_payload_size: usize,
    /// Upstream request timeout in seconds (None = transport default)
    pub request_timeout_secs: Option<u64>,
    /// Enable debug logging
    pub verbose: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            upstream_url: String::new(),
            api_key: String::new(),
            summarize_model: DEFAULT_SUMMARIZE_MODEL.to_string(),
            min_msgs_to_summarize: 11,
            max_recent_msgs: 10,
            summary_input_max_chars: 12_000,
            summary_max_chars: 150,
            max_payload_size: 268_435_456, // 256MB
            request_timeout_secs: None,
            verbose: false,
        }
    }
}

impl ProxyConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let file_load = |reason: String| ConfigError::FileLoad {
            path: path.display().to_string(),
            reason,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| file_load(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| file_load(e.to_string()))
    }

    pub fn compression_policy(&self) -> CompressionPolicy {
        CompressionPolicy {
            min_msgs_to_summarize: self.min_msgs_to_summarize,
            max_recent_msgs: self.max_recent_msgs,
        }
    }
}
