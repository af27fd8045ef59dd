use super::*;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &ProxyConfig) -> ConfigResult<()> {
        Self::validate_upstream(config)?;
        Self::validate_compression(config)?;
        Self::validate_server_settings(config)?;
        Ok(())
    }

    fn validate_upstream(config: &ProxyConfig) -> ConfigResult<()> {
        let url = &config.upstream_url;
        if url.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "upstream_url".to_string(),
            });
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "upstream_url".to_string(),
                value: url.clone(),
                reason: "URL must start with http:// or https://".to_string(),
            });
        }

        match ::url::Url::parse(url) {
            Ok(parsed) => {
                if parsed.host_str().is_none() {
                    return Err(ConfigError::InvalidValue {
                        field: "upstream_url".to_string(),
                        value: url.clone(),
                        reason: "URL must have a valid host".to_string(),
                    });
                }
            }
            Err(e) => {
                return Err(ConfigError::InvalidValue {
                    field: "upstream_url".to_string(),
                    value: url.clone(),
                    reason: format!("Invalid URL format: {}", e),
                });
            }
        }

        if config.api_key.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "api_key".to_string(),
            });
        }

        if config.summarize_model.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "summarize_model".to_string(),
            });
        }

        Ok(())
    }

    fn validate_compression(config: &ProxyConfig) -> ConfigResult<()> {
        let positive = [
            ("max_recent_msgs", config.max_recent_msgs),
            ("summary_input_max_chars", config.summary_input_max_chars),
            ("summary_max_chars", config.summary_max_chars),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "Must be > 0".to_string(),
                });
            }
        }

        // A compressed request holds max_recent_msgs + 1 messages and must not
        // trigger compression again.
        if config.max_recent_msgs >= config.min_msgs_to_summarize {
            return Err(ConfigError::IncompatibleConfig {
                reason: format!(
                    "max_recent_msgs ({}) must be less than min_msgs_to_summarize ({})",
                    config.max_recent_msgs, config.min_msgs_to_summarize
                ),
            });
        }

        Ok(())
    }

    fn validate_server_settings(config: &ProxyConfig) -> ConfigResult<()> {
        if config.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port".to_string(),
                value: config.port.to_string(),
                reason: "Port must be > 0".to_string(),
            });
        }

        if config.max_payload_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_payload_size".to_string(),
                value: config.max_payload_size.to_string(),
                reason: "Must be > 0".to_string(),
            });
        }

        if let Some(0) = config.request_timeout_secs {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                value: "0".to_string(),
                reason: "Must be > 0 when set".to_string(),
            });
        }

        Ok(())
    }
}
