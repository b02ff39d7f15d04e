use super::{types::Config, ConfigError};

/// Validate a loaded configuration beyond what deserialization checks.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let base_url = config.backend.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::Invalid(
            "backend.base_url must not be empty".to_string(),
        ));
    }
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Invalid(format!(
            "backend.base_url must be an http(s) URL, got {:?}",
            base_url
        )));
    }

    if config.backend.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "backend.timeout_secs must be greater than zero".to_string(),
        ));
    }

    if config.autocomplete.min_query_len == 0 {
        return Err(ConfigError::Invalid(
            "autocomplete.min_query_len must be at least 1".to_string(),
        ));
    }

    Ok(())
}
