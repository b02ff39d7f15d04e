use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub autocomplete: AutocompleteConfig,
}

/// Retrieval service connection configuration, shared by the catalog,
/// session, and suggestion gateways.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the backend (e.g. "http://localhost:8080").
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

/// Suggestion lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AutocompleteConfig {
    /// Debounce applied before a cache miss hits the network.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Queries shorter than this never trigger a request.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    4
}
