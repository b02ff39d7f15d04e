//! HTTP implementation of the suggestion service.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::BackendConfig;
use crate::metrics;

use super::types::{SuggestBackend, SuggestError, Suggestion};

/// Suggestion backend talking to `/autocomplete-movie-search`.
pub struct HttpSuggestBackend {
    client: Client,
    base_url: String,
}

impl HttpSuggestBackend {
    /// Create a backend with its own cookie-carrying client.
    pub fn new(config: &BackendConfig) -> Result<Self, SuggestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .cookie_store(true)
            .build()
            .map_err(|e| SuggestError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Create a backend over an existing client, sharing its cookie jar.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SuggestBackend for HttpSuggestBackend {
    async fn suggest(&self, title: &str) -> Result<Vec<Suggestion>, SuggestError> {
        let url = format!("{}/autocomplete-movie-search", self.base_url);

        debug!(title = title, "Fetching title suggestions");

        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&[("title", title)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SuggestError::Transport("request timed out".to_string())
                } else {
                    SuggestError::Transport(e.to_string())
                }
            })?;
        metrics::REQUEST_DURATION
            .with_label_values(&["autocomplete"])
            .observe(started.elapsed().as_secs_f64());

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(SuggestError::Transport("not authorized".to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SuggestError::Transport(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SuggestError::Malformed(format!("suggestion list: {}", e)))
    }
}
