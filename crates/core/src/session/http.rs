//! HTTP implementation of the session store.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::config::BackendConfig;
use crate::metrics;
use crate::query::QueryState;

use super::types::{SessionError, SessionSnapshot, SessionStore};

/// Response envelope of `GET /api/session-state`.
///
/// The state object may be present but hollow (all-null fields) when the
/// session exists but nothing has been saved yet, so it is inspected as raw
/// JSON before the strict decode.
#[derive(Debug, Deserialize)]
struct SnapshotEnvelope {
    #[serde(default)]
    state: Option<serde_json::Value>,
}

/// Session store talking to `/api/session-state` with cookie credentials.
pub struct HttpSessionStore {
    client: Client,
    base_url: String,
}

impl HttpSessionStore {
    /// Create a store with its own cookie-carrying client.
    pub fn new(config: &BackendConfig) -> Result<Self, SessionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .cookie_store(true)
            .build()
            .map_err(|e| SessionError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Create a store over an existing client, sharing its cookie jar.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/session-state", self.base_url)
    }
}

fn map_transport(e: reqwest::Error) -> SessionError {
    if e.is_timeout() {
        SessionError::Transport("request timed out".to_string())
    } else {
        SessionError::Transport(e.to_string())
    }
}

#[async_trait]
impl SessionStore for HttpSessionStore {
    async fn save(&self, state: &QueryState) -> Result<(), SessionError> {
        let snapshot = SessionSnapshot::from(state);

        let started = Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .json(&snapshot)
            .send()
            .await
            .map_err(map_transport)?;
        metrics::REQUEST_DURATION
            .with_label_values(&["session_save"])
            .observe(started.elapsed().as_secs_f64());

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SessionError::Transport(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        debug!("Session snapshot saved");
        Ok(())
    }

    async fn load(&self) -> Result<Option<QueryState>, SessionError> {
        let started = Instant::now();
        let response = self
            .client
            .get(self.endpoint())
            .send()
            .await
            .map_err(map_transport)?;
        metrics::REQUEST_DURATION
            .with_label_values(&["session_load"])
            .observe(started.elapsed().as_secs_f64());

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // Not logged in or session expired: same as having no snapshot.
            debug!("Session load returned 401, treating as no snapshot");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SessionError::Transport(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let envelope: SnapshotEnvelope = response
            .json()
            .await
            .map_err(|e| SessionError::Malformed(format!("session envelope: {}", e)))?;

        let Some(raw) = envelope.state else {
            return Ok(None);
        };

        // A session that has never saved state comes back with null fields.
        if raw.get("browseType").map(|v| v.is_string()) != Some(true) {
            return Ok(None);
        }

        let snapshot: SessionSnapshot = serde_json::from_value(raw)
            .map_err(|e| SessionError::Malformed(format!("session snapshot: {}", e)))?;

        QueryState::try_from(snapshot).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_hollow_state_means_no_snapshot() {
        let envelope: SnapshotEnvelope =
            serde_json::from_str(r#"{"status": "success", "state": {"browseType": null}}"#)
                .unwrap();
        let raw = envelope.state.unwrap();
        assert_ne!(raw.get("browseType").map(|v| v.is_string()), Some(true));
    }

    #[test]
    fn test_envelope_without_state() {
        let envelope: SnapshotEnvelope = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert!(envelope.state.is_none());
    }
}
