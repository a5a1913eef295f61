//! Platform HTTP API client
//!
//! Thin retrieval layer over the video platform's JSON endpoints. Each
//! `fetch_*` method is a zero-state async call suitable for wrapping in a
//! [`crate::loader::ResourceLoader`] closure; faults come back as `anyhow`
//! errors and are collapsed to the loader's single error kind there.

use crate::net::send_with_backoff;
use crate::types::{Channel, ChannelAnalytics, HistoryEntry};
use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use std::time::Duration;

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client")
    })
}

/// Client for the platform API. Cheap to clone; the underlying HTTP client
/// is shared process-wide.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    auth_token: Option<String>,
    timeout_ms: u64,
    retries: u8,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout_ms: u64, retries: u8) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            auth_token: None,
            timeout_ms,
            retries,
        }
    }

    /// Attach a bearer token to every request (recommended to avoid rate
    /// limits on authenticated endpoints).
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }

    /// Channel profile: `GET /api/channels/{id}`
    pub async fn fetch_channel(&self, channel_id: &str) -> Result<Channel> {
        log::info!("[tubex][api] Fetching channel {channel_id}");
        self.get_json(&format!("/api/channels/{channel_id}"), "channel")
            .await
    }

    /// Watch history: `GET /api/users/{id}/history`
    pub async fn fetch_history(&self, user_id: &str) -> Result<Vec<HistoryEntry>> {
        log::info!("[tubex][api] Fetching watch history for {user_id}");
        self.get_json(&format!("/api/users/{user_id}/history"), "history")
            .await
    }

    /// Daily analytics series: `GET /api/channels/{id}/analytics`
    pub async fn fetch_analytics(&self, channel_id: &str) -> Result<ChannelAnalytics> {
        log::info!("[tubex][api] Fetching analytics for {channel_id}");
        self.get_json(&format!("/api/channels/{channel_id}/analytics"), "analytics")
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, label: &str) -> Result<T> {
        let mut request = http_client()
            .get(format!("{}{}", self.base_url, path))
            .timeout(Duration::from_millis(self.timeout_ms));

        if let Some(token) = &self.auth_token {
            request = request.header("Authorization", format!("Bearer {token}"));
            log::debug!("[tubex][api] Using authentication token");
        }

        let response = send_with_backoff(request, label, self.retries)
            .await
            .map_err(|e| anyhow!("Failed to fetch {label}: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!("API error fetching {label} ({status}): {error_text}"));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| anyhow!("Failed to parse {label} response: {e}"))
    }
}
