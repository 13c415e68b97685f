//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Delays used by the scripted conversation stages.
///
/// These are presentation pacing only — nothing downstream depends on their
/// exact values, and tests drive them with a paused clock.
#[derive(Debug, Clone)]
pub struct ScriptTimings {
    /// Delay before the greeting typing indicator appears.
    pub greeting_typing: Duration,
    /// Delay before the greeting prompt replaces the typing indicator.
    pub greeting_reveal: Duration,
    /// Delay before the account-choice bubble appears.
    pub choice_reveal: Duration,
    /// Delay before the account-created confirmation replaces its typing indicator.
    pub account_confirm: Duration,
    /// Delay before the photo-access prompt and thumbnail grid appear.
    pub photos_prompt: Duration,
    /// Delay before the upload progress bubble appears (upload then starts).
    pub upload_start: Duration,
    /// Delay before the search typing indicator appears after a query.
    pub search_typing: Duration,
    /// Delay before search results replace the typing indicator.
    pub search_reveal: Duration,
    /// Period of the simulated upload tick.
    pub upload_tick: Duration,
    /// Trailing delay between the last tick and upload completion.
    pub upload_trailing: Duration,
}

impl Default for ScriptTimings {
    fn default() -> Self {
        Self {
            greeting_typing: Duration::from_millis(500),
            greeting_reveal: Duration::from_millis(1000),
            choice_reveal: Duration::from_millis(1500),
            account_confirm: Duration::from_millis(1000),
            photos_prompt: Duration::from_millis(2000),
            upload_start: Duration::from_millis(4000),
            search_typing: Duration::from_millis(100),
            search_reveal: Duration::from_millis(400),
            upload_tick: Duration::from_millis(250),
            upload_trailing: Duration::from_millis(500),
        }
    }
}

/// App configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base address of the remote photo store, e.g. "http://localhost:8081".
    pub store_base_url: String,
    /// Scripted stage delays.
    pub timings: ScriptTimings,
    /// Number of items the simulated upload run targets.
    pub upload_total: u32,
    /// Maximum number of search results per query.
    pub result_limit: usize,
    /// Fabricated "MB saved" per uploaded item (flavor text only).
    pub saved_mb_per_item: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_base_url: "http://localhost:8081".to_string(),
            timings: ScriptTimings::default(),
            upload_total: 12,
            result_limit: 4,
            saved_mb_per_item: 2.3,
        }
    }
}

impl AppConfig {
    /// Defaults with environment overrides applied (`CLOUDSNAP_STORE_URL`).
    pub fn from_env() -> crate::error::Result<Self> {
        let mut cfg = Self::default();
        if let Ok(url) = std::env::var("CLOUDSNAP_STORE_URL") {
            cfg = cfg.with_store_url(&url)?;
        }
        Ok(cfg)
    }

    /// Override the store address. The client only speaks plain HTTP(S), so
    /// anything else is rejected up front rather than at the first request.
    pub fn with_store_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "CLOUDSNAP_STORE_URL".to_string(),
                message: format!("expected an http(s) URL, got {url:?}"),
            });
        }
        self.store_base_url = url.trim_end_matches('/').to_string();
        Ok(self)
    }
}
