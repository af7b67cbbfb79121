//! Provider-level configuration (layered: code > env > defaults).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::options::ChatSettings;

/// Environment variable holding the engine's base URL.
pub const BASE_URL_ENV: &str = "LMSTUDIO_BASE_URL";

/// Where the engine listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "ws://127.0.0.1:1234";

/// Settings shared by every model created from one provider.
///
/// The engine-specific fields are the lowest layer of the option merge;
/// per-call options and the per-call provider block stack on top of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    /// Engine endpoint, e.g. `ws://192.168.1.100:1234` (no trailing slash).
    #[serde(default, rename = "baseURL", alias = "baseUrl", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(flatten)]
    pub chat: ChatSettings,
}

impl ProviderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from environment variables (`LMSTUDIO_BASE_URL`), reading `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: lookup(BASE_URL_ENV).filter(|url| !url.trim().is_empty()),
            chat: ChatSettings::default(),
        }
    }

    /// Parse settings from TOML, using the engine's field names.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|err| BridgeError::configuration("settings", err.to_string()))
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|err| {
            BridgeError::configuration(path.display().to_string(), err.to_string())
        })?;
        Self::from_toml_str(&source)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_chat(mut self, chat: ChatSettings) -> Self {
        self.chat = chat;
        self
    }

    /// Fill unset values from `lower`; values set here win.
    pub fn or(self, lower: Self) -> Self {
        Self {
            base_url: self.base_url.or(lower.base_url),
            chat: self.chat.layer_over(lower.chat),
        }
    }

    /// The configured base URL, or the local default.
    pub fn base_url_or_default(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}
