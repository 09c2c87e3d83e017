// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Bridge configuration

use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use family_hub_types::{DEFAULT_SCAN_INTERVAL, REQUEST_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

const ADDON_OPTIONS_PATH: &str = "/data/options.json";
const DEV_CONFIG_PATH: &str = "config.toml";

/// Shortest polling interval accepted, to keep load on the hub reasonable
const MIN_SCAN_INTERVAL_SECS: u64 = 30;

fn default_scan_interval_secs() -> u64 {
    DEFAULT_SCAN_INTERVAL.as_secs()
}

fn default_request_timeout_secs() -> u64 {
    REQUEST_TIMEOUT.as_secs()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamilyHubConfig {
    /// Base URL of the hub, e.g. http://familyhub.local:8080
    #[serde(default)]
    pub url: String,

    /// API token created in the hub's admin page
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HomeAssistantConfig {
    /// Falls back to HA_BASE_URL, then the Supervisor API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Long-lived access token; falls back to HA_TOKEN, then SUPERVISOR_TOKEN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub family_hub: FamilyHubConfig,

    #[serde(default)]
    pub home_assistant: HomeAssistantConfig,

    /// How often to poll the hub (seconds)
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,

    /// Total timeout of a single hub request (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// IANA zone used to decide what "today" is; host local time if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Flat layout of the HA addon options page
///
/// Accepts both "url"/"token" and the prefixed "family_hub_url"/"family_hub_token"
#[derive(Debug, Deserialize)]
struct AddonOptions {
    #[serde(alias = "family_hub_url")]
    url: String,

    #[serde(alias = "family_hub_token", alias = "api_token")]
    token: String,

    #[serde(default = "default_scan_interval_secs", alias = "scan_interval")]
    scan_interval_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    #[serde(default)]
    timezone: Option<String>,
}

impl From<AddonOptions> for BridgeConfig {
    fn from(options: AddonOptions) -> Self {
        Self {
            family_hub: FamilyHubConfig {
                url: options.url,
                token: options.token,
            },
            home_assistant: HomeAssistantConfig::default(),
            scan_interval_secs: options.scan_interval_secs,
            request_timeout_secs: options.request_timeout_secs,
            timezone: options.timezone.filter(|tz| !tz.trim().is_empty()),
        }
    }
}

/// Flat addon options are tried first; they need both url and token
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonConfig {
    Addon(AddonOptions),
    Nested(BridgeConfig),
}

impl From<JsonConfig> for BridgeConfig {
    fn from(config: JsonConfig) -> Self {
        match config {
            JsonConfig::Addon(options) => options.into(),
            JsonConfig::Nested(config) => config,
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            family_hub: FamilyHubConfig::default(),
            home_assistant: HomeAssistantConfig::default(),
            scan_interval_secs: default_scan_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            timezone: None,
        }
    }
}

impl BridgeConfig {
    /// Load configuration
    ///
    /// 1. Explicit path, if given
    /// 2. /data/options.json (HA addon options)
    /// 3. config.toml (development)
    /// 4. Defaults
    ///
    /// Environment overrides are applied on top, then the result is validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(ADDON_OPTIONS_PATH).exists() => {
                Self::from_file(Path::new(ADDON_OPTIONS_PATH))?
            }
            None if Path::new(DEV_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEV_CONFIG_PATH))?
            }
            None => {
                info!("No config file found, using defaults with env overrides");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file; `.json` files as JSON, everything else as TOML
    ///
    /// JSON files may use either the nested layout of config.toml or the flat
    /// addon options layout (`url`, `token`, `scan_interval_secs`, `timezone`).
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str::<JsonConfig>(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
                .into()
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        };

        info!("✅ Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `FAMILY_HUB_*` overrides using `lookup` to read variables
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("FAMILY_HUB_URL") {
            self.family_hub.url = url;
        }
        if let Some(token) = lookup("FAMILY_HUB_TOKEN")
            && !token.trim().is_empty()
        {
            self.family_hub.token = token;
        }
        if let Some(secs) = lookup("FAMILY_HUB_SCAN_INTERVAL_SECS")
            && let Ok(n) = secs.parse::<u64>()
        {
            self.scan_interval_secs = n;
        }
        if let Some(tz) = lookup("FAMILY_HUB_TIMEZONE") {
            self.timezone = Some(tz);
        }
    }

    fn normalize(&mut self) {
        self.family_hub.url = self.family_hub.url.trim().trim_end_matches('/').to_owned();
        self.family_hub.token = self.family_hub.token.trim().to_owned();
    }

    pub fn validate(&self) -> Result<()> {
        let url = &self.family_hub.url;
        if url.is_empty() {
            anyhow::bail!("family_hub.url is not set (config file or FAMILY_HUB_URL)");
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("family_hub.url must start with http:// or https://, got '{url}'");
        }
        if self.family_hub.token.is_empty() {
            anyhow::bail!("family_hub.token is not set (config file or FAMILY_HUB_TOKEN)");
        }
        if self.scan_interval_secs < MIN_SCAN_INTERVAL_SECS {
            anyhow::bail!(
                "scan_interval_secs must be at least {MIN_SCAN_INTERVAL_SECS}, got {}",
                self.scan_interval_secs
            );
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }
        self.parsed_timezone()?;
        Ok(())
    }

    pub fn parsed_timezone(&self) -> Result<Option<Tz>> {
        self.timezone
            .as_deref()
            .map(|tz| {
                tz.parse::<Tz>()
                    .map_err(|e| anyhow!("Invalid timezone '{tz}': {e}"))
            })
            .transpose()
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
