use anyhow::{Context, Result, anyhow};
use std::env;
use std::time::Duration;

use crate::types::Coordinates;

pub const DEFAULT_API_BASE: &str = "https://api.diagnoai.uz";
pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    Uz,
    Ru,
    En,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Uz => "uz",
            Locale::Ru => "ru",
            Locale::En => "en",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "uz" => Some(Locale::Uz),
            "ru" => Some(Locale::Ru),
            "en" => Some(Locale::En),
            _ => None,
        }
    }
}

/// Runtime settings for the API client and the app shell.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub api_base: String,
    pub locale: Locale,
    pub access_token: Option<String>,
    pub device_location: Option<Coordinates>,
    pub location_timeout: Duration,
    pub log_level: tracing::Level,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            locale: Locale::default(),
            access_token: None,
            device_location: None,
            location_timeout: DEFAULT_LOCATION_TIMEOUT,
            log_level: tracing::Level::INFO,
        }
    }
}

impl ClientConfig {
    /// Build the configuration from `DIAGNOAI_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = ClientConfig::default();

        if let Some(base) = get("DIAGNOAI_API_BASE") {
            config.api_base = normalize_base(&base)?;
        }

        if let Some(raw) = get("DIAGNOAI_LOCALE") {
            config.locale = Locale::parse(&raw)
                .ok_or_else(|| anyhow!("DIAGNOAI_LOCALE must be one of uz, ru, en (got {raw})"))?;
        }

        config.access_token = get("DIAGNOAI_ACCESS_TOKEN");

        match (get("DIAGNOAI_LATITUDE"), get("DIAGNOAI_LONGITUDE")) {
            (Some(lat), Some(lon)) => {
                let latitude = lat
                    .parse::<f64>()
                    .with_context(|| format!("invalid DIAGNOAI_LATITUDE: {lat}"))?;
                let longitude = lon
                    .parse::<f64>()
                    .with_context(|| format!("invalid DIAGNOAI_LONGITUDE: {lon}"))?;
                config.device_location = Some(Coordinates {
                    latitude,
                    longitude,
                });
            }
            (None, None) => {}
            _ => {
                return Err(anyhow!(
                    "DIAGNOAI_LATITUDE and DIAGNOAI_LONGITUDE must be set together"
                ));
            }
        }

        if let Some(raw) = get("DIAGNOAI_LOCATION_TIMEOUT_MS") {
            let millis = raw
                .parse::<u64>()
                .with_context(|| format!("invalid DIAGNOAI_LOCATION_TIMEOUT_MS: {raw}"))?;
            config.location_timeout = Duration::from_millis(millis);
        }

        if let Some(raw) = get("DIAGNOAI_LOG") {
            config.log_level = raw
                .parse::<tracing::Level>()
                .map_err(|_| anyhow!("invalid DIAGNOAI_LOG level: {raw}"))?;
        }

        Ok(config)
    }
}

fn normalize_base(raw: &str) -> Result<String> {
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(anyhow!(
            "DIAGNOAI_API_BASE must start with http:// or https:// (got {raw})"
        ));
    }
    let url = reqwest::Url::parse(raw).with_context(|| format!("invalid DIAGNOAI_API_BASE: {raw}"))?;
    if url.query().is_some() {
        return Err(anyhow!("DIAGNOAI_API_BASE must not carry a query (got {raw})"));
    }
    Ok(raw.trim_end_matches('/').to_string())
}
