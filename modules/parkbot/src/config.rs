use std::time::Duration;

use thiserror::Error;

use crate::scheduler::DEFAULT_INTERVAL;

pub const DEFAULT_HANDLE: &str = "npsunitshourly.bsky.social";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{key} must be a number, got {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
/// Built once in `main` and handed to each collaborator.
#[derive(Clone)]
pub struct Config {
    // Registries
    pub nps_api_key: String,
    pub recreation_gov_api_key: String,

    // Image search
    pub bing_api_key: String,

    // Bluesky
    pub bluesky_handle: String,
    pub bluesky_password: String,

    // Liveness endpoint
    pub port: u16,

    // Scheduler
    pub post_interval: Duration,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let post_interval = match get("POST_INTERVAL_SECS") {
            Some(value) => value
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    key: "POST_INTERVAL_SECS",
                    value,
                })?,
            None => DEFAULT_INTERVAL,
        };

        Ok(Self {
            nps_api_key: required("NPS_API_KEY")?,
            recreation_gov_api_key: required("RECREATION_GOV_API_KEY")?,
            bing_api_key: required("BING_API_KEY")?,
            bluesky_handle: get("BLUESKY_HANDLE").unwrap_or_else(|| DEFAULT_HANDLE.to_string()),
            bluesky_password: required("BLUESKY_PASSWORD")?,
            port,
            post_interval,
        })
    }

    pub fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            let n = val.char_indices().nth(5).map(|(i, _)| i).unwrap_or(val.len());
            format!("{}...({} chars)", &val[..n], val.chars().count())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  NPS_API_KEY: {}", preview(&self.nps_api_key));
        tracing::info!("  RECREATION_GOV_API_KEY: {}", preview(&self.recreation_gov_api_key));
        tracing::info!("  BING_API_KEY: {}", preview(&self.bing_api_key));
        tracing::info!("  BLUESKY_HANDLE: {}", self.bluesky_handle);
        tracing::info!("  BLUESKY_PASSWORD: <{} chars>", self.bluesky_password.chars().count());
        tracing::info!("  PORT: {}", self.port);
        tracing::info!("  POST_INTERVAL_SECS: {}", self.post_interval.as_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("NPS_API_KEY", "nps-key"),
        ("RECREATION_GOV_API_KEY", "ridb-key"),
        ("BING_API_KEY", "bing-key"),
        ("BLUESKY_PASSWORD", "app-password"),
    ];

    #[test]
    fn defaults_apply_when_optional_vars_unset() {
        let config = Config::from_lookup(lookup(REQUIRED)).unwrap();
        assert_eq!(config.bluesky_handle, DEFAULT_HANDLE);
        assert_eq!(config.port, 8080);
        assert_eq!(config.post_interval, Duration::from_secs(3600));
        assert_eq!(config.bing_api_key, "bing-key");
    }

    #[test]
    fn overrides_are_read() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "9090"));
        pairs.push(("POST_INTERVAL_SECS", "60"));
        pairs.push(("BLUESKY_HANDLE", "parks.example.social"));

        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.post_interval, Duration::from_secs(60));
        assert_eq!(config.bluesky_handle, "parks.example.social");
    }

    #[test]
    fn missing_required_var_is_reported() {
        let pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "BING_API_KEY")
            .collect();
        let err = Config::from_lookup(lookup(&pairs)).err().unwrap();
        assert!(matches!(err, ConfigError::Missing("BING_API_KEY")));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs.retain(|(k, _)| *k != "BLUESKY_PASSWORD");
        pairs.push(("BLUESKY_PASSWORD", "  "));
        let err = Config::from_lookup(lookup(&pairs)).err().unwrap();
        assert!(matches!(err, ConfigError::Missing("BLUESKY_PASSWORD")));
    }

    #[test]
    fn bad_port_is_invalid() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));
        let err = Config::from_lookup(lookup(&pairs)).err().unwrap();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}
