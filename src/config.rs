//! Runtime configuration
//!
//! Read once from the environment at startup.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::api::DEFAULT_API_URL;
use crate::controllers::DEFAULT_DEBOUNCE;
use crate::session::SessionSettings;

pub const API_URL_VAR: &str = "NUTRILIN_API_URL";
pub const CHART_PATH_VAR: &str = "NUTRILIN_CHART_PATH";
pub const DEBOUNCE_VAR: &str = "NUTRILIN_DEBOUNCE_MS";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a whole number of milliseconds, got {value:?}")]
    InvalidDebounce { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the search and calculation services
    pub api_url: String,
    /// Where to rewrite the pie chart PNG after each new result
    pub chart_path: Option<PathBuf>,
    /// Quiet period for both search and calculation
    pub debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            chart_path: None,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment, or a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup(API_URL_VAR) {
            let url = url.trim();
            if url.is_empty() {
                return Err(ConfigError::Empty { var: API_URL_VAR });
            }
            config.api_url = url.to_string();
        }

        if let Some(path) = lookup(CHART_PATH_VAR) {
            if !path.trim().is_empty() {
                config.chart_path = Some(PathBuf::from(path));
            }
        }

        if let Some(value) = lookup(DEBOUNCE_VAR) {
            let ms = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidDebounce { var: DEBOUNCE_VAR, value: value.clone() })?;
            config.debounce = Duration::from_millis(ms);
        }

        Ok(config)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            search_debounce: self.debounce,
            calculation_debounce: self.debounce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.debounce, Duration::from_millis(400));
        assert_eq!(config.api_url, "https://www.nutritionall.xyz/api");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (API_URL_VAR, " http://localhost:3000/api "),
            (CHART_PATH_VAR, "/tmp/meal.png"),
            (DEBOUNCE_VAR, "250"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "http://localhost:3000/api");
        assert_eq!(config.chart_path, Some(PathBuf::from("/tmp/meal.png")));
        assert_eq!(config.session_settings().calculation_debounce, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup_from(&[(DEBOUNCE_VAR, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDebounce { .. }));

        let err = Config::from_lookup(lookup_from(&[(API_URL_VAR, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty { var: API_URL_VAR });
    }
}
