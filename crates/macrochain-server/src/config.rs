//! Server Settings
//!
//! Read from the process environment after `.env` has been loaded.

use std::net::SocketAddr;

use macrochain_core::{AnalysisConfig, IntakeLimits};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has an invalid value: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("invalid bind address {0}")]
    BindAddress(String),
}

/// Console output style for the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
    pub title: String,
    pub description: String,
    pub version: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            title: "MacroChain AI API".to_string(),
            description: "AI-powered crypto market analysis agent".to_string(),
            version: "1.0.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive
    pub log_level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info,tower_http=debug".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub api: ApiSettings,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source; unset variables take
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_defaults = ApiSettings::default();
        let analysis_defaults = AnalysisConfig::default();
        let log_defaults = LoggingConfig::default();

        let api = ApiSettings {
            host: lookup("API_HOST").unwrap_or(api_defaults.host),
            port: parse(&lookup, "API_PORT", api_defaults.port)?,
            title: lookup("API_TITLE").unwrap_or(api_defaults.title),
            description: lookup("API_DESCRIPTION").unwrap_or(api_defaults.description),
            version: lookup("API_VERSION").unwrap_or(api_defaults.version),
        };

        let analysis = AnalysisConfig {
            limits: IntakeLimits {
                max_query_length: parse(
                    &lookup,
                    "MAX_ANALYSIS_LENGTH",
                    analysis_defaults.limits.max_query_length,
                )?,
                ..analysis_defaults.limits
            },
            timeout_secs: parse(&lookup, "ANALYSIS_TIMEOUT", analysis_defaults.timeout_secs)?,
            enable_macro: flag(&lookup, "ENABLE_MACRO_DATA", analysis_defaults.enable_macro)?,
            enable_sentiment: flag(&lookup, "ENABLE_SENTIMENT_DATA", analysis_defaults.enable_sentiment)?,
            enable_onchain: flag(&lookup, "ENABLE_ONCHAIN_DATA", analysis_defaults.enable_onchain)?,
            enable_market_structure: flag(
                &lookup,
                "ENABLE_MARKET_STRUCTURE_DATA",
                analysis_defaults.enable_market_structure,
            )?,
        };

        let format = match lookup("LOG_FORMAT") {
            None => log_defaults.format,
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "pretty" | "text" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::InvalidValue { var: "LOG_FORMAT", value: v }),
            },
        };
        let logging = LoggingConfig {
            log_level: lookup("LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(log_defaults.log_level),
            format,
        };

        Ok(Self { api, analysis, logging })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.api.host, self.api.port);
        addr.parse().map_err(|_| ConfigError::BindAddress(addr))
    }
}

fn parse<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}

fn flag<F>(lookup: &F, var: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.api.port, 8000);
        assert_eq!(settings.analysis.timeout_secs, 30);
        assert_eq!(settings.logging.log_level, "info,tower_http=debug");
        assert_eq!(settings.bind_addr().unwrap().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            ("API_PORT", "9100"),
            ("API_VERSION", "2.1.0"),
            ("MAX_ANALYSIS_LENGTH", "500"),
            ("ENABLE_ONCHAIN_DATA", "False"),
            ("LOG_FORMAT", "JSON"),
            ("RUST_LOG", "debug"),
        ])
        .unwrap();

        assert_eq!(settings.api.port, 9100);
        assert_eq!(settings.api.version, "2.1.0");
        assert_eq!(settings.analysis.limits.max_query_length, 500);
        assert_eq!(settings.analysis.limits.max_assets, 10);
        assert!(!settings.analysis.enable_onchain);
        assert!(settings.analysis.enable_macro);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.logging.log_level, "debug");
    }

    #[test]
    fn test_log_level_preferred_over_rust_log() {
        let settings = settings(&[("LOG_LEVEL", "warn"), ("RUST_LOG", "trace")]).unwrap();
        assert_eq!(settings.logging.log_level, "warn");
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            settings(&[("API_PORT", "eighty")]).unwrap_err(),
            ConfigError::InvalidValue {
                var: "API_PORT",
                value: "eighty".into()
            }
        );
        assert!(settings(&[("ENABLE_MACRO_DATA", "maybe")]).is_err());
        assert!(settings(&[("LOG_FORMAT", "xml")]).is_err());
    }
}
