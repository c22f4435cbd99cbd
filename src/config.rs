//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::llm::{LlmBackend, LlmConfig};
use crate::schools::RecommenderConfig;
use crate::session::ControllerConfig;

/// Application configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub recommender: RecommenderConfig,
    pub controller: ControllerConfig,
    /// Port for the REST/WebSocket server. `None` disables it.
    pub port: Option<u16>,
    /// Skip the terminal form and only serve HTTP.
    pub headless: bool,
    /// Optional curated school list.
    pub catalog_path: Option<PathBuf>,
    /// Directory for daily rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend: LlmBackend = match lookup("SCHOOL_MATCH_BACKEND") {
            Some(raw) => raw.parse()?,
            None => LlmBackend::Gemini,
        };

        let api_key = lookup(backend.api_key_var())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(backend.api_key_var().to_string()))?;

        let model = lookup("SCHOOL_MATCH_MODEL")
            .unwrap_or_else(|| backend.default_model().to_string());

        let defaults = RecommenderConfig::default();
        let recommender = RecommenderConfig {
            max_results: parse_or(&lookup, "SCHOOL_MATCH_MAX_RESULTS", defaults.max_results)?,
            temperature: parse_or(&lookup, "SCHOOL_MATCH_TEMPERATURE", defaults.temperature)?,
            max_tokens: parse_or(&lookup, "SCHOOL_MATCH_MAX_TOKENS", defaults.max_tokens)?,
        };
        if recommender.max_results == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SCHOOL_MATCH_MAX_RESULTS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let timeout_secs: Option<u64> = parse_opt(&lookup, "SCHOOL_MATCH_TIMEOUT_SECS")?;
        let controller = ControllerConfig {
            request_timeout: timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
        };

        let port: u16 = parse_or(&lookup, "SCHOOL_MATCH_PORT", 8080)?;

        let headless = lookup("SCHOOL_MATCH_HEADLESS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            llm: LlmConfig {
                backend,
                api_key: secrecy::SecretString::from(api_key),
                model,
            },
            recommender,
            controller,
            port: (port != 0).then_some(port),
            headless,
            catalog_path: lookup("SCHOOL_MATCH_CATALOG").map(PathBuf::from),
            log_dir: lookup("SCHOOL_MATCH_LOG_DIR").map(PathBuf::from),
        })
    }
}

fn parse_opt<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
        None => Ok(None),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_to_gemini() {
        let config = config(&[("GEMINI_API_KEY", "g-key")]).unwrap();
        assert_eq!(config.llm.backend, LlmBackend::Gemini);
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.llm.api_key.expose_secret(), "g-key");
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.recommender.max_results, 5);
        assert!(config.controller.request_timeout.is_none());
        assert!(!config.headless);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn missing_key_for_backend() {
        let err = config(&[("SCHOOL_MATCH_BACKEND", "anthropic"), ("GEMINI_API_KEY", "g")])
            .unwrap_err();
        match err {
            ConfigError::MissingEnvVar(var) => assert_eq!(var, "ANTHROPIC_API_KEY"),
            other => panic!("expected MissingEnvVar, got {other:?}"),
        }
    }

    #[test]
    fn overrides_are_applied() {
        let config = config(&[
            ("SCHOOL_MATCH_BACKEND", "openai"),
            ("OPENAI_API_KEY", "sk"),
            ("SCHOOL_MATCH_MODEL", "gpt-4o-mini"),
            ("SCHOOL_MATCH_PORT", "0"),
            ("SCHOOL_MATCH_HEADLESS", "true"),
            ("SCHOOL_MATCH_TIMEOUT_SECS", "30"),
            ("SCHOOL_MATCH_MAX_RESULTS", "3"),
            ("SCHOOL_MATCH_CATALOG", "/tmp/escuelas.json"),
        ])
        .unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.port, None);
        assert!(config.headless);
        assert_eq!(config.controller.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.recommender.max_results, 3);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/escuelas.json")));
    }

    #[test]
    fn invalid_number_is_reported() {
        let err = config(&[("GEMINI_API_KEY", "g"), ("SCHOOL_MATCH_PORT", "abc")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "SCHOOL_MATCH_PORT"));
    }

    #[test]
    fn zero_results_rejected() {
        let err = config(&[("GEMINI_API_KEY", "g"), ("SCHOOL_MATCH_MAX_RESULTS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
