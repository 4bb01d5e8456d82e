//! Engine configuration, read from the environment (and an optional `.env`).

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};
use validator::Validate;

use crate::error::{EngineError, Result};
use crate::rulebook::RuleBook;
use crate::scoring::four_axis::FacilitatorMode;
use crate::telemetry::LogFormat;
use crate::transcript::jump::DEFAULT_WINDOW_SIZE;
use crate::transcript::tokenizer::{ANALYSIS_LABEL_MAX_CHARS, SCORING_LABEL_MAX_CHARS};

pub const ENV_WINDOW_SIZE: &str = "GIRON_WINDOW_SIZE";
pub const ENV_DETAIL_CONTEXT: &str = "GIRON_DETAIL_CONTEXT";
pub const ENV_ANALYSIS_LABEL_MAX: &str = "GIRON_ANALYSIS_LABEL_MAX";
pub const ENV_SCORING_LABEL_MAX: &str = "GIRON_SCORING_LABEL_MAX";
pub const ENV_FACILITATOR: &str = "GIRON_FACILITATOR";
pub const ENV_RULES_FILE: &str = "GIRON_RULES_FILE";
pub const ENV_LOG_FORMAT: &str = "GIRON_LOG_FORMAT";

/// Default number of lines shown before a decision in the detail view.
pub const DEFAULT_DETAIL_CONTEXT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EngineConfig {
    /// Lines before a decision searched for links.
    #[validate(range(min = 1, max = 50))]
    pub window_size: usize,
    /// Lines before a decision shown in its detail view.
    #[validate(range(min = 1, max = 50))]
    pub detail_context_size: usize,
    #[validate(range(min = 1, max = 64))]
    pub analysis_label_max_chars: usize,
    #[validate(range(min = 1, max = 64))]
    pub scoring_label_max_chars: usize,
    pub facilitator: FacilitatorMode,
    /// JSON rule book replacing the built-in rules.
    pub rules_file: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            detail_context_size: DEFAULT_DETAIL_CONTEXT,
            analysis_label_max_chars: ANALYSIS_LABEL_MAX_CHARS,
            scoring_label_max_chars: SCORING_LABEL_MAX_CHARS,
            facilitator: FacilitatorMode::default(),
            rules_file: None,
            log_format: LogFormat::default(),
        }
    }
}

/// Read and parse an optional environment variable.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| EngineError::Config(format!("{}={:?}: {}", key, raw, e))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(EngineError::Config(format!("{}: {}", key, e))),
    }
}

impl EngineConfig {
    /// Load `.env` when present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        match dotenv::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }
        Self::from_process_env()
    }

    /// Read the process environment only. Unset variables keep their defaults.
    pub fn from_process_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = env_parse(ENV_WINDOW_SIZE)? {
            config.window_size = v;
        }
        if let Some(v) = env_parse(ENV_DETAIL_CONTEXT)? {
            config.detail_context_size = v;
        }
        if let Some(v) = env_parse(ENV_ANALYSIS_LABEL_MAX)? {
            config.analysis_label_max_chars = v;
        }
        if let Some(v) = env_parse(ENV_SCORING_LABEL_MAX)? {
            config.scoring_label_max_chars = v;
        }
        if let Some(v) = env_parse(ENV_FACILITATOR)? {
            config.facilitator = v;
        }
        if let Some(v) = env_parse::<PathBuf>(ENV_RULES_FILE)? {
            config.rules_file = Some(v);
        }
        if let Some(v) = env_parse(ENV_LOG_FORMAT)? {
            config.log_format = v;
        }

        config.validate()?;
        info!(
            window_size = config.window_size,
            facilitator = %config.facilitator,
            rules_file = ?config.rules_file,
            "Engine configuration loaded"
        );
        Ok(config)
    }

    /// The configured rule book, or the built-in one.
    pub fn load_rule_book(&self) -> Result<RuleBook> {
        match &self.rules_file {
            Some(path) => RuleBook::from_file(path),
            None => Ok(RuleBook::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KEYS: [&str; 7] = [
        ENV_WINDOW_SIZE,
        ENV_DETAIL_CONTEXT,
        ENV_ANALYSIS_LABEL_MAX,
        ENV_SCORING_LABEL_MAX,
        ENV_FACILITATOR,
        ENV_RULES_FILE,
        ENV_LOG_FORMAT,
    ];

    fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let mut all: Vec<(&str, Option<&str>)> = ALL_KEYS.iter().map(|k| (*k, None)).collect();
        for (key, value) in vars {
            if let Some(slot) = all.iter_mut().find(|(k, _)| k == key) {
                slot.1 = Some(*value);
            }
        }
        temp_env::with_vars(all, f);
    }

    #[test]
    fn test_defaults() {
        with_env(&[], || {
            let config = EngineConfig::from_process_env().unwrap();
            assert_eq!(config, EngineConfig::default());
            assert_eq!(config.window_size, 3);
            assert_eq!(config.detail_context_size, 5);
            assert_eq!(config.analysis_label_max_chars, 12);
            assert_eq!(config.scoring_label_max_chars, 30);
            assert_eq!(config.facilitator, FacilitatorMode::Auto);
        });
    }

    #[test]
    fn test_reads_every_variable() {
        with_env(
            &[
                (ENV_WINDOW_SIZE, "5"),
                (ENV_DETAIL_CONTEXT, " 8 "),
                (ENV_ANALYSIS_LABEL_MAX, "20"),
                (ENV_SCORING_LABEL_MAX, "40"),
                (ENV_FACILITATOR, "Mami"),
                (ENV_RULES_FILE, "/tmp/rules.json"),
                (ENV_LOG_FORMAT, "bunyan"),
            ],
            || {
                let config = EngineConfig::from_process_env().unwrap();
                assert_eq!(config.window_size, 5);
                assert_eq!(config.detail_context_size, 8);
                assert_eq!(config.analysis_label_max_chars, 20);
                assert_eq!(config.scoring_label_max_chars, 40);
                assert_eq!(config.facilitator, FacilitatorMode::Named("Mami".into()));
                assert_eq!(config.rules_file, Some(PathBuf::from("/tmp/rules.json")));
                assert_eq!(config.log_format, LogFormat::Bunyan);
            },
        );
    }

    #[test]
    fn test_unparsable_value_is_config_error() {
        with_env(&[(ENV_WINDOW_SIZE, "three")], || {
            let err = EngineConfig::from_process_env().unwrap_err();
            assert!(matches!(err, EngineError::Config(_)));
        });
    }

    #[test]
    fn test_out_of_range_value_fails_validation() {
        with_env(&[(ENV_WINDOW_SIZE, "0")], || {
            let err = EngineConfig::from_process_env().unwrap_err();
            assert!(matches!(err, EngineError::Validation(_)));
        });

        with_env(&[(ENV_SCORING_LABEL_MAX, "65")], || {
            assert!(EngineConfig::from_process_env().is_err());
        });
    }

    #[test]
    fn test_default_rule_book_without_file() {
        let book = EngineConfig::default().load_rule_book().unwrap();
        assert_eq!(book, RuleBook::default());
    }

    #[test]
    fn test_missing_rule_file_is_reported() {
        let config = EngineConfig {
            rules_file: Some(PathBuf::from("/no/such/rules.json")),
            ..EngineConfig::default()
        };
        assert!(matches!(config.load_rule_book(), Err(EngineError::Io(_))));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "window_size": 4, "facilitator": "disabled" }"#).unwrap();
        assert_eq!(config.window_size, 4);
        assert_eq!(config.facilitator, FacilitatorMode::Disabled);
        assert_eq!(config.detail_context_size, 5);
    }
}
