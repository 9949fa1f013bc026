use std::env;
use std::str::FromStr;

use hangman_core::DEFAULT_ATTEMPTS_ALLOWED;
use hangman_persistence::connection::DEFAULT_DATABASE_URL;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("{key} must be at least {min}, got {value}")]
    OutOfRange {
        key: &'static str,
        min: i64,
        value: i64,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub attempts_allowed: i32,
    pub average_refresh_seconds: u64,
    pub words_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            attempts_allowed: parse_or(&lookup, "ATTEMPTS_ALLOWED", defaults.attempts_allowed)?,
            average_refresh_seconds: parse_or(
                &lookup,
                "AVERAGE_REFRESH_SECONDS",
                defaults.average_refresh_seconds,
            )?,
            words_file: lookup("WORDS_FILE").filter(|path| !path.trim().is_empty()),
        };

        if config.attempts_allowed < 1 {
            return Err(ConfigError::OutOfRange {
                key: "ATTEMPTS_ALLOWED",
                min: 1,
                value: i64::from(config.attempts_allowed),
            });
        }
        if config.average_refresh_seconds < 1 {
            return Err(ConfigError::OutOfRange {
                key: "AVERAGE_REFRESH_SECONDS",
                min: 1,
                value: 0,
            });
        }

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            attempts_allowed: DEFAULT_ATTEMPTS_ALLOWED,
            average_refresh_seconds: 60,
            words_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.attempts_allowed, 13);
        assert_eq!(config.average_refresh_seconds, 60);
        assert_eq!(config.words_file, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("ATTEMPTS_ALLOWED", " 6 "),
            ("DATABASE_URL", "sqlite::memory:"),
            ("WORDS_FILE", "/tmp/words.txt"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.attempts_allowed, 6);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.words_file.as_deref(), Some("/tmp/words.txt"));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config_from(&[("PORT", "eighty")]).unwrap_err(),
            ConfigError::InvalidValue {
                key: "PORT",
                value: "eighty".to_string()
            }
        );
        assert!(matches!(
            config_from(&[("ATTEMPTS_ALLOWED", "0")]),
            Err(ConfigError::OutOfRange {
                key: "ATTEMPTS_ALLOWED",
                ..
            })
        ));
        assert!(config_from(&[("AVERAGE_REFRESH_SECONDS", "0")]).is_err());
    }
}
