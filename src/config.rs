//! Configuration loaded from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `PLAYGROUND_API_URL` | `http://127.0.0.1:8000` |
//! | `PLAYGROUND_TIMEOUT_SECS` | `120` |
//! | `PLAYGROUND_PROVIDER` | unset (backend default) |

use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backend base URL.
    pub api_url: Url,
    /// Per-request timeout. Generation can be slow, so this is generous.
    pub timeout: Duration,
    /// Provider to use when the caller does not pick one.
    pub provider: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            provider: None,
        }
    }
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(raw) = get("PLAYGROUND_API_URL") {
            config.api_url = parse_url(&raw)?;
        }

        if let Some(raw) = get("PLAYGROUND_TIMEOUT_SECS") {
            config.timeout = timeout_from_secs(&raw)?;
        }

        config.provider = get("PLAYGROUND_PROVIDER");

        Ok(config)
    }
}

/// Parse a request timeout in whole seconds; zero is rejected.
pub fn timeout_from_secs(raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: "PLAYGROUND_TIMEOUT_SECS",
        reason: format!("expected whole seconds, got {:?}", raw),
    })?;
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            name: "PLAYGROUND_TIMEOUT_SECS",
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

/// Parse a backend URL, accepting only http and https.
pub fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        name: "PLAYGROUND_API_URL",
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidValue {
            name: "PLAYGROUND_API_URL",
            reason: format!("unsupported scheme {:?}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PLAYGROUND_API_URL", "https://stories.example.com/"),
            ("PLAYGROUND_TIMEOUT_SECS", "30"),
            ("PLAYGROUND_PROVIDER", " anthropic "),
        ]))
        .unwrap();
        assert_eq!(config.api_url.as_str(), "https://stories.example.com/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.provider.as_deref(), Some("anthropic"));
    }

    #[test]
    fn test_blank_provider_is_unset() {
        let config = Config::from_lookup(lookup(&[("PLAYGROUND_PROVIDER", "  ")])).unwrap();
        assert_eq!(config.provider, None);
    }

    #[test]
    fn test_timeout_from_secs() {
        assert_eq!(timeout_from_secs("45").unwrap(), Duration::from_secs(45));
        assert!(matches!(
            timeout_from_secs("0"),
            Err(ConfigError::InvalidValue {
                name: "PLAYGROUND_TIMEOUT_SECS",
                ..
            })
        ));
        assert!(timeout_from_secs("-1").is_err());
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup(&[("PLAYGROUND_API_URL", "ftp://x")])).is_err());
        assert!(Config::from_lookup(lookup(&[("PLAYGROUND_API_URL", "nope")])).is_err());
        assert!(Config::from_lookup(lookup(&[("PLAYGROUND_TIMEOUT_SECS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("PLAYGROUND_TIMEOUT_SECS", "1m")])).is_err());
    }
}
