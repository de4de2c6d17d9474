//! Process-level configuration for the core.
//!
//! Runtime user preferences (dark mode, widgets, durations) are not here;
//! they live in the `preferences` table.

use reqwest::Url;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DB_FILE: &str = "flownest.sqlite3";
pub const DEFAULT_ZEN_URL: &str = "https://zenquotes.io/api/random";
pub const DEFAULT_GENERATIVE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyValue(&'static str),
    InvalidUrl { field: &'static str, value: String },
    ZeroTimeout,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyValue(field) => write!(f, "`{field}` cannot be empty"),
            Self::InvalidUrl { field, value } => {
                write!(f, "`{field}` must be an http(s) URL, got `{value}`")
            }
            Self::ZeroTimeout => write!(f, "http timeout must be greater than zero"),
        }
    }
}

impl Error for ConfigError {}

/// Settings for the remote quote sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteConfig {
    pub zen_url: String,
    pub generative_url: String,
    /// Without a key the generative source always falls back.
    pub generative_api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            zen_url: DEFAULT_ZEN_URL.to_string(),
            generative_url: DEFAULT_GENERATIVE_URL.to_string(),
            generative_api_key: None,
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    /// `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    pub quotes: QuoteConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            log_dir: None,
            log_level: crate::logging::default_log_level().to_string(),
            quotes: QuoteConfig::default(),
        }
    }
}

impl CoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyValue("db_path"));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::EmptyValue("log_level"));
        }
        validate_url("zen_url", &self.quotes.zen_url)?;
        validate_url("generative_url", &self.quotes.generative_url)?;
        if self.quotes.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyValue(field));
    }
    let invalid = || ConfigError::InvalidUrl {
        field,
        value: trimmed.to_string(),
    };
    let url = Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use std::time::Duration;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(CoreConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_non_http_endpoint_and_zero_timeout() {
        let mut config = CoreConfig::default();
        config.quotes.zen_url = "ftp://quotes".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { field: "zen_url", .. })
        ));

        let mut config = CoreConfig::default();
        config.quotes.timeout = Duration::ZERO;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn rejects_endpoints_without_a_usable_host() {
        for url in ["https://", "http://not a host/with spaces"] {
            let mut config = CoreConfig::default();
            config.quotes.generative_url = url.to_string();
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::InvalidUrl {
                        field: "generative_url",
                        ..
                    })
                ),
                "{url} should be rejected"
            );
        }

        let mut config = CoreConfig::default();
        config.quotes.zen_url = "http://localhost:8080/api/random".to_string();
        assert_eq!(config.validate(), Ok(()));
    }
}
