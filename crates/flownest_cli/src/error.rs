use flownest_core::preferences::PreferenceError;
use flownest_core::quotes::QuoteError;
use flownest_core::{ConfigError, DashboardError, LoggingError, ValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Logging(LoggingError),
    Dashboard(DashboardError),
    Preference(PreferenceError),
    Quote(QuoteError),
    Validation(ValidationError),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Dashboard(err) => write!(f, "{err}"),
            Self::Preference(err) => write!(f, "{err}"),
            Self::Quote(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Dashboard(err) => Some(err),
            Self::Preference(err) => Some(err),
            Self::Quote(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DashboardError> for CliError {
    fn from(value: DashboardError) -> Self {
        Self::Dashboard(value)
    }
}

impl From<PreferenceError> for CliError {
    fn from(value: PreferenceError) -> Self {
        Self::Preference(value)
    }
}

impl From<QuoteError> for CliError {
    fn from(value: QuoteError) -> Self {
        Self::Quote(value)
    }
}

impl From<ValidationError> for CliError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
