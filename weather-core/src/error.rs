use thiserror::Error;

pub type Result<T> = std::result::Result<T, ForecastError>;

/// Everything that can abort a forecast cycle.
///
/// Numeric coercion failures are deliberately absent: they degrade to a
/// missing value on the row instead.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ForecastError {
    /// One-line message suitable for showing to the end user.
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::Config(msg) => msg.clone(),
            ForecastError::Fetch(msg) => format!("could not reach the forecast service ({msg})"),
            ForecastError::Schema(msg) => format!("unexpected forecast data ({msg})"),
            ForecastError::Parse(msg) => format!("invalid forecast timestamp ({msg})"),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_config(&self) -> bool {
        matches!(self, ForecastError::Config(_))
    }
}

impl From<reqwest::Error> for ForecastError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ForecastError::Fetch(format!("request timed out: {err}"))
        } else {
            ForecastError::Fetch(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_user_message_is_passed_through() {
        let err = ForecastError::Config("CWA_KEY is not set".into());
        assert_eq!(err.user_message(), "CWA_KEY is not set");
        assert!(err.is_config());
    }

    #[test]
    fn display_carries_the_kind() {
        let err = ForecastError::Schema("missing element CI".into());
        assert_eq!(err.to_string(), "Schema error: missing element CI");
        assert!(!err.is_config());
    }
}
