//! Weather-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Weather API error: {0}")]
    Upstream(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl WeatherError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::LocationNotFound(loc) => {
                format!("No weather data found for that location ({}).", loc)
            }
            Self::Upstream(msg) => format!("Weather service error: {}", msg),
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Parse(_) => "The weather service returned unexpected data.".to_string(),
            Self::Cache(_) => "Local weather cache error".to_string(),
        }
    }

    /// Whether this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Upstream(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        let err = WeatherError::LocationNotFound("99999".into());
        assert!(err.user_message().contains("99999"));

        let err = WeatherError::Upstream("503 Service Unavailable".into());
        assert!(err.user_message().contains("503"));
    }

    #[test]
    fn test_is_retryable() {
        assert!(WeatherError::Upstream("x".into()).is_retryable());
        assert!(!WeatherError::LocationNotFound("x".into()).is_retryable());
        assert!(!WeatherError::Parse("x".into()).is_retryable());
    }
}
