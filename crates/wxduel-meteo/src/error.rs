//! Open-Meteo client error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeteoError {
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Response contained no daily data")]
    MissingDaily,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MeteoError {
    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::RateLimited(secs) => {
                format!("The weather archive is busy. Try again in {} seconds.", secs)
            }
            Self::Api(msg) => format!("Weather service error: {}", msg),
            Self::Parse(_) | Self::MissingDaily => {
                "The weather service returned unexpected data.".to_string()
            }
            Self::Network(_) => "Network error. Check your connection.".to_string(),
        }
    }

    /// Whether the caller should show a "try later" message.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    /// Whether this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_message_includes_delay() {
        let err = MeteoError::RateLimited(60);
        assert!(err.user_message().contains("60"));
        assert!(err.is_rate_limited());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_api_error_not_rate_limited() {
        let err = MeteoError::Api("500: boom".into());
        assert!(!err.is_rate_limited());
        assert!(!err.is_retryable());
    }
}
