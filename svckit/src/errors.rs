use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timed out after {0:?} - please check your connection")]
    Timeout(Duration),

    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid response shape: {0}")]
    InvalidResponseShape(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not authenticated - please log in")]
    Unauthenticated,

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// True for outcomes that must send the operator back to the login screen.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthenticated | ApiError::Http { status: 401, .. }
        )
    }

    /// Failures that come from the remote side being unreachable or broken,
    /// as opposed to a rejected request.
    pub fn is_unreachable(&self) -> bool {
        match self {
            ApiError::Timeout(_)
            | ApiError::NetworkUnavailable(_)
            | ApiError::InvalidResponseShape(_) => true,
            ApiError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Short text suitable for an inline error banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Timeout(_) => "Request timeout - please check your connection".to_string(),
            ApiError::NetworkUnavailable(_) => {
                "Network error - please check your connection".to_string()
            }
            ApiError::Http { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Http { status, .. } => format!("Server returned HTTP {}", status),
            ApiError::Unauthenticated => "Session expired - please log in again".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest does not report the configured duration back
            ApiError::Timeout(Duration::ZERO)
        } else if err.is_decode() {
            ApiError::InvalidResponseShape(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::NetworkUnavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidResponseShape(err.to_string())
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::Config(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::Config(format!("URL parse error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_classification() {
        assert!(ApiError::Unauthenticated.is_unauthorized());
        assert!(ApiError::Http { status: 401, message: String::new() }.is_unauthorized());
        assert!(!ApiError::Http { status: 403, message: String::new() }.is_unauthorized());
        assert!(!ApiError::Timeout(Duration::from_secs(30)).is_unauthorized());
    }

    #[test]
    fn test_unreachable_classification() {
        assert!(ApiError::NetworkUnavailable("refused".into()).is_unreachable());
        assert!(ApiError::Http { status: 502, message: String::new() }.is_unreachable());
        assert!(!ApiError::Http { status: 404, message: String::new() }.is_unreachable());
        assert!(!ApiError::InvalidCredentials("bad".into()).is_unreachable());
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Http {
            status: 422,
            message: "Final price must be positive".to_string(),
        };
        assert_eq!(err.user_message(), "Final price must be positive");

        let err = ApiError::Http { status: 500, message: String::new() };
        assert_eq!(err.user_message(), "Server returned HTTP 500");
    }
}
