//! Error types shared by the transport, extraction and monitoring layers.

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while collecting or posting delay counts.
///
/// Variants fall into two families: connection errors (either API could not
/// be reached or answered with a non-success status) and formatting errors
/// (the Transport API payload did not have the expected shape).
#[derive(Debug, Error)]
pub enum DelayError {
    #[error("environment variable {0} must be set")]
    MissingEnv(&'static str),

    #[error("invalid URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("invalid credentials for basic auth: {0}")]
    InvalidCredentials(#[from] reqwest::header::InvalidHeaderValue),

    #[error("connection error: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("malformed JSON response: {0}")]
    Malformed(String),

    #[error("invalid JSON: {0}")]
    Formatting(#[from] serde_json::Error),

    #[error("JSON response missing transport status fields: {0}")]
    MissingFields(String),

    #[error("no custom metrics registered on the monitoring backend")]
    NoMetrics,
}

impl DelayError {
    /// Network, timeout and HTTP status failures on either API.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            DelayError::Connection(_)
                | DelayError::UnexpectedStatus { .. }
                | DelayError::InvalidUri { .. }
        )
    }

    /// Payloads that could not be turned into a delay count.
    pub fn is_formatting(&self) -> bool {
        matches!(
            self,
            DelayError::Malformed(_) | DelayError::Formatting(_) | DelayError::MissingFields(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_is_disjoint() {
        let status = DelayError::UnexpectedStatus {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        };
        assert!(status.is_connection());
        assert!(!status.is_formatting());

        let missing = DelayError::MissingFields("departures".to_string());
        assert!(missing.is_formatting());
        assert!(!missing.is_connection());

        assert!(!DelayError::NoMetrics.is_connection());
        assert!(!DelayError::NoMetrics.is_formatting());
    }

    #[test]
    fn test_missing_env_names_variable() {
        let err = DelayError::MissingEnv("G_KEY");
        assert_eq!(err.to_string(), "environment variable G_KEY must be set");
    }
}
