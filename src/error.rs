//! Error types and classification for the recommendation pipeline

use axum::http::StatusCode;
use thiserror::Error;

/// Coarse provider failure categories driving the fallback decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// The provider reported it is temporarily overloaded (HTTP 503 / `UNAVAILABLE`)
    Overloaded,
    /// The provider rejected the call for quota reasons (HTTP 429 / `RESOURCE_EXHAUSTED`)
    RateLimited,
    /// The requested model does not exist or is not served (HTTP 404 / `NOT_FOUND`)
    ModelUnavailable,
    /// Anything else: network failures, auth errors, malformed response bodies
    Other,
}

/// Error surfaced by a [`crate::TextGenerator`] implementation
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ProviderError {
    /// Coarse category, see [`ProviderErrorKind`]
    pub kind: ProviderErrorKind,
    /// Underlying provider message, logged but never returned verbatim
    pub message: String,
}

impl ProviderError {
    pub fn new<S: Into<String>>(kind: ProviderErrorKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for the non-retryable catch-all kind
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::new(ProviderErrorKind::Other, message)
    }
}

/// Main error type for the recommendation pipeline
#[derive(Debug, Error)]
pub enum RecommendError {
    /// The incoming query text was missing, non-string or empty
    #[error("query text is missing or empty")]
    EmptyQuery,

    /// The provider call itself failed
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider answered but the reply held no usable JSON array
    #[error("response parse error: {0}")]
    Parse(String),
}

impl RecommendError {
    /// Whether the fallback loop may continue with the next candidate model.
    ///
    /// Overload, rate limiting, a missing model and parse failures are all
    /// attempt-local conditions; everything else aborts the loop.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            RecommendError::EmptyQuery => false,
            RecommendError::Parse(_) => true,
            RecommendError::Provider(err) => matches!(
                err.kind,
                ProviderErrorKind::Overloaded
                    | ProviderErrorKind::RateLimited
                    | ProviderErrorKind::ModelUnavailable
            ),
        }
    }

    /// HTTP status presented to the caller
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            RecommendError::EmptyQuery => StatusCode::BAD_REQUEST,
            RecommendError::Provider(err) if err.kind == ProviderErrorKind::Overloaded => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            RecommendError::Provider(err) if err.kind == ProviderErrorKind::RateLimited => {
                StatusCode::TOO_MANY_REQUESTS
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RecommendError::EmptyQuery => "Invalid request. Text field is required.".to_string(),
            RecommendError::Provider(err) if err.kind == ProviderErrorKind::Overloaded => {
                "The recommendation service is temporarily overloaded. Please try again in a moment."
                    .to_string()
            }
            RecommendError::Provider(err) if err.kind == ProviderErrorKind::RateLimited => {
                "Too many requests. Please wait a moment before trying again.".to_string()
            }
            RecommendError::Parse(_) => {
                "Could not make sense of the model's reply. Please try again.".to_string()
            }
            RecommendError::Provider(err) => {
                format!("Failed to generate recommendations: {}", err.message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_decision_table() {
        let overloaded =
            RecommendError::from(ProviderError::new(ProviderErrorKind::Overloaded, "busy"));
        let rate_limited =
            RecommendError::from(ProviderError::new(ProviderErrorKind::RateLimited, "quota"));
        let missing_model = RecommendError::from(ProviderError::new(
            ProviderErrorKind::ModelUnavailable,
            "no such model",
        ));
        let parse = RecommendError::Parse("no array".to_string());
        let generic = RecommendError::from(ProviderError::other("permission denied"));

        assert!(overloaded.is_retryable());
        assert!(rate_limited.is_retryable());
        assert!(missing_model.is_retryable());
        assert!(parse.is_retryable());
        assert!(!generic.is_retryable());
        assert!(!RecommendError::EmptyQuery.is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RecommendError::EmptyQuery.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RecommendError::from(ProviderError::new(ProviderErrorKind::Overloaded, "busy"))
                .status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            RecommendError::from(ProviderError::new(ProviderErrorKind::RateLimited, "quota"))
                .status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            RecommendError::Parse("bad".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RecommendError::from(ProviderError::other("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_generic_message_embeds_provider_text() {
        let err = RecommendError::from(ProviderError::other("permission denied"));
        assert!(err.user_message().contains("permission denied"));
    }

    #[test]
    fn test_empty_query_message_matches_contract() {
        assert_eq!(
            RecommendError::EmptyQuery.user_message(),
            "Invalid request. Text field is required."
        );
    }
}
