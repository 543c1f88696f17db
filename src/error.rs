//! Error Handling
//!
//! One crate-wide error enum covering the full failure taxonomy of a
//! generation attempt: configuration problems caught before any upstream
//! call, request validation, transport failures (with timeouts surfaced
//! distinctly), gateway/HTML responses, unparsable bodies, structured
//! upstream errors, and extraction misses.
//!
//! All errors are terminal for the generation attempt that produced them;
//! nothing in this crate retries silently.

use thiserror::Error;

/// Errors produced while configuring, submitting, or normalizing a
/// generation request.
#[derive(Debug, Error)]
pub enum GenError {
    /// Missing endpoint/key for the active profile, or no resolvable model.
    /// Reported before any upstream call is attempted.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request validation failure: empty prompt, reference-image counts,
    /// or a creative mode the active API shape does not support.
    #[error("Validation error: {0}")]
    ModeValidation(String),

    /// Network-level failure on the outbound call.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The outbound call exceeded its time bound. Kept separate from
    /// `HttpError` so callers can present "request timed out" distinctly.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The upstream returned an HTML page instead of an API response,
    /// typically a misconfigured reverse proxy or gateway. The message is
    /// already actionable (see `relay::classify::gateway_hint`).
    #[error("Gateway error (HTTP {status}): {message}")]
    GatewayError { status: u16, message: String },

    /// The upstream body was neither HTML nor parsable JSON.
    #[error("Invalid response format: {0}")]
    ParseError(String),

    /// The upstream returned structured error information (non-2xx status
    /// or an explicit failure flag in a parsed body).
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Extraction found no media reference anywhere in the response. The
    /// message carries a short preview of any textual reply to aid
    /// diagnosis (the model usually answered with prose instead of media).
    #[error("No media in response: {0}")]
    NoMediaFound(String),

    /// The requested operation is not available for the active API shape.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Local I/O failure (history store persistence).
    #[error("I/O error: {0}")]
    IoError(String),

    /// Invariant violation inside the crate itself.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse-grained error category for presentation and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Fix the configuration surface and retry.
    Configuration,
    /// Fix the request (mode, references, prompt) and retry.
    Validation,
    /// Network or timeout; upstream never answered usefully.
    Transport,
    /// Upstream answered, but not with an API response (HTML gateway page).
    Protocol,
    /// Upstream answered with an unparsable body.
    Format,
    /// Upstream answered with a structured application error.
    Application,
    /// Upstream answered successfully but no media could be extracted.
    Extraction,
    /// Everything else (local I/O, internal invariants).
    Other,
}

impl GenError {
    /// Convenience constructor mirroring the common `{code, message}` case.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Map this error to its coarse category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
            Self::ModeValidation(_) | Self::UnsupportedOperation(_) => ErrorCategory::Validation,
            Self::HttpError(_) | Self::Timeout(_) => ErrorCategory::Transport,
            Self::GatewayError { .. } => ErrorCategory::Protocol,
            Self::ParseError(_) => ErrorCategory::Format,
            Self::ApiError { .. } => ErrorCategory::Application,
            Self::NoMediaFound(_) => ErrorCategory::Extraction,
            Self::IoError(_) | Self::Internal(_) => ErrorCategory::Other,
        }
    }

    /// HTTP status associated with this error, when one exists.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::GatewayError { status, .. } => Some(*status),
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether this error was caused by the upstream time bound.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Whether the configuration surface should be brought to the user's
    /// attention (credentials or model selection need fixing).
    pub fn needs_configuration(&self) -> bool {
        match self {
            Self::ConfigurationError(_) => true,
            Self::GatewayError { status, .. } => matches!(status, 401 | 403),
            Self::ApiError { code, .. } => matches!(code, 401 | 403),
            _ => false,
        }
    }
}

impl From<std::io::Error> for GenError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for GenError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<reqwest::Error> for GenError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout("upstream request timed out".to_string())
        } else {
            Self::HttpError(format!("request failed: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_taxonomy() {
        assert_eq!(
            GenError::ConfigurationError("no key".into()).category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            GenError::ModeValidation("bad mode".into()).category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            GenError::Timeout("300s".into()).category(),
            ErrorCategory::Transport
        );
        assert_eq!(
            GenError::GatewayError {
                status: 504,
                message: "gateway timeout".into()
            }
            .category(),
            ErrorCategory::Protocol
        );
        assert_eq!(
            GenError::api_error(500, "boom").category(),
            ErrorCategory::Application
        );
        assert_eq!(
            GenError::NoMediaFound("prose".into()).category(),
            ErrorCategory::Extraction
        );
    }

    #[test]
    fn timeout_is_distinct_from_transport() {
        assert!(GenError::Timeout("t".into()).is_timeout());
        assert!(!GenError::HttpError("t".into()).is_timeout());
    }

    #[test]
    fn status_codes_surface() {
        assert_eq!(GenError::api_error(429, "slow down").status_code(), Some(429));
        assert_eq!(
            GenError::GatewayError {
                status: 502,
                message: "bad gateway".into()
            }
            .status_code(),
            Some(502)
        );
        assert_eq!(GenError::HttpError("t".into()).status_code(), None);
    }

    #[test]
    fn auth_failures_point_at_configuration() {
        assert!(GenError::api_error(401, "unauthorized").needs_configuration());
        assert!(!GenError::api_error(500, "server").needs_configuration());
    }
}
