//! Error types for the H3Yun client.
//!
//! # Design
//! Every failure the client can raise is one `ApiError`. The variant is the
//! classification; `kind()` exposes it as a flat `ErrorKind` for callers that
//! only want to branch on the category. HTTP failures keep the status and the
//! raw response body as separate fields. `code()` reproduces the platform
//! SDK's single "error code" slot, which carries the raw body for HTTP and
//! empty-payload failures and `"Unknown"` everywhere else.
//!
//! Business-level failures (`Successful: false` in a decoded envelope) are
//! not errors; they come back as data in `ApiResponse`.

/// Code reported by `ApiError::code` when no more specific code applies.
pub const UNKNOWN_CODE: &str = "Unknown";

/// Flat classification of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidConfiguration,
    HttpFailure,
    Timeout,
    TransportError,
    DecodeFailure,
    Unknown,
}

/// Errors returned by `H3YunClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A configuration field failed validation at client construction.
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    /// The platform answered with a non-2xx status.
    #[error("HTTP request failed, status: {status}")]
    HttpFailure { status: u16, body: String },

    /// The exchange exceeded the configured timeout or was cancelled.
    #[error("request timed out")]
    Timeout,

    /// The transport could not complete the request (connect, DNS, TLS, ...).
    #[error("HTTP request exception: {0}")]
    Transport(String),

    /// The response body was not a usable JSON envelope.
    ///
    /// `body` is set when the body parsed to nothing (empty or `null`); it is
    /// `None` when the body was malformed JSON.
    #[error("{message}")]
    Decode { message: String, body: Option<String> },

    /// Anything not covered by the other variants.
    #[error("unknown exception: {0}")]
    Unknown(String),
}

impl ApiError {
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        ApiError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_json(err: &serde_json::Error) -> Self {
        ApiError::Decode {
            message: format!("JSON parse exception: {err}"),
            body: None,
        }
    }

    pub(crate) fn empty_payload(body: impl Into<String>) -> Self {
        ApiError::Decode {
            message: "cannot parse API response".to_string(),
            body: Some(body.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            ApiError::HttpFailure { .. } => ErrorKind::HttpFailure,
            ApiError::Timeout => ErrorKind::Timeout,
            ApiError::Transport(_) => ErrorKind::TransportError,
            ApiError::Decode { .. } => ErrorKind::DecodeFailure,
            ApiError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Machine-readable code in the platform SDK's convention.
    pub fn code(&self) -> &str {
        match self {
            ApiError::InvalidConfiguration { .. } => "InvalidConfiguration",
            ApiError::HttpFailure { body, .. } => body.as_str(),
            ApiError::Decode { body: Some(body), .. } => body.as_str(),
            _ => UNKNOWN_CODE,
        }
    }

    /// HTTP status, for `HttpFailure` only.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpFailure { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body when one was received.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::HttpFailure { body, .. } => Some(body.as_str()),
            ApiError::Decode { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Name of the offending field for `InvalidConfiguration`.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ApiError::InvalidConfiguration { field, .. } => Some(*field),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
