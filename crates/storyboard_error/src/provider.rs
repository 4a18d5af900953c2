//! Generative provider error types.

/// Provider-level error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Network or transport failure
    #[display("HTTP error: {}", _0)]
    Http(String),
    /// Provider answered with a non-success status
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },
    /// Provider throttled the request
    #[display("Rate limited by provider")]
    RateLimited,
    /// Request timed out
    #[display("Request timed out after {}s", _0)]
    Timeout(u64),
    /// Response body could not be decoded
    #[display("Malformed response: {}", _0)]
    MalformedResponse(String),
    /// Provider returned no text
    #[display("Provider returned an empty completion")]
    EmptyCompletion,
    /// Missing credentials or endpoint configuration
    #[display("Provider not configured: {}", _0)]
    NotConfigured(String),
}

impl ProviderErrorKind {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited | Self::Timeout(_) => true,
            Self::Api { status, .. } => *status >= 500,
            Self::MalformedResponse(_) | Self::EmptyCompletion | Self::NotConfigured(_) => false,
        }
    }
}

/// Provider error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The specific error condition
    pub kind: ProviderErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
