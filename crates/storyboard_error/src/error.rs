//! Top-level error wrapper types.

use crate::{BuilderError, ConfigError, GenerationError, JsonError, ProviderError};

/// Every error condition the workspace can report.
///
/// # Examples
///
/// ```
/// use storyboard_error::{StoryboardError, ConfigError};
///
/// let err: StoryboardError = ConfigError::new("bad value").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryboardErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON extraction or serialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Generative provider error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Pipeline error
    #[from(GenerationError)]
    Generation(GenerationError),
}

/// Storyboard error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyboard_error::{StoryboardResult, StoryboardErrorKind, JsonError, JsonErrorKind};
///
/// fn parse() -> StoryboardResult<()> {
///     Err(JsonError::new(JsonErrorKind::Empty))?
/// }
///
/// let err = parse().unwrap_err();
/// assert!(matches!(err.kind(), StoryboardErrorKind::Json(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyboard Error: {}", _0)]
pub struct StoryboardError(Box<StoryboardErrorKind>);

impl StoryboardError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryboardErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryboardErrorKind {
        &self.0
    }

    /// Whether this is the fatal "no usable outcomes" condition.
    pub fn is_fatal_configuration(&self) -> bool {
        matches!(
            self.kind(),
            StoryboardErrorKind::Generation(e)
                if matches!(e.kind, crate::GenerationErrorKind::NoOutcomes { .. })
        )
    }
}

// Generic From implementation for any type that converts to StoryboardErrorKind
impl<T> From<T> for StoryboardError
where
    T: Into<StoryboardErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storyboard operations.
pub type StoryboardResult<T> = std::result::Result<T, StoryboardError>;
