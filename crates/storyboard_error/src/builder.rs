//! Errors raised when a builder cannot produce a value.

/// Why a builder refused to build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BuilderErrorKind {
    /// A required field was never set
    #[display("{} is required", _0)]
    MissingField(&'static str),

    /// A field was set to a value the type does not accept
    #[display("{} {}", field, reason)]
    InvalidField {
        /// Field name
        field: &'static str,
        /// What is wrong with the value
        reason: String,
    },
}

/// Builder error with location tracking.
///
/// Every `derive_builder` builder in the workspace uses this as its
/// `build_fn` error, so it converts from [`derive_builder::UninitializedFieldError`].
///
/// # Examples
///
/// ```
/// use storyboard_error::{BuilderError, BuilderErrorKind};
///
/// let err = BuilderError::new(BuilderErrorKind::MissingField("topic"));
/// assert_eq!(err.kind(), &BuilderErrorKind::MissingField("topic"));
/// assert!(err.to_string().contains("topic is required"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Builder Error: {} at line {} in {}", kind, line, file)]
pub struct BuilderError {
    kind: BuilderErrorKind,
    line: u32,
    file: &'static str,
}

impl BuilderError {
    /// Create a new builder error with caller location tracking.
    #[track_caller]
    pub fn new(kind: BuilderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for [`BuilderErrorKind::InvalidField`].
    #[track_caller]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::new(BuilderErrorKind::InvalidField {
            field,
            reason: reason.into(),
        })
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BuilderErrorKind {
        &self.kind
    }
}

impl From<derive_builder::UninitializedFieldError> for BuilderError {
    #[track_caller]
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        Self::new(BuilderErrorKind::MissingField(err.field_name()))
    }
}
