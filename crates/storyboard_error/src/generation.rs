//! Pipeline-level error types.

/// Specific error conditions raised by the generation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// No usable learning outcomes were supplied or could be inferred
    #[display(
        "No usable learning outcomes: {} supplied, {} inferred from source (need at least {})",
        supplied,
        inferred,
        required
    )]
    NoOutcomes {
        /// Non-blank outcomes in the request
        supplied: usize,
        /// Outcomes recovered from the source text
        inferred: usize,
        /// Minimum number of inferred outcomes accepted
        required: usize,
    },
    /// A background analysis task panicked or was cancelled
    #[display("Analysis task failed: {}", _0)]
    TaskFailed(String),
}

/// Error type for pipeline operations.
///
/// # Examples
///
/// ```
/// use storyboard_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::NoOutcomes {
///     supplied: 0,
///     inferred: 1,
///     required: 3,
/// });
/// assert!(format!("{}", err).contains("No usable learning outcomes"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The specific error condition
    pub kind: GenerationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
