//! JSON extraction and parsing error types.

/// Specific failure modes when turning provider text into structured data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum JsonErrorKind {
    /// Response was empty or whitespace
    #[display("Empty response")]
    Empty,
    /// Every extraction strategy failed
    #[display("No parseable JSON after {} strategies: {}", strategies, preview)]
    Unparseable {
        /// Number of strategies attempted
        strategies: usize,
        /// Leading characters of the response
        preview: String,
    },
    /// JSON parsed but did not have the expected shape
    #[display("Unexpected JSON shape: {}", _0)]
    Shape(String),
    /// Serialization of an outgoing payload failed
    #[display("Serialization failed: {}", _0)]
    Serialization(String),
}

/// JSON error with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", kind, line, file)]
pub struct JsonError {
    /// The specific error condition
    pub kind: JsonErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Create a new JsonError with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_error::{JsonError, JsonErrorKind};
    ///
    /// let err = JsonError::new(JsonErrorKind::Empty);
    /// assert!(format!("{}", err).contains("Empty response"));
    /// ```
    #[track_caller]
    pub fn new(kind: JsonErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
