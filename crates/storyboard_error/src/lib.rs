//! Error types for the Storyboard pipeline.
//!
//! This crate provides the foundation error types used throughout the Storyboard workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Only [`GenerationErrorKind::NoOutcomes`] is meant to reach a caller of the
//! pipeline. Provider and parse failures are recovered inside the pipeline and
//! surface only as log events.
//!
//! # Examples
//!
//! ```
//! use storyboard_error::{StoryboardResult, ConfigError};
//!
//! fn load() -> StoryboardResult<String> {
//!     Err(ConfigError::new("Missing [generation] section"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod generation;
mod json;
mod provider;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{StoryboardError, StoryboardErrorKind, StoryboardResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use json::{JsonError, JsonErrorKind};
pub use provider::{ProviderError, ProviderErrorKind};
