//! Trait definitions for the Storyboard generation pipeline.
//!
//! The pipeline talks to a generative model only through [`ContentProvider`].
//! Implementations live in `storyboard_models`; tests supply scripted mocks.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::ContentProvider;
