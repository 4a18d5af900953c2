//! Outcome analysis and content extraction.
//!
//! Both stages are pure and synchronous: the [`OutcomeAnalyzer`] classifies
//! learning outcomes with verb heuristics, and the [`ContentExtractor`] pulls
//! grounded facts out of source text with regular expressions.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extractor;
mod outcomes;
mod verbs;

pub use extractor::ContentExtractor;
pub use outcomes::{AnalysisContext, AudienceLevel, OutcomeAnalyzer, subject_keywords};
pub use verbs::{classify_verb, level_for_token};
