//! Outcome analysis and content extraction over realistic sources.

use storyboard_analysis::{AnalysisContext, ContentExtractor, OutcomeAnalyzer};
use storyboard_core::{ContentProvenance, TaxonomyLevel};

const CAPS_SOURCE: &str = "The CAPS model describes four communication styles: Controller, \
Analyser, Promoter and Supporter. Maria, a new team lead, wants to run better meetings. \
A common mistake is to label colleagues permanently.";

#[test]
fn test_inferred_outcomes_feed_the_outcome_map() {
    let source = "Course objectives\n\
        - Identify the four CAPS communication styles.\n\
        - Explain how each style reacts under pressure.\n\
        - Apply the CAPS model to a weekly team meeting.\n";
    let analyzer = OutcomeAnalyzer::new();
    let outcomes = analyzer.extract_from_source(source, "Communicating with CAPS");
    assert_eq!(outcomes.len(), 3);

    let ctx = AnalysisContext::new("Communicating with CAPS", "New team leads");
    let map = analyzer.build_map(&outcomes, &ctx);
    assert_eq!(map.len(), 3);
    assert_eq!(
        map.taxonomy_progression,
        vec![
            TaxonomyLevel::Remember,
            TaxonomyLevel::Understand,
            TaxonomyLevel::Apply
        ]
    );
    assert!(map.analyses[2].prerequisites.contains(&0));
    for analysis in &map.analyses {
        assert!((1..=10).contains(&analysis.complexity));
        assert!(analysis.estimated_scenes >= 5);
    }
}

#[test]
fn test_relevant_items_are_grounded_in_the_source() {
    let pool = ContentExtractor::new().extract(
        CAPS_SOURCE,
        &["Identify the four CAPS personality types".to_string()],
        "Communicating with CAPS",
    );
    assert_eq!(pool.provenance, ContentProvenance::Extracted);

    let relevant = pool.relevant_to("Identify the four CAPS personality types", 8);
    assert!(!relevant.is_empty());
    assert!(relevant.len() <= 8);
    assert!(relevant.iter().any(|item| item.contains("CAPS")));
}

#[test]
fn test_missing_source_yields_topic_pool_and_no_outcomes() {
    let outcomes = vec!["Report a near miss".to_string()];
    let pool = ContentExtractor::new().extract("", &outcomes, "Site safety");
    assert_eq!(pool.provenance, ContentProvenance::TopicDerived);
    assert!(pool.primary_framework().is_none());
    assert!(!pool.relevant_to("Report a near miss", 4).is_empty());

    assert!(
        OutcomeAnalyzer::new()
            .extract_from_source("", "Site safety")
            .is_empty()
    );
}
