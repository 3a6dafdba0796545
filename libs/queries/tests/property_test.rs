//! Property-based tests using QuickCheck

use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};

use jsonapi_queries::matcher::{match_field_chain, MatchOptions};
use jsonapi_queries::pattern::FieldChainPattern;

mod test_support;
use test_support::{articles, blog_graph};

/// Random syntactically valid pattern text.
#[derive(Debug, Clone)]
struct PatternText(String);

impl Arbitrary for PatternText {
    fn arbitrary(g: &mut Gen) -> Self {
        let tokens = ["A", "O", "M", "R", "F"];
        let quantifiers = ["", "?", "*", "+"];
        let length = usize::arbitrary(g) % 5 + 1;

        let mut text = String::new();
        for _ in 0..length {
            if bool::arbitrary(g) {
                // A choice set with one to three (possibly repeated) tokens.
                let set_length = usize::arbitrary(g) % 3 + 1;
                text.push('[');
                for _ in 0..set_length {
                    text.push_str(g.choose(&tokens).copied().unwrap_or("A"));
                }
                text.push(']');
            } else {
                text.push_str(g.choose(&tokens).copied().unwrap_or("A"));
            }
            text.push_str(g.choose(&quantifiers).copied().unwrap_or(""));
        }
        PatternText(text)
    }
}

/// Parsing, rendering and re-parsing a pattern is a fixed point: the
/// canonical form renders to itself.
#[test]
fn prop_pattern_normalization_idempotent() {
    fn property(text: PatternText) -> bool {
        let first = match FieldChainPattern::parse(&text.0) {
            Ok(pattern) => pattern,
            Err(_) => return false,
        };
        let rendered = first.to_string();
        match FieldChainPattern::parse(&rendered) {
            Ok(second) => second == first && second.to_string() == rendered,
            Err(_) => false,
        }
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(property as fn(PatternText) -> bool);
}

/// The matcher always terminates with exactly one outcome, whatever the
/// chain text looks like.
#[test]
fn prop_matcher_total_on_arbitrary_text() {
    fn property(text: String) -> TestResult {
        if text.chars().count() > 200 {
            return TestResult::discard();
        }

        let graph = blog_graph();
        let resource_type = articles(&graph);
        for pattern_text in ["F*", "O*A", "M+", "R*[OA]"] {
            let pattern = FieldChainPattern::parse(pattern_text).unwrap();
            // Outcome is either a resolved chain or a positioned failure;
            // reaching this point at all means no panic and no hang.
            let _ = match_field_chain(
                &pattern,
                &text,
                &resource_type,
                &graph,
                MatchOptions::default(),
            );
        }
        TestResult::passed()
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(property as fn(String) -> TestResult);
}

/// Failure positions always land inside the input (or exactly at its end).
#[test]
fn prop_failure_position_within_input() {
    fn property(text: String) -> TestResult {
        if text.chars().count() > 200 {
            return TestResult::discard();
        }

        let graph = blog_graph();
        let resource_type = articles(&graph);
        let pattern = FieldChainPattern::parse("O*A").unwrap();
        match match_field_chain(
            &pattern,
            &text,
            &resource_type,
            &graph,
            MatchOptions::default(),
        ) {
            Ok(_) => TestResult::passed(),
            Err(failure) => TestResult::from_bool(failure.position <= text.chars().count()),
        }
    }

    QuickCheck::new()
        .tests(300)
        .quickcheck(property as fn(String) -> TestResult);
}
