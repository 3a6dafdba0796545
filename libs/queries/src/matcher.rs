//! Field chain pattern matcher
//!
//! Matches dotted field-reference text against a [`FieldChainPattern`],
//! resolving each segment against the resource graph. Quantified pattern
//! elements are matched greedily with backtracking: the matcher consumes as
//! many segments as are compatible, then reduces the consumed count when the
//! rest of the pattern cannot match what follows. Backtracking runs over an
//! explicit stack of (pattern cursor, input cursor, current type) states
//! with a visited set, so the number of explored states stays polynomial in
//! input length times pattern length.
//!
//! Every failure carries a zero-based character position into the original
//! field chain text, pointing at the first character of the offending
//! segment (or at the end of input when more segments were required). When
//! several branches fail, the failure that got furthest wins.

use std::collections::HashSet;
use std::sync::Arc;

use jsonapi_resource_graph::{Field, ResourceGraph, ResourceType};
use smallvec::SmallVec;

use crate::chain::{FieldChain, ResolvedField};
use crate::pattern::{FieldChainPattern, PatternElement, Quantifier};

/// Options controlling field chain resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
    /// Search types derived from the current resource type when a field is
    /// not found directly, failing on ambiguous matches.
    pub allow_derived_types: bool,
}

/// A failed match, with a position into the field chain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchError {
    pub message: String,
    pub position: usize,
}

struct Segment {
    text: String,
    /// Character position of the segment's first character.
    position: usize,
}

fn split_segments(text: &str) -> Result<Vec<Segment>, MatchError> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    for (index, c) in text.chars().enumerate() {
        if c == '.' {
            segments.push(Segment {
                text: std::mem::take(&mut current),
                position: start,
            });
            start = index + 1;
        } else {
            current.push(c);
        }
    }
    segments.push(Segment {
        text: current,
        position: start,
    });

    // Leading/trailing/double dots and stray whitespace all surface here.
    for segment in &segments {
        if segment.text.is_empty() || segment.text.trim() != segment.text {
            return Err(MatchError {
                message: "Field name expected.".to_string(),
                position: segment.position,
            });
        }
    }
    Ok(segments)
}

struct State {
    element_index: usize,
    segment_index: usize,
    /// Whether the current quantified element already consumed a segment.
    min_done: bool,
    resource_type: Arc<ResourceType>,
    resolved: SmallVec<[ResolvedField; 4]>,
}

fn record(best: &mut Option<MatchError>, candidate: MatchError) {
    match best {
        Some(existing) if existing.position >= candidate.position => {}
        _ => *best = Some(candidate),
    }
}

/// Match `text` against `pattern`, starting from `resource_type`.
pub fn match_field_chain(
    pattern: &FieldChainPattern,
    text: &str,
    resource_type: &Arc<ResourceType>,
    graph: &ResourceGraph,
    options: MatchOptions,
) -> Result<FieldChain, MatchError> {
    let segments = split_segments(text)?;
    let end_position = text.chars().count();
    let elements = pattern.elements();

    // suffix_nullable[i]: every element from i onward can match zero
    // segments, meaning the chain may legally end before element i consumes.
    let mut suffix_nullable = vec![true; elements.len() + 1];
    for index in (0..elements.len()).rev() {
        suffix_nullable[index] = elements[index].can_match_zero() && suffix_nullable[index + 1];
    }

    let mut best_failure: Option<MatchError> = None;
    let mut visited: HashSet<(usize, usize, bool, String)> = HashSet::new();
    let mut stack = vec![State {
        element_index: 0,
        segment_index: 0,
        min_done: false,
        resource_type: resource_type.clone(),
        resolved: SmallVec::new(),
    }];

    while let Some(state) = stack.pop() {
        if !visited.insert((
            state.element_index,
            state.segment_index,
            state.min_done,
            state.resource_type.name().to_string(),
        )) {
            continue;
        }

        if state.element_index == elements.len() {
            if state.segment_index == segments.len() {
                return Ok(FieldChain::new(state.resolved));
            }
            record(
                &mut best_failure,
                MatchError {
                    message: "End of field chain expected.".to_string(),
                    position: segments[state.segment_index].position,
                },
            );
            continue;
        }

        let element = elements[state.element_index];
        let can_skip = match element.quantifier {
            Quantifier::ExactlyOne => false,
            Quantifier::ZeroOrOne | Quantifier::ZeroOrMore => true,
            Quantifier::OneOrMore => state.min_done,
        };

        // Push the skip transition first; the consume transition lands on
        // top of the stack, making greedy consumption the explored-first
        // branch and skipping the backtrack path.
        if can_skip {
            stack.push(State {
                element_index: state.element_index + 1,
                segment_index: state.segment_index,
                min_done: false,
                resource_type: state.resource_type.clone(),
                resolved: state.resolved.clone(),
            });
        }

        let Some(segment) = segments.get(state.segment_index) else {
            if !can_skip {
                record(
                    &mut best_failure,
                    MatchError {
                        message: format!(
                            "{} on resource type '{}' expected.",
                            element.kinds.phrase_capitalized(),
                            state.resource_type.name()
                        ),
                        position: end_position,
                    },
                );
            }
            continue;
        };

        // Ending the chain here would have been legal; mismatch messages for
        // this segment say so.
        let end_was_legal = can_skip && suffix_nullable[state.element_index + 1];

        match resolve_segment(segment, element, &state.resource_type, graph, options, end_was_legal)
        {
            Ok((resolved_field, next_type)) => {
                let mut resolved = state.resolved;
                resolved.push(resolved_field);
                let (element_index, min_done) = match element.quantifier {
                    Quantifier::ExactlyOne | Quantifier::ZeroOrOne => {
                        (state.element_index + 1, false)
                    }
                    Quantifier::ZeroOrMore | Quantifier::OneOrMore => (state.element_index, true),
                };
                stack.push(State {
                    element_index,
                    segment_index: state.segment_index + 1,
                    min_done,
                    resource_type: next_type,
                    resolved,
                });
            }
            Err(failure) => record(&mut best_failure, failure),
        }
    }

    Err(best_failure.unwrap_or_else(|| MatchError {
        message: "Field chain does not match pattern.".to_string(),
        position: 0,
    }))
}

/// Resolve one segment against the current resource type and check its kind
/// against the pattern element.
fn resolve_segment(
    segment: &Segment,
    element: PatternElement,
    current: &Arc<ResourceType>,
    graph: &ResourceGraph,
    options: MatchOptions,
    end_was_legal: bool,
) -> Result<(ResolvedField, Arc<ResourceType>), MatchError> {
    let fail = |message: String| MatchError {
        message,
        position: segment.position,
    };

    let (resolved_on, field): (Arc<ResourceType>, Field) =
        match graph.field(current, &segment.text) {
            Some(field) => (current.clone(), field.clone()),
            None if options.allow_derived_types => {
                let has_derived = !graph.directly_derived(current.name()).is_empty();
                let mut candidates = graph.find_field_in_derived(current, &segment.text);
                match candidates.len() {
                    0 if has_derived => {
                        return Err(fail(format!(
                            "Field '{}' does not exist on resource type '{}' or any of its derived types.",
                            segment.text,
                            current.name()
                        )));
                    }
                    0 => {
                        return Err(fail(format!(
                            "Field '{}' does not exist on resource type '{}'.",
                            segment.text,
                            current.name()
                        )));
                    }
                    1 => {
                        let (declared_on, field) = candidates.remove(0);
                        (declared_on.clone(), field.clone())
                    }
                    _ => {
                        return Err(fail(format!(
                            "Field '{}' is defined on multiple types that derive from resource type '{}'.",
                            segment.text,
                            current.name()
                        )));
                    }
                }
            }
            None => {
                return Err(fail(format!(
                    "Field '{}' does not exist on resource type '{}'.",
                    segment.text,
                    current.name()
                )));
            }
        };

    if !element.kinds.accepts(field.kind()) {
        let message = if end_was_legal {
            format!(
                "End of field chain or {} on resource type '{}' expected.",
                element.kinds.phrase(),
                current.name()
            )
        } else {
            format!(
                "{} on resource type '{}' expected.",
                element.kinds.phrase_capitalized(),
                current.name()
            )
        };
        return Err(fail(message));
    }

    let next_type = match field.target() {
        Some(target) => graph
            .resource_type(target)
            .cloned()
            .ok_or_else(|| fail(format!("Resource type '{target}' does not exist.")))?,
        None => resolved_on.clone(),
    };

    Ok((
        ResolvedField {
            resource_type: resolved_on,
            field,
        },
        next_type,
    ))
}
