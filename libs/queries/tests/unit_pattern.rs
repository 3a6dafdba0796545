//! Unit tests for field chain pattern parsing and normalization

use jsonapi_queries::error::Error;
use jsonapi_queries::pattern::{FieldChainPattern, FieldKinds, Quantifier};

#[test]
fn test_single_tokens() {
    for (text, kinds) in [
        ("A", FieldKinds::ATTRIBUTE),
        ("O", FieldKinds::TO_ONE),
        ("M", FieldKinds::TO_MANY),
        ("R", FieldKinds::RELATIONSHIP),
        ("F", FieldKinds::ANY),
    ] {
        let pattern = FieldChainPattern::parse(text).unwrap();
        assert_eq!(pattern.elements().len(), 1);
        assert_eq!(pattern.elements()[0].kinds, kinds);
        assert_eq!(pattern.elements()[0].quantifier, Quantifier::ExactlyOne);
        assert_eq!(pattern.to_string(), text);
    }
}

#[test]
fn test_quantifiers() {
    let pattern = FieldChainPattern::parse("O?M*A+R").unwrap();
    let quantifiers: Vec<Quantifier> = pattern
        .elements()
        .iter()
        .map(|element| element.quantifier)
        .collect();
    assert_eq!(
        quantifiers,
        vec![
            Quantifier::ZeroOrOne,
            Quantifier::ZeroOrMore,
            Quantifier::OneOrMore,
            Quantifier::ExactlyOne,
        ]
    );
    assert_eq!(pattern.to_string(), "O?M*A+R");
}

#[test]
fn test_choice_set_normalizes_duplicates() {
    let pattern = FieldChainPattern::parse("[AMAM]").unwrap();
    assert_eq!(pattern.elements().len(), 1);
    assert_eq!(pattern.to_string(), "[MA]");
}

#[test]
fn test_choice_set_collapses_to_single_token() {
    assert_eq!(FieldChainPattern::parse("[A]").unwrap().to_string(), "A");
    assert_eq!(FieldChainPattern::parse("[OM]").unwrap().to_string(), "R");
    assert_eq!(FieldChainPattern::parse("[MORAF]").unwrap().to_string(), "F");
}

#[test]
fn test_full_coverage_set_describes_as_field() {
    let pattern = FieldChainPattern::parse("[MORAF]").unwrap();
    assert_eq!(pattern.elements()[0].kinds, FieldKinds::ANY);
    assert_eq!(pattern.description(), "a field");
}

#[test]
fn test_description_joins_elements() {
    let pattern = FieldChainPattern::parse("R*[OA]").unwrap();
    assert_eq!(
        pattern.description(),
        "zero or more relationships, followed by a to-one relationship or attribute"
    );

    let pattern = FieldChainPattern::parse("O?M+").unwrap();
    assert_eq!(
        pattern.description(),
        "an optional to-one relationship, followed by one or more to-many relationships"
    );
}

#[test]
fn test_description_picks_article() {
    assert_eq!(FieldChainPattern::parse("A").unwrap().description(), "an attribute");
    assert_eq!(
        FieldChainPattern::parse("M").unwrap().description(),
        "a to-many relationship"
    );
}

#[test]
fn test_reparse_is_idempotent() {
    for text in ["[AMAM]", "[MORAF]", "O*A", "R+[OA]?", "[AO]*M+"] {
        let first = FieldChainPattern::parse(text).unwrap();
        let second = FieldChainPattern::parse(&first.to_string()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }
}

#[test]
fn test_empty_pattern_rejected() {
    let error = FieldChainPattern::parse("").unwrap_err();
    assert!(matches!(
        error,
        Error::InvalidPattern { ref message, position: 0, .. } if message == "Pattern is empty"
    ));
}

#[test]
fn test_unknown_token_rejected() {
    let error = FieldChainPattern::parse("OX").unwrap_err();
    assert!(matches!(
        error,
        Error::InvalidPattern { ref message, position: 1, .. } if message == "Unknown token 'X'"
    ));

    let error = FieldChainPattern::parse("[AZ]").unwrap_err();
    assert!(matches!(
        error,
        Error::InvalidPattern { ref message, position: 2, .. } if message == "Unknown token 'Z'"
    ));
}

#[test]
fn test_malformed_choice_sets_rejected() {
    let error = FieldChainPattern::parse("[]").unwrap_err();
    assert!(matches!(
        error,
        Error::InvalidPattern { ref message, position: 1, .. } if message == "Field type expected"
    ));

    let error = FieldChainPattern::parse("[A").unwrap_err();
    assert!(matches!(
        error,
        Error::InvalidPattern { ref message, position: 2, .. }
            if message == "Field type or ] expected"
    ));
}

#[test]
fn test_stray_punctuation_rejected() {
    let error = FieldChainPattern::parse("?A").unwrap_err();
    assert!(matches!(
        error,
        Error::InvalidPattern { ref message, position: 0, .. }
            if message == "Field type or [ expected"
    ));
}
