//! Field chain patterns
//!
//! A pattern is a compact grammar describing the allowed shape of a dotted
//! field chain: which field kinds may appear, in what order, and how often.
//!
//! Grammar: the tokens `A` (attribute), `O` (to-one), `M` (to-many), `R`
//! (any relationship) and `F` (any field); `[...]` groups tokens into a
//! choice set; a `?`, `*` or `+` suffix quantifies the preceding token or
//! choice set. No suffix means exactly one.
//!
//! Choice sets normalize on construction: a set that reduces to one kind
//! collapses to that token, a set covering both relationship kinds collapses
//! to `R`, and a set covering every kind collapses to `F`. Rendering a
//! parsed pattern back to text therefore always yields the canonical form.

use std::fmt;

use jsonapi_resource_graph::FieldKind;

use crate::error::{Error, Result};

/// Set of field kinds a single pattern element accepts.
///
/// Stored as a bitset over the three concrete kinds, so `R` and `F` are not
/// distinct states but unions; normalization falls out of the representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldKinds(u8);

impl FieldKinds {
    pub const ATTRIBUTE: FieldKinds = FieldKinds(0b001);
    pub const TO_ONE: FieldKinds = FieldKinds(0b010);
    pub const TO_MANY: FieldKinds = FieldKinds(0b100);
    pub const RELATIONSHIP: FieldKinds = FieldKinds(0b110);
    pub const ANY: FieldKinds = FieldKinds(0b111);

    const EMPTY: FieldKinds = FieldKinds(0);

    pub fn union(self, other: FieldKinds) -> FieldKinds {
        FieldKinds(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether a field of the given kind satisfies this element.
    pub fn accepts(self, kind: FieldKind) -> bool {
        let bit = match kind {
            FieldKind::Attribute => Self::ATTRIBUTE,
            FieldKind::ToOne => Self::TO_ONE,
            FieldKind::ToMany => Self::TO_MANY,
        };
        self.0 & bit.0 != 0
    }

    /// Canonical pattern text for this set.
    fn render(self) -> &'static str {
        match self {
            Self::ANY => "F",
            Self::RELATIONSHIP => "R",
            Self::ATTRIBUTE => "A",
            Self::TO_ONE => "O",
            Self::TO_MANY => "M",
            // Canonical order inside a choice set: M, O, A.
            FieldKinds(0b101) => "[MA]",
            FieldKinds(0b011) => "[OA]",
            _ => unreachable!("empty kind set"),
        }
    }

    /// Lowercase singular phrase, used in expectation messages.
    pub fn phrase(self) -> &'static str {
        match self {
            Self::ANY => "field",
            Self::RELATIONSHIP => "relationship",
            Self::ATTRIBUTE => "attribute",
            Self::TO_ONE => "to-one relationship",
            Self::TO_MANY => "to-many relationship",
            FieldKinds(0b101) => "to-many relationship or attribute",
            FieldKinds(0b011) => "to-one relationship or attribute",
            _ => unreachable!("empty kind set"),
        }
    }

    fn phrase_plural(self) -> &'static str {
        match self {
            Self::ANY => "fields",
            Self::RELATIONSHIP => "relationships",
            Self::ATTRIBUTE => "attributes",
            Self::TO_ONE => "to-one relationships",
            Self::TO_MANY => "to-many relationships",
            FieldKinds(0b101) => "to-many relationships or attributes",
            FieldKinds(0b011) => "to-one relationships or attributes",
            _ => unreachable!("empty kind set"),
        }
    }

    /// Capitalized singular phrase.
    pub fn phrase_capitalized(self) -> String {
        let phrase = self.phrase();
        let mut chars = phrase.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

/// How often a pattern element repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quantifier {
    #[default]
    ExactlyOne,
    ZeroOrOne,  // ?
    ZeroOrMore, // *
    OneOrMore,  // +
}

impl Quantifier {
    fn suffix(self) -> &'static str {
        match self {
            Quantifier::ExactlyOne => "",
            Quantifier::ZeroOrOne => "?",
            Quantifier::ZeroOrMore => "*",
            Quantifier::OneOrMore => "+",
        }
    }

    pub fn allows_zero(self) -> bool {
        matches!(self, Quantifier::ZeroOrOne | Quantifier::ZeroOrMore)
    }

    pub fn allows_many(self) -> bool {
        matches!(self, Quantifier::ZeroOrMore | Quantifier::OneOrMore)
    }
}

/// One element of a pattern: a kind set with a quantifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternElement {
    pub kinds: FieldKinds,
    pub quantifier: Quantifier,
}

impl PatternElement {
    pub fn can_match_zero(self) -> bool {
        self.quantifier.allows_zero()
    }
}

/// A parsed, normalized field chain pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldChainPattern {
    elements: Vec<PatternElement>,
}

fn kind_of(c: char) -> Option<FieldKinds> {
    match c {
        'A' => Some(FieldKinds::ATTRIBUTE),
        'O' => Some(FieldKinds::TO_ONE),
        'M' => Some(FieldKinds::TO_MANY),
        'R' => Some(FieldKinds::RELATIONSHIP),
        'F' => Some(FieldKinds::ANY),
        _ => None,
    }
}

impl FieldChainPattern {
    /// Parse pattern text, normalizing choice sets.
    pub fn parse(text: &str) -> Result<Self> {
        let error = |message: &str, position: usize| Error::InvalidPattern {
            pattern: text.to_string(),
            message: message.to_string(),
            position,
        };

        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Err(error("Pattern is empty", 0));
        }

        let mut elements = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let kinds = if c == '[' {
                i += 1;
                let mut set = FieldKinds::EMPTY;
                loop {
                    let current = chars.get(i).copied();
                    if let Some(kinds) = current.and_then(kind_of) {
                        set = set.union(kinds);
                        i += 1;
                    } else if current == Some(']') && !set.is_empty() {
                        i += 1;
                        break;
                    } else if let Some(c) = current.filter(|c| c.is_alphanumeric()) {
                        return Err(error(&format!("Unknown token '{c}'"), i));
                    } else if set.is_empty() {
                        return Err(error("Field type expected", i));
                    } else {
                        return Err(error("Field type or ] expected", i));
                    }
                }
                set
            } else if let Some(kinds) = kind_of(c) {
                i += 1;
                kinds
            } else if c.is_alphanumeric() {
                return Err(error(&format!("Unknown token '{c}'"), i));
            } else {
                return Err(error("Field type or [ expected", i));
            };

            let quantifier = match chars.get(i).copied() {
                Some('?') => {
                    i += 1;
                    Quantifier::ZeroOrOne
                }
                Some('*') => {
                    i += 1;
                    Quantifier::ZeroOrMore
                }
                Some('+') => {
                    i += 1;
                    Quantifier::OneOrMore
                }
                _ => Quantifier::ExactlyOne,
            };

            elements.push(PatternElement { kinds, quantifier });
        }

        Ok(Self { elements })
    }

    pub fn elements(&self) -> &[PatternElement] {
        &self.elements
    }

    /// Human-readable description, e.g. `"zero or more relationships,
    /// followed by a to-one relationship or attribute"`.
    pub fn description(&self) -> String {
        let parts: Vec<String> = self
            .elements
            .iter()
            .map(|element| match element.quantifier {
                Quantifier::ExactlyOne => {
                    let phrase = element.kinds.phrase();
                    let article = if phrase.starts_with('a') { "an" } else { "a" };
                    format!("{article} {phrase}")
                }
                Quantifier::ZeroOrOne => format!("an optional {}", element.kinds.phrase()),
                Quantifier::ZeroOrMore => {
                    format!("zero or more {}", element.kinds.phrase_plural())
                }
                Quantifier::OneOrMore => {
                    format!("one or more {}", element.kinds.phrase_plural())
                }
            })
            .collect();
        parts.join(", followed by ")
    }
}

impl fmt::Display for FieldChainPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            write!(f, "{}{}", element.kinds.render(), element.quantifier.suffix())?;
        }
        Ok(())
    }
}
