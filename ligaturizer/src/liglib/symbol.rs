//! Symbol specifications: how table entries name the glyphs they
//! want.
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use glyphs::prelude::{GlyphName, ResourceId};

use super::types::LigatureFailure;

/// One requested symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolSpec {
    /// A character, to be found by codepoint.
    Literal(char),
    /// A glyph name, optionally in one specific resource.
    Named {
        name: GlyphName,
        resource: Option<ResourceId>,
    },
}

impl Display for SymbolSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SymbolSpec::Literal(ch) => write!(f, "'{ch}' (U+{:04X})", u32::from(*ch)),
            SymbolSpec::Named {
                name,
                resource: None,
            } => write!(f, "glyph {name}"),
            SymbolSpec::Named {
                name,
                resource: Some(resource),
            } => write!(f, "glyph {name}@{resource}"),
        }
    }
}

/// How the text of a replacement is to be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SymbolFormat {
    /// Every character stands for itself.
    #[default]
    Literal,
    /// Space-separated glyph names, each optionally followed by
    /// `@resource`.
    Advanced,
}

impl FromStr for SymbolFormat {
    type Err = LigatureFailure;

    fn from_str(s: &str) -> Result<SymbolFormat, LigatureFailure> {
        match s {
            "literal" => Ok(SymbolFormat::Literal),
            "advanced" => Ok(SymbolFormat::Advanced),
            other => Err(LigatureFailure::UnknownFormat(other.to_string())),
        }
    }
}

fn parse_token(token: &str, spec: &str) -> Result<SymbolSpec, LigatureFailure> {
    let empty = || LigatureFailure::EmptyToken {
        spec: spec.to_string(),
    };
    match token.split_once('@') {
        None if token.is_empty() => Err(empty()),
        None => Ok(SymbolSpec::Named {
            name: GlyphName::from(token),
            resource: None,
        }),
        Some((name, resource)) if name.is_empty() || resource.is_empty() => Err(empty()),
        Some((name, resource)) => Ok(SymbolSpec::Named {
            name: GlyphName::from(name),
            resource: Some(ResourceId::from(resource)),
        }),
    }
}

/// Splits the text of a replacement into the symbols it requests.
pub fn parse_sequence(text: &str, format: SymbolFormat) -> Result<Vec<SymbolSpec>, LigatureFailure> {
    match format {
        SymbolFormat::Literal => Ok(text.chars().map(SymbolSpec::Literal).collect()),
        SymbolFormat::Advanced => text
            .split(' ')
            .map(|token| parse_token(token, text))
            .collect(),
    }
}

#[test]
fn test_parse_literal() {
    assert_eq!(
        parse_sequence("\u{3b1}\u{3b2}", SymbolFormat::Literal).expect("literal text always parses"),
        vec![SymbolSpec::Literal('\u{3b1}'), SymbolSpec::Literal('\u{3b2}')]
    );
    assert_eq!(
        parse_sequence("", SymbolFormat::Literal).expect("literal text always parses"),
        vec![]
    );
}

#[test]
fn test_parse_advanced() {
    assert_eq!(
        parse_sequence("backslash@Default underscore_middle.seq@FiraCode summation", SymbolFormat::Advanced)
            .expect("valid advanced spec"),
        vec![
            SymbolSpec::Named {
                name: GlyphName::from("backslash"),
                resource: Some(ResourceId::target()),
            },
            SymbolSpec::Named {
                name: GlyphName::from("underscore_middle.seq"),
                resource: Some(ResourceId::from("FiraCode")),
            },
            SymbolSpec::Named {
                name: GlyphName::from("summation"),
                resource: None,
            },
        ]
    );
}

#[test]
fn test_parse_advanced_rejects_empty_tokens() {
    for spec in ["", " ", "summation ", " summation", "a  b", "@FiraCode", "summation@"] {
        match parse_sequence(spec, SymbolFormat::Advanced) {
            Err(LigatureFailure::EmptyToken { spec: reported }) => assert_eq!(reported, spec),
            other => panic!("expected an empty token error for '{spec}', got {other:?}"),
        }
    }
}

#[test]
fn test_format_from_str() {
    assert_eq!("literal".parse::<SymbolFormat>().ok(), Some(SymbolFormat::Literal));
    assert_eq!("advanced".parse::<SymbolFormat>().ok(), Some(SymbolFormat::Advanced));
    for tag in ["name", "unicode"] {
        assert!(matches!(
            tag.parse::<SymbolFormat>(),
            Err(LigatureFailure::UnknownFormat(t)) if t == tag
        ));
    }
}

#[test]
fn test_symbol_display() {
    assert_eq!(SymbolSpec::Literal('\u{2115}').to_string(), "'\u{2115}' (U+2115)");
    assert_eq!(
        SymbolSpec::Named {
            name: GlyphName::from("summation"),
            resource: Some(ResourceId::from("FiraCode")),
        }
        .to_string(),
        "glyph summation@FiraCode"
    );
}
