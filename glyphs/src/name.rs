//! Names of the things a font engine keeps track of: glyphs,
//! lookups (rule groups), lookup subtables, donor resources and
//! OpenType tags.
use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use thiserror::Error;

macro_rules! string_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> $name {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> $name {
                $name(s.to_string())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(self.0.as_str())
            }
        }
    };
}

string_name!(
    /// The name of a glyph.  Font engines identify glyphs by name,
    /// so a `GlyphName` is also the glyph reference handed out by the
    /// resolver.
    GlyphName
);

string_name!(
    /// The name of a lookup, that is, of an ordered group of
    /// substitution rules of a single kind.
    LookupName
);

string_name!(
    /// The name of a subtable within a lookup.
    SubtableName
);

string_name!(
    /// Identifies a font resource: either the target font (see
    /// [`ResourceId::target`]) or one of the donor fonts.
    ResourceId
);

impl ResourceId {
    /// The name by which tables refer to the font being modified.
    pub const TARGET: &'static str = "Default";

    #[must_use]
    pub fn target() -> ResourceId {
        ResourceId::from(ResourceId::TARGET)
    }

    #[must_use]
    pub fn is_target(&self) -> bool {
        self.0 == ResourceId::TARGET
    }
}

/// Turn an arbitrary string into something acceptable as a glyph
/// name in a feature file.  Only ASCII letters, digits, `.` and `_`
/// are kept; the name must not begin with a digit or a period.
#[must_use]
pub fn sanitize_glyph_name(s: &str) -> String {
    let mut result: String = s
        .chars()
        .map(|ch| match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' => ch,
            _ => '_',
        })
        .collect();
    match result.chars().next() {
        None => "_".to_string(),
        Some(first) if first.is_ascii_digit() || first == '.' => {
            result.insert(0, '_');
            result
        }
        Some(_) => result,
    }
}

/// Signals that a string cannot be used as an OpenType tag.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
#[error("'{0}' is not a valid OpenType tag (a tag is one to four printable ASCII characters)")]
pub struct BadTag(pub String);

fn check_tag(s: &str) -> Result<String, BadTag> {
    let trimmed = s.trim_end();
    if trimmed.is_empty() || s.len() > 4 || !s.chars().all(|ch| ch.is_ascii_graphic() || ch == ' ')
    {
        Err(BadTag(s.to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}

/// An OpenType feature tag such as `calt` or `liga`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureTag(String);

impl FeatureTag {
    pub fn new(s: &str) -> Result<FeatureTag, BadTag> {
        check_tag(s).map(FeatureTag)
    }

    /// The contextual alternates feature, which is where ligature
    /// chains are registered unless the tables say otherwise.
    #[must_use]
    pub fn calt() -> FeatureTag {
        FeatureTag("calt".to_string())
    }
}

impl Display for FeatureTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// A script/language pair for which the features of a font are
/// registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageSystem {
    pub script: String,
    pub language: String,
}

impl LanguageSystem {
    /// Parse a `"script language"` pair such as `"latn dflt"`.
    pub fn parse(s: &str) -> Result<LanguageSystem, BadTag> {
        let mut words = s.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some(script), Some(language), None) => Ok(LanguageSystem {
                script: check_tag(script)?,
                language: check_tag(language)?,
            }),
            _ => Err(BadTag(s.to_string())),
        }
    }

    /// The language systems for which contextual alternates are
    /// normally registered in a monospace programming font.
    #[must_use]
    pub fn defaults() -> Vec<LanguageSystem> {
        const SYSTEMS: &[(&str, &[&str])] = &[
            ("DFLT", &["dflt"]),
            ("arab", &["dflt"]),
            ("armn", &["dflt"]),
            ("cyrl", &["SRB", "dflt"]),
            ("geor", &["dflt"]),
            ("grek", &["dflt"]),
            ("lao", &["dflt"]),
            (
                "latn",
                &[
                    "CAT", "ESP", "GAL", "ISM", "KSM", "LSM", "MOL", "NSM", "ROM", "SKS", "SSM",
                    "dflt",
                ],
            ),
            ("math", &["dflt"]),
            ("thai", &["dflt"]),
        ];
        SYSTEMS
            .iter()
            .flat_map(|(script, languages)| {
                languages.iter().map(move |language| LanguageSystem {
                    script: (*script).to_string(),
                    language: (*language).to_string(),
                })
            })
            .collect()
    }
}

impl Display for LanguageSystem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.script, self.language)
    }
}

#[test]
fn test_sanitize_glyph_name() {
    assert_eq!(sanitize_glyph_name("FiraCode.summation"), "FiraCode.summation");
    assert_eq!(sanitize_glyph_name("DejaVu Bold.alpha"), "DejaVu_Bold.alpha");
    assert_eq!(sanitize_glyph_name("1.one"), "_1.one");
    assert_eq!(sanitize_glyph_name(".notdef"), "_.notdef");
    assert_eq!(sanitize_glyph_name(""), "_");
}

#[test]
fn test_feature_tag() {
    assert_eq!(FeatureTag::new("calt"), Ok(FeatureTag::calt()));
    assert_eq!(FeatureTag::new("ss1 ").map(|t| t.to_string()), Ok("ss1".to_string()));
    assert!(FeatureTag::new("").is_err());
    assert!(FeatureTag::new("toolong").is_err());
    assert!(FeatureTag::new("ca\u{e9}").is_err());
}

#[test]
fn test_language_system_parse() {
    assert_eq!(
        LanguageSystem::parse("latn  dflt"),
        Ok(LanguageSystem {
            script: "latn".to_string(),
            language: "dflt".to_string(),
        })
    );
    assert!(LanguageSystem::parse("latn").is_err());
    assert!(LanguageSystem::parse("latn dflt extra").is_err());
}

#[test]
fn test_default_language_systems_start_with_dflt() {
    let systems = LanguageSystem::defaults();
    assert_eq!(systems[0].to_string(), "DFLT dflt");
    assert!(systems.iter().any(|ls| ls.to_string() == "latn ROM"));
}

#[test]
fn test_target_resource() {
    assert!(ResourceId::target().is_target());
    assert!(!ResourceId::from("FiraCode").is_target());
}
