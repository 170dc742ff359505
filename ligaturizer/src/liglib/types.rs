use std::io::Error as IoError;
use std::path::PathBuf;

use thiserror::Error;

use glyphs::prelude::{BadTag, EngineError, IoAction, ResourceId};

fn join_resources(resources: &[ResourceId]) -> String {
    let names: Vec<&str> = resources.iter().map(ResourceId::as_str).collect();
    names.join(", ")
}

#[derive(Debug, Error)]
pub enum LigatureFailure {
    /// No candidate resource (including the target) has the symbol.
    #[error("{symbol} was not found in any of these fonts: {}", join_resources(.resources))]
    GlyphNotFound {
        symbol: String,
        resources: Vec<ResourceId>,
    },
    /// A chain was requested whose output is longer than its input
    /// (or one of them is empty).
    #[error("cannot substitute {inputs} glyphs by {outputs} glyphs; the output must be between one glyph and as long as the input")]
    InvalidArity { inputs: usize, outputs: usize },
    #[error("the replacement names no symbols")]
    EmptyReplacement,
    #[error("unknown symbol format '{0}' (expected 'literal' or 'advanced')")]
    UnknownFormat(String),
    #[error("glyph spec '{spec}' contains an empty token")]
    EmptyToken { spec: String },
    #[error("font {0} is not declared in the tables file")]
    UnknownResource(ResourceId),
    #[error("{entry}: {msg}")]
    BadEntry { entry: String, msg: String },
    /// Gives the context in which another failure happened.
    #[error("{entry}: {error}")]
    Entry {
        entry: String,
        #[source]
        error: Box<LigatureFailure>,
    },
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    BadTag(#[from] BadTag),
    #[error("failed to {action} {}: {error}", .path.display())]
    Io {
        action: IoAction,
        path: PathBuf,
        #[source]
        error: IoError,
    },
    #[error("bad tables file {}: {msg}", .path.display())]
    BadTables { path: PathBuf, msg: String },
}

impl LigatureFailure {
    /// Wraps `self` in the context of the table entry `entry`.
    #[must_use]
    pub fn in_entry(self, entry: &str) -> LigatureFailure {
        LigatureFailure::Entry {
            entry: entry.to_string(),
            error: Box::new(self),
        }
    }

    /// The failure underneath any entry context.
    #[must_use]
    pub fn root_cause(&self) -> &LigatureFailure {
        match self {
            LigatureFailure::Entry { error, .. } => error.root_cause(),
            other => other,
        }
    }
}

#[test]
fn test_glyph_not_found_message_lists_resources() {
    let failure = LigatureFailure::GlyphNotFound {
        symbol: "'\u{2115}' (U+2115)".to_string(),
        resources: vec![ResourceId::target(), ResourceId::from("FiraCode")],
    };
    assert_eq!(
        failure.in_entry("\\mathbb N").to_string(),
        "\\mathbb N: '\u{2115}' (U+2115) was not found in any of these fonts: Default, FiraCode"
    );
}

#[test]
fn test_root_cause() {
    let failure = LigatureFailure::InvalidArity {
        inputs: 1,
        outputs: 2,
    }
    .in_entry("inner")
    .in_entry("outer");
    assert!(matches!(
        failure.root_cause(),
        LigatureFailure::InvalidArity {
            inputs: 1,
            outputs: 2
        }
    ));
}
