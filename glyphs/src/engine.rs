//! The capability the rule compiler needs from a font: creating
//! glyphs, copying outlines from donor resources, and registering
//! ordered substitution rules.
use std::fmt::{self, Display, Formatter};
use std::io::Error as IoError;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::inventory::GlyphInventory;
use super::metadata::FontNames;
use super::name::{FeatureTag, GlyphName, LookupName, ResourceId, SubtableName};
use super::rules::{ContextualRule, Placement, RuleKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoAction {
    Read,
    Write,
    Create,
}

impl Display for IoAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IoAction::Read => "read",
            IoAction::Write => "write",
            IoAction::Create => "create",
        })
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("glyph {0} already exists")]
    DuplicateGlyph(GlyphName),
    #[error("there is no glyph named {0}")]
    UnknownGlyph(GlyphName),
    #[error("resource {0} has not been declared to the font engine")]
    UnknownResource(ResourceId),
    #[error("resource {resource} has no glyph named {glyph}")]
    MissingSourceGlyph {
        resource: ResourceId,
        glyph: GlyphName,
    },
    #[error("rule group {0} already exists")]
    DuplicateGroup(LookupName),
    #[error("there is no rule group named {0}")]
    UnknownGroup(LookupName),
    #[error("rule group {group} cannot apply after {after}, which has not been registered")]
    UnknownPredecessor { group: LookupName, after: LookupName },
    #[error("rule group {group} holds {holds} rules, so a {offered} rule cannot be added to it")]
    KindMismatch {
        group: LookupName,
        holds: RuleKind,
        offered: RuleKind,
    },
    #[error("rule group {group} is ordered before {after}, but must apply after it")]
    OrderingViolation { group: LookupName, after: LookupName },
    #[error("a {0} rule must consume at least one glyph")]
    EmptyRule(RuleKind),
    #[error("failed to {action} {}: {error}", .path.display())]
    Io {
        action: IoAction,
        path: PathBuf,
        #[source]
        error: IoError,
    },
    #[error("cannot read font {resource}: {msg}")]
    BadFont { resource: ResourceId, msg: String },
    #[error("failed to encode glyph manifest: {0}")]
    Manifest(#[from] toml::ser::Error),
}

/// A font which can be extended with imported glyphs and
/// substitution rules.
///
/// Rules are append-only: nothing registered through this trait is
/// ever removed.  Within a rule group, and between rule groups bound
/// to the same feature, registration order is significant.
pub trait FontEngine {
    /// Returns the glyph the font (as originally loaded) maps `ch`
    /// to, either as its primary codepoint or as an alternate one.
    fn glyph_for_char(&self, ch: char) -> Option<GlyphName>;

    /// Makes a donor font known to the engine, so that outlines may
    /// be copied from it.
    fn declare_donor(&mut self, donor: &GlyphInventory);

    /// Returns true if the font has a glyph called `name`, including
    /// glyphs created through [`FontEngine::create_glyph`].
    fn has_glyph(&self, name: &GlyphName) -> bool;

    /// Allocates an empty glyph slot called `name`.
    fn create_glyph(&mut self, name: &GlyphName) -> Result<GlyphName, EngineError>;

    /// Makes the glyph `dst` a copy of the glyph `src_name` of
    /// `src_resource`.  The target font itself is named by
    /// [`ResourceId::target`].
    fn copy_outline(
        &mut self,
        dst: &GlyphName,
        src_resource: &ResourceId,
        src_name: &GlyphName,
    ) -> Result<(), EngineError>;

    /// Registers a new, empty rule group.  When `feature` is given,
    /// the group is applied directly by that feature; otherwise it
    /// only runs when invoked from a contextual rule.  When `after`
    /// is given, the group must apply after that (already
    /// registered) group.
    fn add_rule_group(
        &mut self,
        name: &LookupName,
        kind: RuleKind,
        feature: Option<&FeatureTag>,
        after: Option<&LookupName>,
    ) -> Result<(), EngineError>;

    fn bind_single(
        &mut self,
        group: &LookupName,
        input: &GlyphName,
        output: &GlyphName,
    ) -> Result<(), EngineError>;

    fn bind_merge(
        &mut self,
        group: &LookupName,
        output: &GlyphName,
        inputs: &[GlyphName],
    ) -> Result<(), EngineError>;

    fn bind_contextual(
        &mut self,
        group: &LookupName,
        subtable: &SubtableName,
        rule: ContextualRule,
        placement: Placement,
    ) -> Result<(), EngineError>;

    /// Replaces the textual metadata written out with the font.
    fn set_names(&mut self, names: FontNames);

    fn serialize(&self, path: &Path) -> Result<(), EngineError>;
}
