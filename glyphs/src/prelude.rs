//! The prelude exports the structs and traits which are useful in
//! representing glyphs and substitution rules.  Providing this
//! prelude is the main purpose of the glyphs crate.
pub use super::engine::{EngineError, FontEngine, IoAction};
pub use super::fea::FeatureFile;
pub use super::inventory::{GlyphInventory, GlyphRecord};
pub use super::manifest::{DonorEntry, GlyphEntry, Manifest};
pub use super::metadata::{
    name_without_file_extension, name_without_width_variant, split_camel_case, FontNames,
};
pub use super::name::{
    sanitize_glyph_name, BadTag, FeatureTag, GlyphName, LanguageSystem, LookupName, ResourceId,
    SubtableName,
};
pub use super::project::{CreatedGlyph, FontProject, OutlineSource};
pub use super::rules::{
    BoundRule, ContextItem, ContextualRule, FocusItem, GlyphClass, Placement, Rule, RuleGroup,
    RuleKind, RuleTable,
};
