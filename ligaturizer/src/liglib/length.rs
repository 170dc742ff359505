//! The length tagger rewrites the introducing character of every
//! macro into a marker glyph which records how many letters follow
//! it.  Macro rules then match on the marker, so that a macro never
//! fires inside a longer macro which shares its prefix.
use std::rc::Rc;

use tracing::{event, Level};

use glyphs::prelude::{
    ContextItem, ContextualRule, FeatureTag, FocusItem, FontEngine, GlyphClass, GlyphName,
    LookupName, Placement, ResourceId, RuleKind, SubtableName,
};

use super::types::LigatureFailure;

/// The name of the contextual rule group which classifies macros by
/// length.
pub const CLASSIFIER: &str = "calt.macro.length";

const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[must_use]
pub fn classifier_name() -> LookupName {
    LookupName::from(CLASSIFIER)
}

/// The glyph standing for "introducing character followed by
/// `length` letters".
#[must_use]
pub fn marker_name(length: usize) -> GlyphName {
    GlyphName::from(format!("macro.{length}.liga"))
}

#[derive(Debug, Default)]
pub struct LengthTagger {
    /// The longest length which has a marker.
    covered: usize,
    letters: Option<Rc<GlyphClass>>,
}

impl LengthTagger {
    #[must_use]
    pub fn new() -> LengthTagger {
        LengthTagger::default()
    }

    /// Markers exist for every length from 1 up to and including
    /// this value.
    #[must_use]
    pub fn covered(&self) -> usize {
        self.covered
    }

    /// Makes sure that markers, and the rules which introduce them,
    /// exist for every length up to `longest + 1`.  The extra length
    /// claims letter runs too long for any macro registered so far.
    pub fn ensure_lengths_up_to<E: FontEngine>(
        &mut self,
        engine: &mut E,
        introducer: &GlyphName,
        feature: &FeatureTag,
        longest: usize,
    ) -> Result<(), LigatureFailure> {
        let letters: Rc<GlyphClass> = match &self.letters {
            Some(letters) => Rc::clone(letters),
            None => {
                let letters = Rc::new(GlyphClass {
                    name: "letters".to_string(),
                    members: LETTERS.chars().filter_map(|ch| engine.glyph_for_char(ch)).collect(),
                });
                engine.add_rule_group(&classifier_name(), RuleKind::Contextual, Some(feature), None)?;
                event!(
                    Level::DEBUG,
                    "created the macro length classifier, with {} letters",
                    letters.members.len()
                );
                self.letters = Some(Rc::clone(&letters));
                letters
            }
        };

        let wanted = longest + 1;
        if wanted <= self.covered {
            return Ok(());
        }
        for length in (self.covered + 1)..=wanted {
            let marker = marker_name(length);
            if !engine.has_glyph(&marker) {
                engine.create_glyph(&marker)?;
                engine.copy_outline(&marker, &ResourceId::target(), introducer)?;
            }

            let single = LookupName::from(format!("lookup.macro.length.{length}"));
            engine.add_rule_group(&single, RuleKind::Single, None, None)?;
            engine.bind_single(&single, introducer, &marker)?;

            let rule = ContextualRule {
                lookback: Vec::new(),
                focus: vec![FocusItem {
                    item: ContextItem::Glyph(introducer.clone()),
                    invoke: Some(single),
                }],
                lookahead: vec![ContextItem::Class(Rc::clone(&letters)); length],
            };
            // Newest first, so that longer lengths are tried before
            // shorter ones.
            engine.bind_contextual(
                &classifier_name(),
                &SubtableName::from(format!("lookup.ctx.macro.length.{length}")),
                rule,
                Placement::First,
            )?;
            event!(Level::DEBUG, "created length marker {marker}");
            self.covered = length;
        }
        Ok(())
    }
}
