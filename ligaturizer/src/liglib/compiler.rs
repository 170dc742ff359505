//! The compiler session: one font engine plus every cache which lives
//! for the duration of a run.
use glyphs::prelude::{FeatureTag, FontEngine, GlyphInventory, GlyphName, LookupName, ResourceId};

use super::chain::{Chain, ChainCompiler};
use super::length::LengthTagger;
use super::resolver::{Candidates, DonorResolver};
use super::symbol::{SymbolFormat, SymbolSpec};
use super::types::LigatureFailure;

/// A run of symbols, read in one format and resolved against one
/// list of candidate resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSequence {
    pub text: String,
    pub format: SymbolFormat,
    pub candidates: Candidates,
}

impl SymbolSequence {
    #[must_use]
    pub fn literal(text: &str, candidates: Candidates) -> SymbolSequence {
        SymbolSequence {
            text: text.to_string(),
            format: SymbolFormat::Literal,
            candidates,
        }
    }

    #[must_use]
    pub fn advanced(text: &str, candidates: Candidates) -> SymbolSequence {
        SymbolSequence {
            text: text.to_string(),
            format: SymbolFormat::Advanced,
            candidates,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// The feature which applies the length classifier and every
    /// chain.
    pub feature: FeatureTag,
    /// The character which starts every macro.
    pub introducer: char,
}

impl Default for CompilerOptions {
    fn default() -> CompilerOptions {
        CompilerOptions {
            feature: FeatureTag::calt(),
            introducer: '\\',
        }
    }
}

pub struct LigatureCompiler<E: FontEngine> {
    engine: E,
    resolver: DonorResolver,
    lengths: LengthTagger,
    chains: ChainCompiler,
    feature: FeatureTag,
    introducer: char,
    introducer_glyph: GlyphName,
}

impl<E: FontEngine> LigatureCompiler<E> {
    /// Starts a session which adds rules to `engine`, importing
    /// glyphs from `donors` as needed.  The target font must have a
    /// glyph for the introducing character.
    pub fn new(
        mut engine: E,
        donors: Vec<GlyphInventory>,
        options: CompilerOptions,
    ) -> Result<LigatureCompiler<E>, LigatureFailure> {
        let introducer_glyph = engine.glyph_for_char(options.introducer).ok_or_else(|| {
            LigatureFailure::GlyphNotFound {
                symbol: SymbolSpec::Literal(options.introducer).to_string(),
                resources: vec![ResourceId::target()],
            }
        })?;
        for donor in &donors {
            engine.declare_donor(donor);
        }
        Ok(LigatureCompiler {
            engine,
            resolver: DonorResolver::new(donors),
            lengths: LengthTagger::new(),
            chains: ChainCompiler::new(),
            feature: options.feature,
            introducer: options.introducer,
            introducer_glyph,
        })
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[must_use]
    pub fn into_engine(self) -> E {
        self.engine
    }

    #[must_use]
    pub fn resolver(&self) -> &DonorResolver {
        &self.resolver
    }

    #[must_use]
    pub fn lengths(&self) -> &LengthTagger {
        &self.lengths
    }

    /// The number of chains compiled so far.
    #[must_use]
    pub fn chain_count(&self) -> usize {
        self.chains.count()
    }

    #[must_use]
    pub fn introducer(&self) -> char {
        self.introducer
    }

    /// The target glyph for the introducing character.
    #[must_use]
    pub fn introducer_glyph(&self) -> &GlyphName {
        &self.introducer_glyph
    }

    #[must_use]
    pub fn feature(&self) -> &FeatureTag {
        &self.feature
    }

    pub fn resolve_sequence(
        &mut self,
        sequence: &SymbolSequence,
    ) -> Result<Vec<GlyphName>, LigatureFailure> {
        self.resolver.resolve_sequence(
            &mut self.engine,
            &sequence.text,
            sequence.format,
            &sequence.candidates,
        )
    }

    /// The target glyph of each character of `text`.
    pub fn target_glyphs(&mut self, text: &str) -> Result<Vec<GlyphName>, LigatureFailure> {
        self.resolver.resolve_sequence(
            &mut self.engine,
            text,
            SymbolFormat::Literal,
            &Candidates::target_only(),
        )
    }

    pub fn ensure_lengths_up_to(&mut self, longest: usize) -> Result<(), LigatureFailure> {
        self.lengths
            .ensure_lengths_up_to(&mut self.engine, &self.introducer_glyph, &self.feature, longest)
    }

    pub fn compile_chain(&mut self, chain: &Chain<'_>) -> Result<LookupName, LigatureFailure> {
        self.chains.compile(&mut self.engine, chain)
    }
}
