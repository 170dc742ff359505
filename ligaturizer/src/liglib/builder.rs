//! Macro and ligature rules, built from the resolver, the length
//! tagger and the chain compiler.
use tracing::{event, Level};

use glyphs::prelude::{FontEngine, GlyphName, LookupName};

use super::chain::Chain;
use super::compiler::{LigatureCompiler, SymbolSequence};
use super::length::{classifier_name, marker_name};
use super::types::LigatureFailure;

const NO_BREAK_SPACE: char = '\u{a0}';

/// Symbols wrapped around every replacement of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decorations {
    /// For macros, `None` means the introducing character of the
    /// target font; for ligatures it means no prefix.
    pub prefix: Option<SymbolSequence>,
    pub suffix: Option<SymbolSequence>,
}

impl<E: FontEngine> LigatureCompiler<E> {
    /// Adds the macro `\name`, which is replaced by `replacement`
    /// (decorated by `decorations`).  Returns the contextual rule
    /// group of the macro.
    pub fn add_macro(
        &mut self,
        name: &str,
        replacement: &SymbolSequence,
        decorations: &Decorations,
    ) -> Result<LookupName, LigatureFailure> {
        self.macro_chain(name, replacement, decorations)
            .map_err(|e| e.in_entry(&format!("{}{name}", self.introducer())))
    }

    /// Adds the one-argument macro `\name` for each argument in
    /// `arguments`, both as `\name X` (after a space or a no-break
    /// space) and as `\name{X}`.  Returns the contextual rule groups
    /// of all the forms.
    pub fn add_macro_font(
        &mut self,
        name: &str,
        arguments: &[(char, SymbolSequence)],
        decorations: &Decorations,
    ) -> Result<Vec<LookupName>, LigatureFailure> {
        let mut groups: Vec<LookupName> = Vec::with_capacity(arguments.len() * 3);
        for (argument, replacement) in arguments {
            let forms = self
                .macro_argument_chains(name, *argument, replacement, decorations)
                .map_err(|e| e.in_entry(&format!("{}{name}{{{argument}}}", self.introducer())))?;
            groups.extend(forms);
        }
        Ok(groups)
    }

    /// Adds a ligature replacing the target glyphs of `text` by
    /// `replacement`.
    pub fn add_ligature(
        &mut self,
        text: &str,
        replacement: &SymbolSequence,
        decorations: &Decorations,
    ) -> Result<LookupName, LigatureFailure> {
        self.ligature_chain(text, replacement, decorations)
            .map_err(|e| e.in_entry(text))
    }

    fn macro_name_glyphs(&mut self, name: &str) -> Result<Vec<GlyphName>, LigatureFailure> {
        if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(LigatureFailure::BadEntry {
                entry: name.to_string(),
                msg: "macro names must be one or more ASCII letters".to_string(),
            });
        }
        let mut input: Vec<GlyphName> = vec![marker_name(name.len())];
        input.extend(self.target_glyphs(name)?);
        Ok(input)
    }

    /// An empty decoration is dropped, whatever its format.
    fn decoration(&mut self, sequence: &SymbolSequence) -> Result<Vec<GlyphName>, LigatureFailure> {
        if sequence.text.is_empty() {
            Ok(Vec::new())
        } else {
            self.resolve_sequence(sequence)
        }
    }

    fn decorated(
        &mut self,
        replacement: &SymbolSequence,
        decorations: &Decorations,
        default_prefix: Option<GlyphName>,
    ) -> Result<Vec<GlyphName>, LigatureFailure> {
        let body = self.resolve_sequence(replacement)?;
        if body.is_empty() {
            return Err(LigatureFailure::EmptyReplacement);
        }
        let mut output: Vec<GlyphName> = match &decorations.prefix {
            Some(prefix) => self.decoration(prefix)?,
            None => default_prefix.into_iter().collect(),
        };
        output.extend(body);
        if let Some(suffix) = &decorations.suffix {
            output.extend(self.decoration(suffix)?);
        }
        Ok(output)
    }

    fn check_arity(input: &[GlyphName], output: &[GlyphName]) -> Result<(), LigatureFailure> {
        if output.is_empty() || input.len() < output.len() {
            Err(LigatureFailure::InvalidArity {
                inputs: input.len(),
                outputs: output.len(),
            })
        } else {
            Ok(())
        }
    }

    fn compile_macro_chain(
        &mut self,
        input: &[GlyphName],
        output: &[GlyphName],
    ) -> Result<LookupName, LigatureFailure> {
        let feature = self.feature().clone();
        let classifier = classifier_name();
        self.compile_chain(&Chain {
            feature: Some(&feature),
            after: Some(&classifier),
            ..Chain::new(input, output)
        })
    }

    fn macro_chain(
        &mut self,
        name: &str,
        replacement: &SymbolSequence,
        decorations: &Decorations,
    ) -> Result<LookupName, LigatureFailure> {
        let input = self.macro_name_glyphs(name)?;
        let introducer = self.introducer_glyph().clone();
        let output = self.decorated(replacement, decorations, Some(introducer))?;
        Self::check_arity(&input, &output)?;
        self.ensure_lengths_up_to(name.len())?;
        let group = self.compile_macro_chain(&input, &output)?;
        event!(
            Level::DEBUG,
            "macro {}{name} -> {}",
            self.introducer(),
            replacement.text
        );
        Ok(group)
    }

    fn macro_argument_chains(
        &mut self,
        name: &str,
        argument: char,
        replacement: &SymbolSequence,
        decorations: &Decorations,
    ) -> Result<Vec<LookupName>, LigatureFailure> {
        let prefix = self.macro_name_glyphs(name)?;
        let introducer = self.introducer_glyph().clone();
        let output = self.decorated(replacement, decorations, Some(introducer))?;
        let argument_glyphs = self.target_glyphs(&argument.to_string())?;
        let space = self.target_glyphs(" ")?;
        let no_break_space = self.target_glyphs(&NO_BREAK_SPACE.to_string())?;
        let braces = self.target_glyphs("{}")?;

        let forms: [Vec<GlyphName>; 3] = [
            [&prefix[..], &space[..], &argument_glyphs[..]].concat(),
            [&prefix[..], &no_break_space[..], &argument_glyphs[..]].concat(),
            [&prefix[..], &braces[..1], &argument_glyphs[..], &braces[1..]].concat(),
        ];
        for input in &forms {
            Self::check_arity(input, &output)?;
        }
        self.ensure_lengths_up_to(name.len())?;
        let mut groups: Vec<LookupName> = Vec::with_capacity(forms.len());
        for input in &forms {
            groups.push(self.compile_macro_chain(input, &output)?);
        }
        event!(
            Level::DEBUG,
            "macro {}{name}{{{argument}}} -> {}",
            self.introducer(),
            replacement.text
        );
        Ok(groups)
    }

    fn ligature_chain(
        &mut self,
        text: &str,
        replacement: &SymbolSequence,
        decorations: &Decorations,
    ) -> Result<LookupName, LigatureFailure> {
        let input = self.target_glyphs(text)?;
        let output = self.decorated(replacement, decorations, None)?;
        Self::check_arity(&input, &output)?;
        let feature = self.feature().clone();
        let group = self.compile_chain(&Chain {
            feature: Some(&feature),
            ..Chain::new(&input, &output)
        })?;
        event!(Level::DEBUG, "ligature {text} -> {}", replacement.text);
        Ok(group)
    }
}

#[cfg(test)]
mod tests;
