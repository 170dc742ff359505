//! Lowers a "replace this glyph run by that (no longer) glyph run"
//! request into rules the shaping engine can execute.
//!
//! For an input of `n` glyphs and an output of `m <= n` glyphs, a
//! chain consists of:
//!
//! - `m - 1` single-glyph rule groups, rewriting input glyph `i` into
//!   output glyph `i`;
//! - one merge rule group, turning input glyphs `m-1 .. n` into the
//!   last output glyph;
//! - one contextual rule group whose focus is the whole input, which
//!   invokes the groups above at their offsets and carries the
//!   look-back and look-ahead context.
//!
//! Every chain gets its own rule groups, even if an identical chain
//! was compiled before.
use tracing::{event, Level};

use glyphs::prelude::{
    ContextItem, ContextualRule, FeatureTag, FocusItem, FontEngine, GlyphName, LookupName,
    Placement, RuleKind, SubtableName,
};

use super::types::LigatureFailure;

#[derive(Debug, Clone, Copy)]
pub struct Chain<'a> {
    pub input: &'a [GlyphName],
    pub output: &'a [GlyphName],
    pub look_back: &'a [GlyphName],
    pub look_ahead: &'a [GlyphName],
    /// The feature which applies the contextual rule.
    pub feature: Option<&'a FeatureTag>,
    /// The contextual rule applies after this group.
    pub after: Option<&'a LookupName>,
}

impl<'a> Chain<'a> {
    /// A chain with no context, no feature and no predecessor.
    #[must_use]
    pub fn new(input: &'a [GlyphName], output: &'a [GlyphName]) -> Chain<'a> {
        Chain {
            input,
            output,
            look_back: &[],
            look_ahead: &[],
            feature: None,
            after: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ChainCompiler {
    count: usize,
}

impl ChainCompiler {
    #[must_use]
    pub fn new() -> ChainCompiler {
        ChainCompiler::default()
    }

    /// The number of chains compiled so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Registers the rules of `chain` and returns the name of its
    /// contextual rule group.  Nothing is registered if the chain's
    /// shape is invalid.
    pub fn compile<E: FontEngine>(
        &mut self,
        engine: &mut E,
        chain: &Chain<'_>,
    ) -> Result<LookupName, LigatureFailure> {
        let (inputs, outputs) = (chain.input.len(), chain.output.len());
        if outputs == 0 || inputs < outputs {
            return Err(LigatureFailure::InvalidArity { inputs, outputs });
        }
        let n = self.count;
        self.count += 1;

        let last = outputs - 1;
        let mut focus: Vec<FocusItem> = Vec::with_capacity(inputs);
        for (i, (input, output)) in chain.input.iter().zip(chain.output).enumerate() {
            let group = LookupName::from(format!("lookup.N{n}.{i}"));
            if i < last {
                engine.add_rule_group(&group, RuleKind::Single, None, None)?;
                engine.bind_single(&group, input, output)?;
            } else {
                engine.add_rule_group(&group, RuleKind::Merge, None, None)?;
                engine.bind_merge(&group, output, &chain.input[i..])?;
            }
            focus.push(FocusItem {
                item: ContextItem::Glyph(input.clone()),
                invoke: Some(group),
            });
        }
        focus.extend(chain.input[outputs..].iter().map(|input| FocusItem {
            item: ContextItem::Glyph(input.clone()),
            invoke: None,
        }));

        let context = LookupName::from(format!("lookup.ctx.N{n}"));
        engine.add_rule_group(&context, RuleKind::Contextual, chain.feature, chain.after)?;
        let rule = ContextualRule {
            lookback: chain.look_back.iter().cloned().map(ContextItem::Glyph).collect(),
            focus,
            lookahead: chain.look_ahead.iter().cloned().map(ContextItem::Glyph).collect(),
        };
        event!(Level::DEBUG, "chain {n}: {rule}");
        engine.bind_contextual(
            &context,
            &SubtableName::from(format!("lookup.ctx.sub.N{n}")),
            rule,
            Placement::Last,
        )?;
        Ok(context)
    }
}
