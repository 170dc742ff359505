//! Substitution rules and the ordered table of rule groups which
//! holds them.
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter, Write};
use std::rc::Rc;

use super::engine::EngineError;
use super::name::{FeatureTag, GlyphName, LookupName, SubtableName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// One glyph is replaced by another.
    Single,
    /// A run of glyphs is replaced by one glyph.
    Merge,
    /// Other rule groups are invoked on a focus sequence when the
    /// surrounding glyphs match.
    Contextual,
}

impl Display for RuleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuleKind::Single => "single",
            RuleKind::Merge => "merge",
            RuleKind::Contextual => "contextual",
        })
    }
}

/// A named set of glyphs, matched as a unit in contextual rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphClass {
    pub name: String,
    pub members: Vec<GlyphName>,
}

/// One position of a contextual rule's look-back, focus or
/// look-ahead sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextItem {
    Glyph(GlyphName),
    Class(Rc<GlyphClass>),
}

impl Display for ContextItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ContextItem::Glyph(name) => write!(f, "{name}"),
            ContextItem::Class(class) => write!(f, "@{}", class.name),
        }
    }
}

/// A position of the focus sequence, optionally naming the rule
/// group to invoke at that position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusItem {
    pub item: ContextItem,
    pub invoke: Option<LookupName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextualRule {
    pub lookback: Vec<ContextItem>,
    pub focus: Vec<FocusItem>,
    pub lookahead: Vec<ContextItem>,
}

impl ContextualRule {
    /// The rule groups this rule invokes, in focus order.
    pub fn invoked(&self) -> impl Iterator<Item = &LookupName> {
        self.focus.iter().filter_map(|item| item.invoke.as_ref())
    }
}

fn write_items(f: &mut Formatter<'_>, items: &[ContextItem]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl Display for ContextualRule {
    /// Formats the rule as `lookback | focus | lookahead`, marking
    /// invocations in the focus as `@<group>`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_items(f, &self.lookback)?;
        if !self.lookback.is_empty() {
            f.write_char(' ')?;
        }
        f.write_char('|')?;
        for FocusItem { item, invoke } in &self.focus {
            write!(f, " {item}")?;
            if let Some(group) = invoke {
                write!(f, " @<{group}>")?;
            }
        }
        f.write_str(" |")?;
        if !self.lookahead.is_empty() {
            f.write_char(' ')?;
            write_items(f, &self.lookahead)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Single {
        input: GlyphName,
        output: GlyphName,
    },
    Merge {
        inputs: Vec<GlyphName>,
        output: GlyphName,
    },
    Contextual(ContextualRule),
}

impl Rule {
    #[must_use]
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Single { .. } => RuleKind::Single,
            Rule::Merge { .. } => RuleKind::Merge,
            Rule::Contextual(_) => RuleKind::Contextual,
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Single { input, output } => write!(f, "{input} -> {output}"),
            Rule::Merge { inputs, output } => {
                for input in inputs {
                    write!(f, "{input} ")?;
                }
                write!(f, "-> {output}")
            }
            Rule::Contextual(rule) => write!(f, "{rule}"),
        }
    }
}

/// A rule as registered in a group, together with the subtable it
/// was registered under (if it was given one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundRule {
    pub subtable: Option<SubtableName>,
    pub rule: Rule,
}

/// Where a newly bound rule goes within its group.  Rules earlier in
/// a group are tried first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleGroup {
    pub name: LookupName,
    pub kind: RuleKind,
    pub feature: Option<FeatureTag>,
    pub after: Option<LookupName>,
    pub rules: Vec<BoundRule>,
}

/// The append-only, ordered collection of rule groups of a font.
///
/// Groups are kept in registration order.  A group may name one
/// predecessor it must apply after; together these "applies after"
/// edges form a DAG, and since a predecessor must be registered
/// before its successor, registration order is a valid
/// linearisation of it.
#[derive(Debug, Default, Clone)]
pub struct RuleTable {
    groups: Vec<RuleGroup>,
    index: HashMap<LookupName, usize>,
}

impl RuleTable {
    #[must_use]
    pub fn new() -> RuleTable {
        RuleTable::default()
    }

    pub fn add_group(
        &mut self,
        name: &LookupName,
        kind: RuleKind,
        feature: Option<&FeatureTag>,
        after: Option<&LookupName>,
    ) -> Result<(), EngineError> {
        if self.index.contains_key(name) {
            return Err(EngineError::DuplicateGroup(name.clone()));
        }
        if let Some(pred) = after {
            if !self.index.contains_key(pred) {
                return Err(EngineError::UnknownPredecessor {
                    group: name.clone(),
                    after: pred.clone(),
                });
            }
        }
        self.index.insert(name.clone(), self.groups.len());
        self.groups.push(RuleGroup {
            name: name.clone(),
            kind,
            feature: feature.cloned(),
            after: after.cloned(),
            rules: Vec::new(),
        });
        Ok(())
    }

    pub fn bind(
        &mut self,
        group: &LookupName,
        bound: BoundRule,
        placement: Placement,
    ) -> Result<(), EngineError> {
        let pos = *self
            .index
            .get(group)
            .ok_or_else(|| EngineError::UnknownGroup(group.clone()))?;
        if let Rule::Contextual(rule) = &bound.rule {
            if let Some(missing) = rule.invoked().find(|name| !self.index.contains_key(*name)) {
                return Err(EngineError::UnknownGroup(missing.clone()));
            }
        }
        let target = &mut self.groups[pos];
        let offered = bound.rule.kind();
        if target.kind != offered {
            return Err(EngineError::KindMismatch {
                group: group.clone(),
                holds: target.kind,
                offered,
            });
        }
        match placement {
            Placement::First => target.rules.insert(0, bound),
            Placement::Last => target.rules.push(bound),
        }
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, name: &LookupName) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub fn group(&self, name: &LookupName) -> Option<&RuleGroup> {
        self.index.get(name).map(|pos| &self.groups[*pos])
    }

    /// The groups in registration order.
    pub fn groups(&self) -> impl Iterator<Item = &RuleGroup> {
        self.groups.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Counts the rules of the given kind across all groups.
    #[must_use]
    pub fn count_rules(&self, kind: RuleKind) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.rules.iter())
            .filter(|bound| bound.rule.kind() == kind)
            .count()
    }

    /// The "applies after" edges, as `(predecessor, successor)` pairs.
    pub fn ordering_edges(&self) -> impl Iterator<Item = (&LookupName, &LookupName)> {
        self.groups
            .iter()
            .filter_map(|g| g.after.as_ref().map(|pred| (pred, &g.name)))
    }

    /// Verifies that every group comes after its predecessor.
    pub fn check_ordering(&self) -> Result<(), EngineError> {
        for (pred, succ) in self.ordering_edges() {
            match (self.index.get(pred), self.index.get(succ)) {
                (Some(p), Some(s)) if p < s => (),
                (None, _) => {
                    return Err(EngineError::UnknownPredecessor {
                        group: succ.clone(),
                        after: pred.clone(),
                    });
                }
                _ => {
                    return Err(EngineError::OrderingViolation {
                        group: succ.clone(),
                        after: pred.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
