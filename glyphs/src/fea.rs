//! Writes the rule table of a [`FontProject`] in the OpenType feature
//! file syntax understood by font compilers.
//!
//! Lookups which are only ever invoked from contextual rules are
//! written first, so that every lookup is defined before it is
//! referenced; feature-bound lookups follow in registration order,
//! and the feature blocks list them in that same order.
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter, Write};

use super::name::{FeatureTag, LookupName};
use super::project::FontProject;
use super::rules::{ContextItem, ContextualRule, GlyphClass, Rule, RuleGroup};

const INDENT: &str = "    ";

fn label(name: &LookupName) -> String {
    name.as_str().replace('.', "_")
}

pub struct FeatureFile<'a> {
    project: &'a FontProject,
}

impl<'a> FeatureFile<'a> {
    #[must_use]
    pub fn new(project: &'a FontProject) -> FeatureFile<'a> {
        FeatureFile { project }
    }

    fn classes(&self) -> Vec<&'a GlyphClass> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut result: Vec<&GlyphClass> = Vec::new();
        for group in self.project.rules().groups() {
            for bound in &group.rules {
                if let Rule::Contextual(rule) = &bound.rule {
                    let items = rule
                        .lookback
                        .iter()
                        .chain(rule.focus.iter().map(|f| &f.item))
                        .chain(rule.lookahead.iter());
                    for item in items {
                        if let ContextItem::Class(class) = item {
                            if seen.insert(class.name.as_str()) {
                                result.push(class.as_ref());
                            }
                        }
                    }
                }
            }
        }
        result
    }

    fn features(&self) -> Vec<(&'a FeatureTag, Vec<&'a LookupName>)> {
        let mut result: Vec<(&FeatureTag, Vec<&LookupName>)> = Vec::new();
        for group in self.project.rules().groups() {
            if group.rules.is_empty() {
                continue;
            }
            if let Some(tag) = &group.feature {
                match result.iter_mut().find(|(t, _)| *t == tag) {
                    Some((_, lookups)) => lookups.push(&group.name),
                    None => result.push((tag, vec![&group.name])),
                }
            }
        }
        result
    }
}

fn write_item(f: &mut Formatter<'_>, item: &ContextItem) -> fmt::Result {
    match item {
        ContextItem::Glyph(name) => write!(f, "{name}"),
        ContextItem::Class(class) => write!(f, "@{}", class.name),
    }
}

fn write_contextual(f: &mut Formatter<'_>, rule: &ContextualRule) -> fmt::Result {
    f.write_str("sub")?;
    for item in &rule.lookback {
        f.write_char(' ')?;
        write_item(f, item)?;
    }
    for focus in &rule.focus {
        f.write_char(' ')?;
        write_item(f, &focus.item)?;
        f.write_char('\'')?;
        if let Some(group) = &focus.invoke {
            write!(f, " lookup {}", label(group))?;
        }
    }
    for item in &rule.lookahead {
        f.write_char(' ')?;
        write_item(f, item)?;
    }
    f.write_char(';')
}

fn write_group(f: &mut Formatter<'_>, group: &RuleGroup) -> fmt::Result {
    let name = label(&group.name);
    writeln!(f, "lookup {name} {{")?;
    for bound in &group.rules {
        f.write_str(INDENT)?;
        match &bound.rule {
            Rule::Single { input, output } => write!(f, "sub {input} by {output};")?,
            Rule::Merge { inputs, output } => {
                f.write_str("sub")?;
                for input in inputs {
                    write!(f, " {input}")?;
                }
                write!(f, " by {output};")?;
            }
            Rule::Contextual(rule) => write_contextual(f, rule)?,
        }
        match &bound.subtable {
            Some(subtable) => writeln!(f, " # {subtable}")?,
            None => writeln!(f)?,
        }
    }
    writeln!(f, "}} {name};")
}

impl Display for FeatureFile<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.project.names() {
            Some(names) => writeln!(f, "# Substitution rules for {}", names.full_name)?,
            None => writeln!(f, "# Substitution rules")?,
        }
        writeln!(f)?;
        for system in self.project.language_systems() {
            writeln!(f, "languagesystem {} {};", system.script, system.language)?;
        }

        let classes = self.classes();
        if !classes.is_empty() {
            writeln!(f)?;
        }
        for class in classes {
            write!(f, "@{} = [", class.name)?;
            for (i, member) in class.members.iter().enumerate() {
                if i > 0 {
                    f.write_char(' ')?;
                }
                write!(f, "{member}")?;
            }
            writeln!(f, "];")?;
        }

        let (invoked_only, feature_bound): (Vec<&RuleGroup>, Vec<&RuleGroup>) = self
            .project
            .rules()
            .groups()
            .filter(|g| !g.rules.is_empty())
            .partition(|g| g.feature.is_none());
        for group in invoked_only.into_iter().chain(feature_bound) {
            writeln!(f)?;
            write_group(f, group)?;
        }

        for (tag, lookups) in self.features() {
            writeln!(f)?;
            writeln!(f, "feature {tag} {{")?;
            for lookup in lookups {
                writeln!(f, "{INDENT}lookup {};", label(lookup))?;
            }
            writeln!(f, "}} {tag};")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::super::engine::FontEngine;
    use super::super::inventory::GlyphInventory;
    use super::super::name::{
        FeatureTag, GlyphName, LanguageSystem, LookupName, ResourceId, SubtableName,
    };
    use super::super::project::FontProject;
    use super::super::rules::{ContextItem, ContextualRule, FocusItem, GlyphClass, Placement, RuleKind};
    use super::FeatureFile;

    fn project() -> FontProject {
        let mut target = GlyphInventory::new(ResourceId::target());
        for (name, ch) in [("backslash", '\\'), ("a", 'a'), ("b", 'b'), ("c", 'c')] {
            target
                .add_glyph(GlyphName::from(name), Some(ch), &[])
                .expect("test glyphs are distinct");
        }
        FontProject::new(target).with_language_systems(vec![
            LanguageSystem::parse("DFLT dflt").expect("valid language system"),
        ])
    }

    #[test]
    fn test_feature_file_layout() {
        let mut p = project();
        let calt = FeatureTag::calt();
        let ctx = LookupName::from("lookup.ctx.N0");
        let sub = LookupName::from("lookup.N0.0");
        let merge = LookupName::from("lookup.N0.1");
        p.add_rule_group(&ctx, RuleKind::Contextual, Some(&calt), None)
            .expect("new group");
        p.add_rule_group(&sub, RuleKind::Single, None, None)
            .expect("new group");
        p.add_rule_group(&merge, RuleKind::Merge, None, None)
            .expect("new group");
        p.bind_single(&sub, &GlyphName::from("a"), &GlyphName::from("c"))
            .expect("glyphs exist");
        p.bind_merge(
            &merge,
            &GlyphName::from("a"),
            &[GlyphName::from("b"), GlyphName::from("c")],
        )
        .expect("glyphs exist");
        let letters = Rc::new(GlyphClass {
            name: "letters".to_string(),
            members: vec![GlyphName::from("a"), GlyphName::from("b")],
        });
        let rule = ContextualRule {
            lookback: vec![ContextItem::Glyph(GlyphName::from("backslash"))],
            focus: vec![
                FocusItem {
                    item: ContextItem::Glyph(GlyphName::from("a")),
                    invoke: Some(sub.clone()),
                },
                FocusItem {
                    item: ContextItem::Glyph(GlyphName::from("b")),
                    invoke: Some(merge.clone()),
                },
                FocusItem {
                    item: ContextItem::Glyph(GlyphName::from("c")),
                    invoke: None,
                },
            ],
            lookahead: vec![ContextItem::Class(letters)],
        };
        p.bind_contextual(&ctx, &SubtableName::from("lookup.ctx.sub.N0"), rule, Placement::Last)
            .expect("invoked groups exist");
        // An empty group is left out entirely.
        p.add_rule_group(&LookupName::from("empty"), RuleKind::Contextual, Some(&calt), None)
            .expect("new group");

        let expected = concat!(
            "# Substitution rules\n",
            "\n",
            "languagesystem DFLT dflt;\n",
            "\n",
            "@letters = [a b];\n",
            "\n",
            "lookup lookup_N0_0 {\n",
            "    sub a by c;\n",
            "} lookup_N0_0;\n",
            "\n",
            "lookup lookup_N0_1 {\n",
            "    sub b c by a;\n",
            "} lookup_N0_1;\n",
            "\n",
            "lookup lookup_ctx_N0 {\n",
            "    sub backslash a' lookup lookup_N0_0 b' lookup lookup_N0_1 c' @letters; # lookup.ctx.sub.N0\n",
            "} lookup_ctx_N0;\n",
            "\n",
            "feature calt {\n",
            "    lookup lookup_ctx_N0;\n",
            "} calt;\n",
        );
        assert_eq!(FeatureFile::new(&p).to_string(), expected);
    }
}
