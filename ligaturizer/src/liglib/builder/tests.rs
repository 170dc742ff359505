use glyphs::prelude::{
    ContextItem, FontEngine, FontProject, GlyphInventory, GlyphName, LookupName, ResourceId, Rule,
    RuleKind,
};

use super::super::compiler::{CompilerOptions, LigatureCompiler, SymbolSequence};
use super::super::length::{classifier_name, marker_name};
use super::super::resolver::Candidates;
use super::super::types::LigatureFailure;
use super::Decorations;

fn target() -> GlyphInventory {
    let mut target = GlyphInventory::new(ResourceId::target());
    let named = [
        ("backslash", '\\'),
        ("space", ' '),
        ("nbspace", '\u{a0}'),
        ("braceleft", '{'),
        ("braceright", '}'),
        ("asciicircum", '^'),
        ("two", '2'),
    ];
    for (name, ch) in named {
        target
            .add_glyph(GlyphName::from(name), Some(ch), &[])
            .expect("test glyphs are distinct");
    }
    for ch in ('a'..='z').chain('A'..='Z') {
        target
            .add_glyph(GlyphName::from(ch.to_string().as_str()), Some(ch), &[])
            .expect("test glyphs are distinct");
    }
    target
}

fn donor() -> GlyphInventory {
    let mut donor = GlyphInventory::new(ResourceId::from("D"));
    let named = [
        ("alpha", '\u{3b1}'),
        ("beta", '\u{3b2}'),
        ("uni2115", '\u{2115}'),
        ("twosuperior", '\u{b2}'),
        ("summation", '\u{2211}'),
    ];
    for (name, ch) in named {
        donor
            .add_glyph(GlyphName::from(name), Some(ch), &[])
            .expect("test glyphs are distinct");
    }
    donor
}

fn compiler() -> LigatureCompiler<FontProject> {
    LigatureCompiler::new(
        FontProject::new(target()),
        vec![donor()],
        CompilerOptions::default(),
    )
    .expect("the target has a backslash")
}

fn from_donor(text: &str) -> SymbolSequence {
    SymbolSequence::literal(text, Candidates::new(vec![ResourceId::from("D")]))
}

fn glyphs(names: &[&str]) -> Vec<GlyphName> {
    names.iter().map(|s| GlyphName::from(*s)).collect()
}

fn focus_glyphs(p: &FontProject, group: &LookupName) -> Vec<GlyphName> {
    let group = p.rules().group(group).expect("group exists");
    match &group.rules[0].rule {
        Rule::Contextual(rule) => rule
            .focus
            .iter()
            .map(|f| match &f.item {
                ContextItem::Glyph(g) => g.clone(),
                ContextItem::Class(c) => panic!("unexpected class {}", c.name),
            })
            .collect(),
        other => panic!("expected a contextual rule, got {other}"),
    }
}

fn single_rules(p: &FontProject) -> Vec<(GlyphName, GlyphName)> {
    p.rules()
        .groups()
        .filter(|g| g.name.as_str().starts_with("lookup.N"))
        .flat_map(|g| g.rules.iter())
        .filter_map(|bound| match &bound.rule {
            Rule::Single { input, output } => Some((input.clone(), output.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_plain_macro() {
    let mut c = compiler();
    let group = c
        .add_macro("ab", &from_donor("\u{3b1}\u{3b2}"), &Decorations::default())
        .expect("macro should compile");
    let p = c.engine();

    assert!(p.has_glyph(&marker_name(2)));
    assert!(p.has_glyph(&marker_name(3)));
    assert!(!p.has_glyph(&marker_name(4)));

    assert_eq!(focus_glyphs(p, &group), glyphs(&["macro.2.liga", "a", "b"]));
    assert_eq!(
        single_rules(p),
        vec![
            (marker_name(2), GlyphName::from("backslash")),
            (GlyphName::from("a"), GlyphName::from("D.alpha")),
        ]
    );
    let merge = p
        .rules()
        .group(&LookupName::from("lookup.N0.2"))
        .expect("merge group exists");
    assert_eq!(
        merge.rules[0].rule,
        Rule::Merge {
            inputs: glyphs(&["b"]),
            output: GlyphName::from("D.beta"),
        }
    );
    let context = p.rules().group(&group).expect("context group exists");
    assert_eq!(context.after, Some(classifier_name()));
    p.check_ordering().expect("ordering holds");
}

#[test]
fn test_macro_with_argument() {
    let mut c = compiler();
    let groups = c
        .add_macro_font("bb", &[('N', from_donor("\u{2115}"))], &Decorations::default())
        .expect("macro should compile");
    assert_eq!(groups.len(), 3);
    let p = c.engine();
    let forms: Vec<Vec<GlyphName>> = groups.iter().map(|g| focus_glyphs(p, g)).collect();
    assert_eq!(
        forms,
        vec![
            glyphs(&["macro.2.liga", "b", "b", "space", "N"]),
            glyphs(&["macro.2.liga", "b", "b", "nbspace", "N"]),
            glyphs(&["macro.2.liga", "b", "b", "braceleft", "N", "braceright"]),
        ]
    );
    for group in &groups {
        let merge_name = LookupName::from(group.as_str().replace("ctx.", "") + ".1");
        let merge = p.rules().group(&merge_name).expect("merge group exists");
        match &merge.rules[0].rule {
            Rule::Merge { output, .. } => assert_eq!(output, &GlyphName::from("D.uni2115")),
            other => panic!("expected a merge rule, got {other}"),
        }
    }
    // The replacement is imported once, however many forms use it.
    assert_eq!(c.resolver().import_count(), 1);
}

#[test]
fn test_empty_prefix_and_suffix() {
    let mut c = compiler();
    let decorations = Decorations {
        prefix: Some(SymbolSequence::literal("", Candidates::target_only())),
        suffix: Some(SymbolSequence::advanced(
            "backslash@Default",
            Candidates::target_only(),
        )),
    };
    let group = c
        .add_macro("sum", &SymbolSequence::advanced("summation@D", Candidates::target_only()), &decorations)
        .expect("macro should compile");
    let p = c.engine();
    assert_eq!(
        single_rules(p),
        vec![(marker_name(3), GlyphName::from("D.summation"))]
    );
    assert_eq!(focus_glyphs(p, &group).len(), 4);
}

#[test]
fn test_too_long_replacement_registers_no_rules() {
    let mut c = compiler();
    match c.add_macro("a", &from_donor("\u{3b1}\u{3b2}"), &Decorations::default()) {
        Err(LigatureFailure::Entry { entry, error }) => {
            assert_eq!(entry, "\\a");
            assert!(matches!(
                *error,
                LigatureFailure::InvalidArity {
                    inputs: 2,
                    outputs: 3
                }
            ));
        }
        other => panic!("expected InvalidArity, got {other:?}"),
    }
    assert!(c.engine().rules().is_empty());
    assert_eq!(c.chain_count(), 0);
    assert_eq!(c.lengths().covered(), 0);
}

#[test]
fn test_empty_replacement_is_rejected() {
    let mut c = compiler();
    let empty_literal = c
        .add_macro("sum", &from_donor(""), &Decorations::default())
        .expect_err("an empty replacement would leave only the backslash");
    assert_eq!(empty_literal.to_string(), "\\sum: the replacement names no symbols");
    let empty_advanced = c
        .add_macro(
            "sum",
            &SymbolSequence::advanced("", Candidates::target_only()),
            &Decorations::default(),
        )
        .expect_err("an empty advanced replacement has an empty token");
    assert!(matches!(empty_advanced.root_cause(), LigatureFailure::EmptyToken { .. }));
    let empty_argument = c
        .add_macro_font("mathbb", &[('N', from_donor(""))], &Decorations::default())
        .expect_err("an empty replacement would leave only the backslash");
    assert!(matches!(empty_argument.root_cause(), LigatureFailure::EmptyReplacement));
    assert!(c.engine().rules().is_empty());
    assert_eq!(c.chain_count(), 0);
}

#[test]
fn test_empty_advanced_prefix_drops_the_backslash() {
    let mut c = compiler();
    let decorations = Decorations {
        prefix: Some(SymbolSequence::advanced("", Candidates::target_only())),
        suffix: None,
    };
    c.add_macro("ab", &from_donor("\u{3b1}"), &decorations)
        .expect("macro should compile");
    let merge = c
        .engine()
        .rules()
        .group(&LookupName::from("lookup.N0.0"))
        .expect("merge group exists");
    assert_eq!(
        merge.rules[0].rule,
        Rule::Merge {
            inputs: glyphs(&["macro.2.liga", "a", "b"]),
            output: GlyphName::from("D.alpha"),
        }
    );
}

#[test]
fn test_missing_glyph_names_the_entry() {
    let mut c = compiler();
    let failure = c
        .add_macro_font("mathbb", &[('Q', from_donor("\u{211a}"))], &Decorations::default())
        .expect_err("nobody has U+211A");
    assert_eq!(
        failure.to_string(),
        "\\mathbb{Q}: '\u{211a}' (U+211A) was not found in any of these fonts: Default, D"
    );
}

#[test]
fn test_macro_names_must_be_letters() {
    let mut c = compiler();
    for name in ["", "log2", "a b"] {
        let failure = c
            .add_macro(name, &from_donor("\u{3b1}"), &Decorations::default())
            .expect_err("invalid macro name");
        assert!(matches!(failure.root_cause(), LigatureFailure::BadEntry { .. }));
    }
}

#[test]
fn test_lengths_grow_with_longer_macros() {
    let mut c = compiler();
    c.add_macro("beta", &from_donor("\u{3b2}"), &Decorations::default())
        .expect("macro should compile");
    c.add_macro("ab", &from_donor("\u{3b1}"), &Decorations::default())
        .expect("macro should compile");
    assert_eq!(c.lengths().covered(), 5);
    c.add_macro("alphabet", &from_donor("\u{3b1}"), &Decorations::default())
        .expect("macro should compile");
    assert_eq!(c.lengths().covered(), 9);
    let classifier = c
        .engine()
        .rules()
        .group(&classifier_name())
        .expect("classifier exists");
    assert_eq!(classifier.rules.len(), 9);
}

#[test]
fn test_ligature_has_no_marker_and_no_predecessor() {
    let mut c = compiler();
    let group = c
        .add_ligature("^2", &from_donor("\u{b2}"), &Decorations::default())
        .expect("ligature should compile");
    let p = c.engine();
    assert!(!p.rules().contains(&classifier_name()));
    assert_eq!(focus_glyphs(p, &group), glyphs(&["asciicircum", "two"]));
    let context = p.rules().group(&group).expect("context group exists");
    assert_eq!(context.after, None);
    assert_eq!(p.rules().count_rules(RuleKind::Merge), 1);
    assert_eq!(p.rules().count_rules(RuleKind::Single), 0);
}

#[test]
fn test_target_without_introducer() {
    let result = LigatureCompiler::new(
        FontProject::new(GlyphInventory::new(ResourceId::target())),
        Vec::new(),
        CompilerOptions::default(),
    );
    assert!(matches!(result, Err(LigatureFailure::GlyphNotFound { .. })));
}
