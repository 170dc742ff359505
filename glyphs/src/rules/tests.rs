use std::rc::Rc;

use super::super::engine::EngineError;
use super::super::name::{FeatureTag, GlyphName, LookupName, SubtableName};
use super::{
    BoundRule, ContextItem, ContextualRule, FocusItem, GlyphClass, Placement, Rule, RuleKind,
    RuleTable,
};

fn glyph(name: &str) -> GlyphName {
    GlyphName::from(name)
}

fn lookup(name: &str) -> LookupName {
    LookupName::from(name)
}

fn single(input: &str, output: &str) -> BoundRule {
    BoundRule {
        subtable: None,
        rule: Rule::Single {
            input: glyph(input),
            output: glyph(output),
        },
    }
}

fn contextual(subtable: &str, rule: ContextualRule) -> BoundRule {
    BoundRule {
        subtable: Some(SubtableName::from(subtable)),
        rule: Rule::Contextual(rule),
    }
}

#[test]
fn test_unknown_predecessor_is_rejected() {
    let mut table = RuleTable::new();
    match table.add_group(
        &lookup("macro"),
        RuleKind::Contextual,
        Some(&FeatureTag::calt()),
        Some(&lookup("classifier")),
    ) {
        Err(EngineError::UnknownPredecessor { group, after }) => {
            assert_eq!(group.as_str(), "macro");
            assert_eq!(after.as_str(), "classifier");
        }
        other => panic!("expected an unknown predecessor error, got {other:?}"),
    }
    assert!(table.is_empty());
}

#[test]
fn test_duplicate_group_is_rejected() {
    let mut table = RuleTable::new();
    table
        .add_group(&lookup("g"), RuleKind::Single, None, None)
        .expect("first registration should succeed");
    assert!(matches!(
        table.add_group(&lookup("g"), RuleKind::Merge, None, None),
        Err(EngineError::DuplicateGroup(_))
    ));
}

#[test]
fn test_kind_mismatch() {
    let mut table = RuleTable::new();
    table
        .add_group(&lookup("merge"), RuleKind::Merge, None, None)
        .expect("registration should succeed");
    match table.bind(&lookup("merge"), single("a", "b"), Placement::Last) {
        Err(EngineError::KindMismatch { holds, offered, .. }) => {
            assert_eq!(holds, RuleKind::Merge);
            assert_eq!(offered, RuleKind::Single);
        }
        other => panic!("expected a kind mismatch, got {other:?}"),
    }
}

#[test]
fn test_contextual_rule_must_invoke_known_groups() {
    let mut table = RuleTable::new();
    table
        .add_group(&lookup("ctx"), RuleKind::Contextual, None, None)
        .expect("registration should succeed");
    let rule = ContextualRule {
        lookback: vec![],
        focus: vec![FocusItem {
            item: ContextItem::Glyph(glyph("a")),
            invoke: Some(lookup("nowhere")),
        }],
        lookahead: vec![],
    };
    assert!(matches!(
        table.bind(&lookup("ctx"), contextual("ctx.sub", rule), Placement::Last),
        Err(EngineError::UnknownGroup(name)) if name.as_str() == "nowhere"
    ));
}

#[test]
fn test_placement_first_puts_newest_rule_first() {
    let mut table = RuleTable::new();
    table
        .add_group(&lookup("g"), RuleKind::Single, None, None)
        .expect("registration should succeed");
    for (input, placement) in [("a", Placement::Last), ("b", Placement::First), ("c", Placement::Last)] {
        table
            .bind(&lookup("g"), single(input, "x"), placement)
            .expect("bind should succeed");
    }
    let inputs: Vec<String> = table
        .group(&lookup("g"))
        .expect("group exists")
        .rules
        .iter()
        .map(|bound| match &bound.rule {
            Rule::Single { input, .. } => input.to_string(),
            other => panic!("unexpected rule {other:?}"),
        })
        .collect();
    assert_eq!(inputs, vec!["b", "a", "c"]);
    assert_eq!(table.count_rules(RuleKind::Single), 3);
    assert_eq!(table.count_rules(RuleKind::Merge), 0);
}

#[test]
fn test_ordering_edges_and_check() {
    let mut table = RuleTable::new();
    table
        .add_group(&lookup("classifier"), RuleKind::Contextual, Some(&FeatureTag::calt()), None)
        .expect("registration should succeed");
    table
        .add_group(&lookup("m1"), RuleKind::Contextual, Some(&FeatureTag::calt()), Some(&lookup("classifier")))
        .expect("registration should succeed");
    table
        .add_group(&lookup("m2"), RuleKind::Contextual, Some(&FeatureTag::calt()), Some(&lookup("classifier")))
        .expect("registration should succeed");
    let edges: Vec<(String, String)> = table
        .ordering_edges()
        .map(|(p, s)| (p.to_string(), s.to_string()))
        .collect();
    assert_eq!(
        edges,
        vec![
            ("classifier".to_string(), "m1".to_string()),
            ("classifier".to_string(), "m2".to_string()),
        ]
    );
    table.check_ordering().expect("registration order is always consistent");
}

#[test]
fn test_contextual_rule_display() {
    let letters = Rc::new(GlyphClass {
        name: "letters".to_string(),
        members: vec![glyph("a"), glyph("b")],
    });
    let rule = ContextualRule {
        lookback: vec![ContextItem::Glyph(glyph("x"))],
        focus: vec![
            FocusItem {
                item: ContextItem::Glyph(glyph("backslash")),
                invoke: Some(lookup("L0")),
            },
            FocusItem {
                item: ContextItem::Glyph(glyph("b")),
                invoke: None,
            },
        ],
        lookahead: vec![
            ContextItem::Class(Rc::clone(&letters)),
            ContextItem::Class(letters),
        ],
    };
    assert_eq!(
        rule.to_string(),
        "x | backslash @<L0> b | @letters @letters"
    );
    let invoked: Vec<&str> = rule.invoked().map(LookupName::as_str).collect();
    assert_eq!(invoked, vec!["L0"]);
}

#[test]
fn test_rule_display() {
    assert_eq!(single("a", "alpha").rule.to_string(), "a -> alpha");
    let merge = Rule::Merge {
        inputs: vec![glyph("b"), glyph("c")],
        output: glyph("y"),
    };
    assert_eq!(merge.to_string(), "b c -> y");
}
