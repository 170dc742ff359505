use glyphs::prelude::{FontEngine, FontProject, GlyphInventory, GlyphName, ResourceId};

use super::super::symbol::{SymbolFormat, SymbolSpec};
use super::super::types::LigatureFailure;
use super::{Candidates, DonorResolver};

fn inventory(id: &str, glyphs: &[(&str, Option<char>)]) -> GlyphInventory {
    let id = if id == "Default" {
        ResourceId::target()
    } else {
        ResourceId::from(id)
    };
    let mut inv = GlyphInventory::new(id);
    for (name, unicode) in glyphs {
        inv.add_glyph(GlyphName::from(*name), *unicode, &[])
            .expect("test glyph names are distinct");
    }
    inv
}

fn setup() -> (FontProject, DonorResolver) {
    let target = inventory("Default", &[("backslash", Some('\\')), ("a", Some('a'))]);
    let r1 = inventory("R1", &[("alpha", Some('\u{3b1}'))]);
    let mut r2 = inventory("R2", &[("beta", Some('\u{3b2}')), ("a", Some('a'))]);
    r2.add_glyph(GlyphName::from("ohm"), Some('\u{3a9}'), &['\u{2126}'])
        .expect("new glyph");
    let mut project = FontProject::new(target);
    project.declare_donor(&r1);
    project.declare_donor(&r2);
    (project, DonorResolver::new(vec![r1, r2]))
}

fn r(name: &str) -> ResourceId {
    ResourceId::from(name)
}

#[test]
fn test_resolving_twice_imports_once() {
    let (mut project, mut resolver) = setup();
    let candidates = Candidates::new(vec![r("R1")]);
    let first = resolver
        .resolve(&mut project, &SymbolSpec::Literal('\u{3b1}'), &candidates)
        .expect("R1 has alpha");
    let second = resolver
        .resolve(&mut project, &SymbolSpec::Literal('\u{3b1}'), &candidates)
        .expect("R1 has alpha");
    assert_eq!(first, second);
    assert_eq!(first, GlyphName::from("R1.alpha"));
    assert_eq!(resolver.import_count(), 1);
    assert_eq!(project.created_glyphs().len(), 1);
}

#[test]
fn test_fallback_order_and_cache_hit() {
    let (mut project, mut resolver) = setup();
    let beta = SymbolSpec::Literal('\u{3b2}');
    let imported = resolver
        .resolve(&mut project, &beta, &Candidates::new(vec![r("R1"), r("R2")]))
        .expect("R2 has beta");
    assert_eq!(imported, GlyphName::from("R2.beta"));
    let again = resolver
        .resolve(&mut project, &beta, &Candidates::new(vec![r("R2"), r("R1")]))
        .expect("beta is cached");
    assert_eq!(again, imported);
    assert_eq!(resolver.import_count(), 1);
}

#[test]
fn test_target_is_implicitly_first() {
    let (mut project, mut resolver) = setup();
    let found = resolver
        .resolve(&mut project, &SymbolSpec::Literal('a'), &Candidates::new(vec![r("R2")]))
        .expect("the target has a");
    assert_eq!(found, GlyphName::from("a"));
    assert_eq!(resolver.import_count(), 0);
}

#[test]
fn test_listed_only_skips_the_target() {
    let (mut project, mut resolver) = setup();
    let found = resolver
        .resolve(
            &mut project,
            &SymbolSpec::Literal('a'),
            &Candidates::listed_only(vec![r("R2")]),
        )
        .expect("R2 has a");
    assert_eq!(found, GlyphName::from("R2.a"));
    assert_eq!(resolver.import_count(), 1);
}

#[test]
fn test_alternate_codepoints_are_found_and_cached() {
    let (mut project, mut resolver) = setup();
    let candidates = Candidates::new(vec![r("R2")]);
    let via_alternate = resolver
        .resolve(&mut project, &SymbolSpec::Literal('\u{2126}'), &candidates)
        .expect("R2 maps U+2126 to ohm");
    let via_primary = resolver
        .resolve(&mut project, &SymbolSpec::Literal('\u{3a9}'), &candidates)
        .expect("R2 maps U+03A9 to ohm");
    let by_name = resolver
        .resolve(
            &mut project,
            &SymbolSpec::Named {
                name: GlyphName::from("ohm"),
                resource: Some(r("R2")),
            },
            &Candidates::target_only(),
        )
        .expect("R2 has a glyph called ohm");
    assert_eq!(via_alternate, via_primary);
    assert_eq!(via_alternate, by_name);
    assert_eq!(resolver.import_count(), 1);
}

#[test]
fn test_resource_override_limits_the_search() {
    let (mut project, mut resolver) = setup();
    let spec = SymbolSpec::Named {
        name: GlyphName::from("alpha"),
        resource: Some(r("R2")),
    };
    match resolver.resolve(&mut project, &spec, &Candidates::new(vec![r("R1")])) {
        Err(LigatureFailure::GlyphNotFound { resources, .. }) => {
            assert_eq!(resources, vec![r("R2")]);
        }
        other => panic!("expected GlyphNotFound, got {other:?}"),
    }
    let spec = SymbolSpec::Named {
        name: GlyphName::from("alpha"),
        resource: Some(r("Nowhere")),
    };
    assert!(matches!(
        resolver.resolve(&mut project, &spec, &Candidates::target_only()),
        Err(LigatureFailure::UnknownResource(id)) if id == r("Nowhere")
    ));
}

#[test]
fn test_not_found_lists_every_resource_searched() {
    let (mut project, mut resolver) = setup();
    match resolver.resolve(
        &mut project,
        &SymbolSpec::Literal('\u{2115}'),
        &Candidates::new(vec![r("R1"), r("R2")]),
    ) {
        Err(LigatureFailure::GlyphNotFound { symbol, resources }) => {
            assert_eq!(symbol, "'\u{2115}' (U+2115)");
            assert_eq!(resources, vec![ResourceId::target(), r("R1"), r("R2")]);
        }
        other => panic!("expected GlyphNotFound, got {other:?}"),
    }
    assert!(project.created_glyphs().is_empty());
}

#[test]
fn test_synthetic_names_avoid_collisions() {
    let (mut project, mut resolver) = setup();
    project
        .create_glyph(&GlyphName::from("R1.alpha"))
        .expect("name is free");
    let imported = resolver
        .resolve(
            &mut project,
            &SymbolSpec::Literal('\u{3b1}'),
            &Candidates::listed_only(vec![r("R1")]),
        )
        .expect("R1 has alpha");
    assert_eq!(imported, GlyphName::from("R1.alpha.1"));
}

#[test]
fn test_resolve_sequence() {
    let (mut project, mut resolver) = setup();
    let glyphs = resolver
        .resolve_sequence(
            &mut project,
            "backslash@Default beta@R2 alpha",
            SymbolFormat::Advanced,
            &Candidates::new(vec![r("R1")]),
        )
        .expect("all symbols exist");
    assert_eq!(
        glyphs,
        vec![
            GlyphName::from("backslash"),
            GlyphName::from("R2.beta"),
            GlyphName::from("R1.alpha"),
        ]
    );
    let literal = resolver
        .resolve_sequence(
            &mut project,
            "\u{3b1}a",
            SymbolFormat::Literal,
            &Candidates::new(vec![r("R1")]),
        )
        .expect("all symbols exist");
    assert_eq!(literal, vec![GlyphName::from("R1.alpha"), GlyphName::from("a")]);
    assert_eq!(resolver.import_count(), 2);
}
