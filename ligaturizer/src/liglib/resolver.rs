//! The donor resolver turns symbol specifications into glyphs of the
//! target font, importing glyphs from donor fonts on first use.
use std::collections::HashMap;

use tracing::{event, Level};

use glyphs::prelude::{sanitize_glyph_name, FontEngine, GlyphInventory, GlyphName, ResourceId};

use super::symbol::{parse_sequence, SymbolFormat, SymbolSpec};
use super::types::LigatureFailure;

/// The resources to search for a symbol, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    resources: Vec<ResourceId>,
    target_first: bool,
}

impl Candidates {
    /// Search only the target font.
    #[must_use]
    pub fn target_only() -> Candidates {
        Candidates {
            resources: Vec::new(),
            target_first: true,
        }
    }

    /// Search the target font, then `resources` in order.
    #[must_use]
    pub fn new(resources: Vec<ResourceId>) -> Candidates {
        Candidates {
            resources,
            target_first: true,
        }
    }

    /// Search exactly `resources`, in order.  The target is only
    /// searched if it is listed.
    #[must_use]
    pub fn listed_only(resources: Vec<ResourceId>) -> Candidates {
        Candidates {
            resources,
            target_first: false,
        }
    }

    /// The resources in the order they are searched.
    #[must_use]
    pub fn search_order(&self) -> Vec<ResourceId> {
        let mut order: Vec<ResourceId> = Vec::with_capacity(self.resources.len() + 1);
        if self.target_first {
            order.push(ResourceId::target());
        }
        for id in &self.resources {
            if !order.contains(id) {
                order.push(id.clone());
            }
        }
        order
    }
}

/// The glyphs already imported from one donor font.
#[derive(Debug, Default)]
struct ResourceTable {
    by_char: HashMap<char, GlyphName>,
    by_name: HashMap<GlyphName, GlyphName>,
}

impl ResourceTable {
    fn get(&self, symbol: &SymbolSpec) -> Option<&GlyphName> {
        match symbol {
            SymbolSpec::Literal(ch) => self.by_char.get(ch),
            SymbolSpec::Named { name, .. } => self.by_name.get(name),
        }
    }
}

/// Resolves symbols against the target font and a set of donor
/// fonts.  Glyphs imported from a donor are cached, so that each
/// donor glyph is imported at most once.
#[derive(Debug)]
pub struct DonorResolver {
    donors: Vec<GlyphInventory>,
    tables: HashMap<ResourceId, ResourceTable>,
    imports: usize,
}

impl DonorResolver {
    #[must_use]
    pub fn new(donors: Vec<GlyphInventory>) -> DonorResolver {
        DonorResolver {
            donors,
            tables: HashMap::new(),
            imports: 0,
        }
    }

    #[must_use]
    pub fn donor(&self, id: &ResourceId) -> Option<&GlyphInventory> {
        self.donors.iter().find(|d| d.id() == id)
    }

    /// Returns true if `id` names the target or a known donor.
    #[must_use]
    pub fn is_known(&self, id: &ResourceId) -> bool {
        id.is_target() || self.donor(id).is_some()
    }

    /// The number of glyphs imported so far.
    #[must_use]
    pub fn import_count(&self) -> usize {
        self.imports
    }

    /// Resolves one symbol.  A named symbol carrying a resource
    /// override is only looked for in that resource.
    pub fn resolve<E: FontEngine>(
        &mut self,
        engine: &mut E,
        symbol: &SymbolSpec,
        candidates: &Candidates,
    ) -> Result<GlyphName, LigatureFailure> {
        let order: Vec<ResourceId> = match symbol {
            SymbolSpec::Named {
                resource: Some(resource),
                ..
            } => {
                if !self.is_known(resource) {
                    return Err(LigatureFailure::UnknownResource(resource.clone()));
                }
                vec![resource.clone()]
            }
            _ => candidates.search_order(),
        };

        for resource in &order {
            if resource.is_target() {
                if let Some(found) = Self::find_in_target(engine, symbol) {
                    return Ok(found);
                }
                continue;
            }
            if let Some(cached) = self.tables.get(resource).and_then(|t| t.get(symbol)) {
                return Ok(cached.clone());
            }
            if let Some(found) = self.import_from(engine, resource, symbol)? {
                return Ok(found);
            }
        }
        Err(LigatureFailure::GlyphNotFound {
            symbol: symbol.to_string(),
            resources: order,
        })
    }

    /// Resolves each symbol of `text`, read according to `format`.
    pub fn resolve_sequence<E: FontEngine>(
        &mut self,
        engine: &mut E,
        text: &str,
        format: SymbolFormat,
        candidates: &Candidates,
    ) -> Result<Vec<GlyphName>, LigatureFailure> {
        parse_sequence(text, format)?
            .iter()
            .map(|symbol| self.resolve(engine, symbol, candidates))
            .collect()
    }

    fn find_in_target<E: FontEngine>(engine: &E, symbol: &SymbolSpec) -> Option<GlyphName> {
        match symbol {
            SymbolSpec::Literal(ch) => engine.glyph_for_char(*ch),
            SymbolSpec::Named { name, .. } => engine.has_glyph(name).then(|| name.clone()),
        }
    }

    /// Imports the glyph for `symbol` from the donor `resource`, if
    /// the donor has one.
    fn import_from<E: FontEngine>(
        &mut self,
        engine: &mut E,
        resource: &ResourceId,
        symbol: &SymbolSpec,
    ) -> Result<Option<GlyphName>, LigatureFailure> {
        let Some(donor) = self.donors.iter().find(|d| d.id() == resource) else {
            return Err(LigatureFailure::UnknownResource(resource.clone()));
        };
        let record = match symbol {
            SymbolSpec::Literal(ch) => donor.find_by_char(*ch),
            SymbolSpec::Named { name, .. } => donor.find_by_name(name),
        };
        let Some(record) = record else {
            return Ok(None);
        };
        let source = record.name.clone();
        let unicode = record.unicode;
        let table = self.tables.entry(resource.clone()).or_default();

        // The glyph may already have been imported under another
        // codepoint or by name.
        let imported = match table.by_name.get(&source) {
            Some(existing) => existing.clone(),
            None => {
                let name = Self::fresh_name(engine, resource, &source);
                engine.create_glyph(&name)?;
                engine.copy_outline(&name, resource, &source)?;
                self.imports += 1;
                event!(Level::DEBUG, "imported {source} from {resource} as {name}");
                table.by_name.insert(source, name.clone());
                name
            }
        };
        if let Some(ch) = unicode {
            table.by_char.entry(ch).or_insert_with(|| imported.clone());
        }
        if let SymbolSpec::Literal(ch) = symbol {
            table.by_char.entry(*ch).or_insert_with(|| imported.clone());
        }
        Ok(Some(imported))
    }

    fn fresh_name<E: FontEngine>(engine: &E, resource: &ResourceId, source: &GlyphName) -> GlyphName {
        let base = format!(
            "{}.{}",
            sanitize_glyph_name(resource.as_str()),
            sanitize_glyph_name(source.as_str())
        );
        let mut name = GlyphName::from(base.as_str());
        let mut n: usize = 1;
        while engine.has_glyph(&name) {
            name = GlyphName::from(format!("{base}.{n}"));
            n += 1;
        }
        name
    }
}

#[cfg(test)]
mod tests;
