//! `FontProject` is the font engine used by the ligaturizer: it
//! records everything the rule compiler asks for, and writes it out
//! as an OpenType feature file together with a manifest of the glyphs
//! a font build has to copy in.
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{event, Level};

use super::engine::{EngineError, FontEngine, IoAction};
use super::fea::FeatureFile;
use super::inventory::GlyphInventory;
use super::manifest::Manifest;
use super::metadata::FontNames;
use super::name::{FeatureTag, GlyphName, LanguageSystem, LookupName, ResourceId, SubtableName};
use super::rules::{BoundRule, ContextualRule, Placement, Rule, RuleKind, RuleTable};

/// Where the outline of a created glyph comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineSource {
    pub resource: ResourceId,
    pub glyph: GlyphName,
}

/// A glyph which was not part of the target font as loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedGlyph {
    pub name: GlyphName,
    pub outline: Option<OutlineSource>,
}

#[derive(Debug)]
pub struct FontProject {
    target: GlyphInventory,
    donors: BTreeMap<ResourceId, u16>,
    created: Vec<CreatedGlyph>,
    created_index: HashMap<GlyphName, usize>,
    rules: RuleTable,
    names: Option<FontNames>,
    language_systems: Vec<LanguageSystem>,
}

impl FontProject {
    /// Starts a project which extends the font described by `target`.
    #[must_use]
    pub fn new(target: GlyphInventory) -> FontProject {
        FontProject {
            target,
            donors: BTreeMap::new(),
            created: Vec::new(),
            created_index: HashMap::new(),
            rules: RuleTable::new(),
            names: None,
            language_systems: LanguageSystem::defaults(),
        }
    }

    #[must_use]
    pub fn with_language_systems(mut self, systems: Vec<LanguageSystem>) -> FontProject {
        self.language_systems = systems;
        self
    }

    #[must_use]
    pub fn target(&self) -> &GlyphInventory {
        &self.target
    }

    /// The donor fonts, with their units per em.
    pub fn donors(&self) -> impl Iterator<Item = (&ResourceId, u16)> {
        self.donors.iter().map(|(id, upem)| (id, *upem))
    }

    /// The glyphs created so far, in creation order.
    #[must_use]
    pub fn created_glyphs(&self) -> &[CreatedGlyph] {
        &self.created
    }

    #[must_use]
    pub fn created_glyph(&self, name: &GlyphName) -> Option<&CreatedGlyph> {
        self.created_index.get(name).map(|pos| &self.created[*pos])
    }

    #[must_use]
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    #[must_use]
    pub fn names(&self) -> Option<&FontNames> {
        self.names.as_ref()
    }

    #[must_use]
    pub fn language_systems(&self) -> &[LanguageSystem] {
        &self.language_systems
    }

    /// Verifies that every rule group is registered after the group
    /// it must apply after.
    pub fn check_ordering(&self) -> Result<(), EngineError> {
        self.rules.check_ordering()
    }

    /// The path of the manifest written alongside the feature file
    /// `path`.
    #[must_use]
    pub fn manifest_path(path: &Path) -> PathBuf {
        path.with_extension("glyphs.toml")
    }

    fn write_file(path: &Path, contents: &str) -> Result<(), EngineError> {
        fs::write(path, contents).map_err(|error| EngineError::Io {
            action: IoAction::Write,
            path: path.to_path_buf(),
            error,
        })
    }
}

impl FontEngine for FontProject {
    fn glyph_for_char(&self, ch: char) -> Option<GlyphName> {
        self.target.find_by_char(ch).map(|g| g.name.clone())
    }

    fn declare_donor(&mut self, donor: &GlyphInventory) {
        self.donors.insert(donor.id().clone(), donor.units_per_em());
    }

    fn has_glyph(&self, name: &GlyphName) -> bool {
        self.target.find_by_name(name).is_some() || self.created_index.contains_key(name)
    }

    fn create_glyph(&mut self, name: &GlyphName) -> Result<GlyphName, EngineError> {
        if self.has_glyph(name) {
            return Err(EngineError::DuplicateGlyph(name.clone()));
        }
        self.created_index.insert(name.clone(), self.created.len());
        self.created.push(CreatedGlyph {
            name: name.clone(),
            outline: None,
        });
        Ok(name.clone())
    }

    fn copy_outline(
        &mut self,
        dst: &GlyphName,
        src_resource: &ResourceId,
        src_name: &GlyphName,
    ) -> Result<(), EngineError> {
        if src_resource.is_target() {
            if !self.has_glyph(src_name) {
                return Err(EngineError::MissingSourceGlyph {
                    resource: src_resource.clone(),
                    glyph: src_name.clone(),
                });
            }
        } else if !self.donors.contains_key(src_resource) {
            return Err(EngineError::UnknownResource(src_resource.clone()));
        }
        match self.created_index.get(dst) {
            Some(pos) => {
                event!(
                    Level::TRACE,
                    "glyph {dst} takes its outline from {src_name} of {src_resource}"
                );
                self.created[*pos].outline = Some(OutlineSource {
                    resource: src_resource.clone(),
                    glyph: src_name.clone(),
                });
                Ok(())
            }
            None => Err(EngineError::UnknownGlyph(dst.clone())),
        }
    }

    fn add_rule_group(
        &mut self,
        name: &LookupName,
        kind: RuleKind,
        feature: Option<&FeatureTag>,
        after: Option<&LookupName>,
    ) -> Result<(), EngineError> {
        self.rules.add_group(name, kind, feature, after)
    }

    fn bind_single(
        &mut self,
        group: &LookupName,
        input: &GlyphName,
        output: &GlyphName,
    ) -> Result<(), EngineError> {
        for glyph in [input, output] {
            if !self.has_glyph(glyph) {
                return Err(EngineError::UnknownGlyph(glyph.clone()));
            }
        }
        self.rules.bind(
            group,
            BoundRule {
                subtable: None,
                rule: Rule::Single {
                    input: input.clone(),
                    output: output.clone(),
                },
            },
            Placement::Last,
        )
    }

    fn bind_merge(
        &mut self,
        group: &LookupName,
        output: &GlyphName,
        inputs: &[GlyphName],
    ) -> Result<(), EngineError> {
        if inputs.is_empty() {
            return Err(EngineError::EmptyRule(RuleKind::Merge));
        }
        if let Some(missing) = inputs
            .iter()
            .chain(std::iter::once(output))
            .find(|g| !self.has_glyph(g))
        {
            return Err(EngineError::UnknownGlyph(missing.clone()));
        }
        self.rules.bind(
            group,
            BoundRule {
                subtable: None,
                rule: Rule::Merge {
                    inputs: inputs.to_vec(),
                    output: output.clone(),
                },
            },
            Placement::Last,
        )
    }

    fn bind_contextual(
        &mut self,
        group: &LookupName,
        subtable: &SubtableName,
        rule: ContextualRule,
        placement: Placement,
    ) -> Result<(), EngineError> {
        if rule.focus.is_empty() {
            return Err(EngineError::EmptyRule(RuleKind::Contextual));
        }
        self.rules.bind(
            group,
            BoundRule {
                subtable: Some(subtable.clone()),
                rule: Rule::Contextual(rule),
            },
            placement,
        )
    }

    fn set_names(&mut self, names: FontNames) {
        self.names = Some(names);
    }

    fn serialize(&self, path: &Path) -> Result<(), EngineError> {
        self.check_ordering()?;
        let features = FeatureFile::new(self).to_string();
        let manifest = toml::to_string_pretty(&Manifest::from(self))?;
        let manifest_path = FontProject::manifest_path(path);
        FontProject::write_file(path, &features)?;
        FontProject::write_file(&manifest_path, &manifest)?;
        event!(
            Level::INFO,
            "wrote {} rule groups to {} and {} glyphs to {}",
            self.rules.len(),
            path.display(),
            self.created.len(),
            manifest_path.display()
        );
        Ok(())
    }
}
