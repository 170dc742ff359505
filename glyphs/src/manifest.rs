//! The glyph manifest: everything about the output font which does
//! not go into the feature file.
use serde::Serialize;

use super::metadata::FontNames;
use super::project::FontProject;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonorEntry {
    pub name: String,
    /// A font build scales outlines copied from this donor by the
    /// ratio of the target's units per em to this value.
    pub units_per_em: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlyphEntry {
    pub name: String,
    /// Absent when the glyph was created without an outline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub units_per_em: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<FontNames>,
    pub donors: Vec<DonorEntry>,
    pub glyphs: Vec<GlyphEntry>,
}

impl From<&FontProject> for Manifest {
    fn from(project: &FontProject) -> Manifest {
        Manifest {
            units_per_em: project.target().units_per_em(),
            names: project.names().cloned(),
            donors: project
                .donors()
                .map(|(id, units_per_em)| DonorEntry {
                    name: id.to_string(),
                    units_per_em,
                })
                .collect(),
            glyphs: project
                .created_glyphs()
                .iter()
                .map(|glyph| GlyphEntry {
                    name: glyph.name.to_string(),
                    resource: glyph.outline.as_ref().map(|o| o.resource.to_string()),
                    source: glyph.outline.as_ref().map(|o| o.glyph.to_string()),
                })
                .collect(),
        }
    }
}
