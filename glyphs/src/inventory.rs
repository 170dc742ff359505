//! The glyph inventory of a font: which glyphs it has, what they are
//! called and which characters they render.
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use tracing::{event, Level};

use super::engine::{EngineError, IoAction};
use super::name::{GlyphName, ResourceId};

/// One glyph of a font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRecord {
    pub name: GlyphName,
    /// The codepoint this glyph is primarily used for.
    pub unicode: Option<char>,
    /// Further codepoints which also map to this glyph.
    pub alternates: Vec<char>,
}

/// The glyphs of one font resource, indexed by name and by
/// codepoint.
#[derive(Debug, Clone)]
pub struct GlyphInventory {
    id: ResourceId,
    units_per_em: u16,
    copyright: Option<String>,
    glyphs: Vec<GlyphRecord>,
    by_name: HashMap<GlyphName, usize>,
    by_char: HashMap<char, usize>,
    by_alternate: HashMap<char, usize>,
}

impl GlyphInventory {
    #[must_use]
    pub fn new(id: ResourceId) -> GlyphInventory {
        GlyphInventory {
            id,
            units_per_em: 1000,
            copyright: None,
            glyphs: Vec::new(),
            by_name: HashMap::new(),
            by_char: HashMap::new(),
            by_alternate: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_units_per_em(mut self, units_per_em: u16) -> GlyphInventory {
        self.units_per_em = units_per_em;
        self
    }

    #[must_use]
    pub fn with_copyright(mut self, copyright: Option<String>) -> GlyphInventory {
        self.copyright = copyright;
        self
    }

    #[must_use]
    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    #[must_use]
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    #[must_use]
    pub fn copyright(&self) -> Option<&str> {
        self.copyright.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlyphRecord> {
        self.glyphs.iter()
    }

    /// Adds a glyph.  If more than one glyph claims the same
    /// codepoint, the first one added keeps it.
    pub fn add_glyph(
        &mut self,
        name: GlyphName,
        unicode: Option<char>,
        alternates: &[char],
    ) -> Result<(), EngineError> {
        if self.by_name.contains_key(&name) {
            return Err(EngineError::DuplicateGlyph(name));
        }
        let pos = self.glyphs.len();
        self.by_name.insert(name.clone(), pos);
        if let Some(ch) = unicode {
            self.by_char.entry(ch).or_insert(pos);
        }
        for alt in alternates {
            self.by_alternate.entry(*alt).or_insert(pos);
        }
        self.glyphs.push(GlyphRecord {
            name,
            unicode,
            alternates: alternates.to_vec(),
        });
        Ok(())
    }

    /// Looks up the glyph for a character.  A glyph whose primary
    /// codepoint is `ch` is preferred over one which only lists `ch`
    /// as an alternate.
    #[must_use]
    pub fn find_by_char(&self, ch: char) -> Option<&GlyphRecord> {
        self.by_char
            .get(&ch)
            .or_else(|| self.by_alternate.get(&ch))
            .map(|pos| &self.glyphs[*pos])
    }

    #[must_use]
    pub fn find_by_name(&self, name: &GlyphName) -> Option<&GlyphRecord> {
        self.by_name.get(name).map(|pos| &self.glyphs[*pos])
    }

    /// Builds the inventory of a TrueType or OpenType font.
    ///
    /// Glyph names come from the font's `post` or `CFF` table.  Glyphs
    /// without a name there are called `uniXXXX` after their primary
    /// codepoint, or `glyphNNNNN` after their glyph ID.  Where several
    /// codepoints map to a glyph, the lowest one is taken as its
    /// primary codepoint and the others are alternates.
    pub fn from_font_data(id: ResourceId, data: &[u8]) -> Result<GlyphInventory, EngineError> {
        let face = ttf_parser::Face::parse(data, 0).map_err(|e| EngineError::BadFont {
            resource: id.clone(),
            msg: e.to_string(),
        })?;

        let mut codepoints: BTreeMap<u16, Vec<char>> = BTreeMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|cp| {
                    if let (Some(ch), Some(gid)) = (char::from_u32(cp), subtable.glyph_index(cp)) {
                        codepoints.entry(gid.0).or_default().push(ch);
                    }
                });
            }
        }

        let copyright: Option<String> = face
            .names()
            .into_iter()
            .find(|name| name.name_id == ttf_parser::name_id::COPYRIGHT_NOTICE && name.is_unicode())
            .and_then(|name| name.to_string());

        let mut inventory = GlyphInventory::new(id)
            .with_units_per_em(face.units_per_em())
            .with_copyright(copyright);
        for gid in 0..face.number_of_glyphs() {
            let mut chars: Vec<char> = codepoints.remove(&gid).unwrap_or_default();
            chars.sort_unstable();
            chars.dedup();
            let (unicode, alternates): (Option<char>, &[char]) = match chars.split_first() {
                Some((first, rest)) => (Some(*first), rest),
                None => (None, &[]),
            };
            let name: GlyphName = match face.glyph_name(ttf_parser::GlyphId(gid)) {
                Some(name) if !inventory.by_name.contains_key(&GlyphName::from(name)) => {
                    GlyphName::from(name)
                }
                Some(name) => {
                    event!(
                        Level::DEBUG,
                        "font {} uses the glyph name {name} more than once; calling glyph {gid} {name}.{gid}",
                        inventory.id
                    );
                    GlyphName::from(format!("{name}.{gid}"))
                }
                None => match unicode {
                    Some(ch) => GlyphName::from(format!("uni{:04X}", u32::from(ch))),
                    None => GlyphName::from(format!("glyph{gid:05}")),
                },
            };
            inventory.add_glyph(name, unicode, alternates)?;
        }
        event!(
            Level::DEBUG,
            "font {} has {} glyphs, {} units per em",
            inventory.id,
            inventory.len(),
            inventory.units_per_em
        );
        Ok(inventory)
    }

    /// Reads the font file at `path` and builds its inventory.
    pub fn load(id: ResourceId, path: &Path) -> Result<GlyphInventory, EngineError> {
        let data = fs::read(path).map_err(|error| EngineError::Io {
            action: IoAction::Read,
            path: path.to_path_buf(),
            error,
        })?;
        GlyphInventory::from_font_data(id, &data)
    }
}

#[cfg(test)]
fn sample_inventory() -> GlyphInventory {
    let mut inv = GlyphInventory::new(ResourceId::from("Sample"));
    inv.add_glyph(GlyphName::from("a"), Some('a'), &[])
        .expect("glyph a is new");
    inv.add_glyph(GlyphName::from("minus"), Some('\u{2212}'), &['-'])
        .expect("glyph minus is new");
    inv.add_glyph(GlyphName::from("hyphen"), Some('-'), &[])
        .expect("glyph hyphen is new");
    inv.add_glyph(GlyphName::from(".notdef"), None, &[])
        .expect("glyph .notdef is new");
    inv
}

#[test]
fn test_find_by_char_prefers_primary_codepoint() {
    let inv = sample_inventory();
    assert_eq!(
        inv.find_by_char('-').map(|g| g.name.as_str()),
        Some("hyphen")
    );
    assert_eq!(
        inv.find_by_char('\u{2212}').map(|g| g.name.as_str()),
        Some("minus")
    );
    assert_eq!(inv.find_by_char('b'), None);
}

#[test]
fn test_find_by_char_falls_back_to_alternate() {
    let mut inv = GlyphInventory::new(ResourceId::from("Alt"));
    inv.add_glyph(GlyphName::from("minus"), Some('\u{2212}'), &['-'])
        .expect("glyph minus is new");
    assert_eq!(
        inv.find_by_char('-').map(|g| g.name.as_str()),
        Some("minus")
    );
}

#[test]
fn test_find_by_name() {
    let inv = sample_inventory();
    let notdef = inv
        .find_by_name(&GlyphName::from(".notdef"))
        .expect("sample inventory has .notdef");
    assert_eq!(notdef.unicode, None);
    assert!(inv.find_by_name(&GlyphName::from("b")).is_none());
    assert_eq!(inv.len(), 4);
}

#[test]
fn test_duplicate_glyph_is_rejected() {
    let mut inv = sample_inventory();
    match inv.add_glyph(GlyphName::from("a"), Some('A'), &[]) {
        Err(EngineError::DuplicateGlyph(name)) => assert_eq!(name.as_str(), "a"),
        other => panic!("expected a duplicate glyph error, got {other:?}"),
    }
    // The failed addition must not have claimed the codepoint.
    assert!(inv.find_by_char('A').is_none());
}

#[test]
fn test_garbage_is_not_a_font() {
    match GlyphInventory::from_font_data(ResourceId::from("Junk"), b"this is not a font") {
        Err(EngineError::BadFont { resource, .. }) => assert_eq!(resource.as_str(), "Junk"),
        other => panic!("expected a bad font error, got {other:?}"),
    }
}
