//! The declarative ligature tables, as read from a TOML file.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::types::LigatureFailure;

fn default_feature() -> String {
    "calt".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// The name of the output font, such as `DroidSansMonoLaTeX`.
    pub name: String,
    #[serde(default)]
    pub copyright_addendum: String,
    #[serde(default = "default_feature")]
    pub feature: String,
    /// Each item is a script tag and a language tag, such as
    /// `"latn dflt"`.
    #[serde(default)]
    pub language_systems: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontSection {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DonorSection {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// `\name` is replaced by a symbol sequence.
    Macro,
    /// `\name X` and `\name{X}` are replaced by a symbol sequence
    /// chosen by `X`.
    MacroArgument,
    /// A literal run of characters is replaced by a symbol sequence.
    Ligature,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Table {
    pub kind: TableKind,
    /// Donor fonts for the replacements, in priority order.
    #[serde(default)]
    pub fonts: Vec<String>,
    #[serde(default)]
    pub format: Option<String>,
    /// Search only the listed fonts, even if the target has the
    /// symbol.
    #[serde(default)]
    pub prefer_donors: bool,
    #[serde(default)]
    pub macro_prefix: String,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub prefix_format: Option<String>,
    #[serde(default)]
    pub prefix_fonts: Option<Vec<String>>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub suffix_format: Option<String>,
    #[serde(default)]
    pub suffix_fonts: Option<Vec<String>>,
    #[serde(default)]
    pub char_prefix: String,
    /// The macros sharing the argument map of a `macro_argument`
    /// table.
    #[serde(default)]
    pub macros: Vec<String>,
    pub entries: BTreeMap<String, String>,
}

impl Table {
    /// The entries, longest key first (ties broken by key), which is
    /// the order in which macros have to be registered.
    #[must_use]
    pub fn entries_by_length(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_by(|(a, _), (b, _)| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        entries
    }

    /// Macro tables register their macros longest first; this is the
    /// order for the macros of an argument table.
    #[must_use]
    pub fn macros_by_length(&self) -> Vec<&str> {
        let mut macros: Vec<&str> = self.macros.iter().map(String::as_str).collect();
        macros.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        macros.dedup();
        macros
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TablesFile {
    pub output: OutputSection,
    pub target: FontSection,
    #[serde(default)]
    pub donors: Vec<DonorSection>,
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl TablesFile {
    pub fn parse(path: &Path, text: &str) -> Result<TablesFile, LigatureFailure> {
        toml::from_str(text).map_err(|e| LigatureFailure::BadTables {
            path: path.to_path_buf(),
            msg: e.to_string(),
        })
    }

    /// Resolves the font paths against `base`, the directory holding
    /// the tables file.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.target.path.is_relative() {
            self.target.path = base.join(&self.target.path);
        }
        for donor in &mut self.donors {
            if donor.path.is_relative() {
                donor.path = base.join(&donor.path);
            }
        }
    }
}
