use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{event, span, Level};

use glyphs::prelude::{
    FeatureTag, FontEngine, FontNames, FontProject, GlyphInventory, IoAction, LanguageSystem,
    ResourceId,
};

use super::builder::Decorations;
use super::compiler::{CompilerOptions, LigatureCompiler, SymbolSequence};
use super::listing::Listing;
use super::resolver::Candidates;
use super::symbol::SymbolFormat;
use super::tables::{Table, TableKind, TablesFile};
use super::types::LigatureFailure;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Print the created glyphs and the rule table on stdout.
    pub list: bool,
    /// Overrides the output font name given in the tables file.
    pub name: Option<String>,
}

fn candidates_for(fonts: &[String], prefer_donors: bool) -> Candidates {
    let ids: Vec<ResourceId> = fonts.iter().map(|f| ResourceId::from(f.as_str())).collect();
    // Naming the target explicitly puts it where it is listed.
    if prefer_donors || ids.iter().any(ResourceId::is_target) {
        Candidates::listed_only(ids)
    } else {
        Candidates::new(ids)
    }
}

fn parse_format(format: Option<&String>) -> Result<SymbolFormat, LigatureFailure> {
    match format {
        Some(f) => f.parse(),
        None => Ok(SymbolFormat::Literal),
    }
}

struct TableReader<'a> {
    table: &'a Table,
    format: SymbolFormat,
    candidates: Candidates,
    decorations: Decorations,
}

impl<'a> TableReader<'a> {
    fn new(table: &'a Table) -> Result<TableReader<'a>, LigatureFailure> {
        let decoration = |text: &Option<String>,
                          format: Option<&String>,
                          fonts: Option<&Vec<String>>|
         -> Result<Option<SymbolSequence>, LigatureFailure> {
            match text {
                None => Ok(None),
                Some(text) => Ok(Some(SymbolSequence {
                    text: text.clone(),
                    format: parse_format(format)?,
                    candidates: candidates_for(
                        fonts.unwrap_or(&table.fonts),
                        table.prefer_donors,
                    ),
                })),
            }
        };
        Ok(TableReader {
            table,
            format: parse_format(table.format.as_ref())?,
            candidates: candidates_for(&table.fonts, table.prefer_donors),
            decorations: Decorations {
                prefix: decoration(
                    &table.prefix,
                    table.prefix_format.as_ref(),
                    table.prefix_fonts.as_ref(),
                )?,
                suffix: decoration(
                    &table.suffix,
                    table.suffix_format.as_ref(),
                    table.suffix_fonts.as_ref(),
                )?,
            },
        })
    }

    fn replacement(&self, text: &str) -> SymbolSequence {
        SymbolSequence {
            text: text.to_string(),
            format: self.format,
            candidates: self.candidates.clone(),
        }
    }

    /// Every resource named by the table.
    fn resources(&self) -> impl Iterator<Item = ResourceId> + '_ {
        let t = self.table;
        t.fonts
            .iter()
            .chain(t.prefix_fonts.iter().flatten())
            .chain(t.suffix_fonts.iter().flatten())
            .map(|f| ResourceId::from(f.as_str()))
    }

    fn compile<E: FontEngine>(&self, compiler: &mut LigatureCompiler<E>) -> Result<usize, LigatureFailure> {
        let table = self.table;
        let mut count: usize = 0;
        match table.kind {
            TableKind::Macro => {
                for (key, value) in table.entries_by_length() {
                    let name = format!("{}{key}", table.macro_prefix);
                    compiler.add_macro(&name, &self.replacement(value), &self.decorations)?;
                    count += 1;
                }
            }
            TableKind::MacroArgument => {
                if table.macros.is_empty() {
                    return Err(LigatureFailure::BadEntry {
                        entry: "macro_argument table".to_string(),
                        msg: "the table names no macros".to_string(),
                    });
                }
                let mut arguments: Vec<(char, SymbolSequence)> = Vec::with_capacity(table.entries.len());
                for (key, value) in &table.entries {
                    let mut chars = key.chars();
                    match (chars.next(), chars.next()) {
                        (Some(ch), None) => arguments.push((ch, self.replacement(value))),
                        _ => {
                            return Err(LigatureFailure::BadEntry {
                                entry: key.clone(),
                                msg: "a macro argument must be a single character".to_string(),
                            });
                        }
                    }
                }
                for name in table.macros_by_length() {
                    let name = format!("{}{name}", table.macro_prefix);
                    compiler.add_macro_font(&name, &arguments, &self.decorations)?;
                    count += arguments.len();
                }
            }
            TableKind::Ligature => {
                for (key, value) in table.entries_by_length() {
                    let text = format!("{}{key}", table.char_prefix);
                    compiler.add_ligature(&text, &self.replacement(value), &self.decorations)?;
                    count += 1;
                }
            }
        }
        Ok(count)
    }
}

/// Adds the rules of every table, in order, to `compiler`.
pub fn compile_tables<E: FontEngine>(
    compiler: &mut LigatureCompiler<E>,
    tables: &[Table],
) -> Result<(), LigatureFailure> {
    for (index, table) in tables.iter().enumerate() {
        let span = span!(Level::INFO, "table", index, kind = ?table.kind);
        let _enter = span.enter();
        let reader = TableReader::new(table)?;
        if let Some(unknown) = reader.resources().find(|id| !compiler.resolver().is_known(id)) {
            return Err(LigatureFailure::UnknownResource(unknown));
        }
        let entries = reader.compile(compiler)?;
        event!(
            Level::INFO,
            "table {index} ({:?}): {entries} entries; {} chains and {} imported glyphs so far",
            table.kind,
            compiler.chain_count(),
            compiler.resolver().import_count()
        );
    }
    Ok(())
}

fn check_donor_names(tables: &TablesFile) -> Result<(), LigatureFailure> {
    let mut seen: HashSet<&str> = HashSet::new();
    for donor in &tables.donors {
        let id = ResourceId::from(donor.name.as_str());
        if id.is_target() {
            return Err(LigatureFailure::BadEntry {
                entry: donor.name.clone(),
                msg: "this name is reserved for the target font".to_string(),
            });
        }
        if !seen.insert(donor.name.as_str()) {
            return Err(LigatureFailure::BadEntry {
                entry: donor.name.clone(),
                msg: "more than one donor font has this name".to_string(),
            });
        }
    }
    Ok(())
}

/// Compiles `tables` into a project extending `target`.  The donor
/// inventories must be those named by `tables`.
pub fn compile_project(
    tables: &TablesFile,
    target: GlyphInventory,
    donors: Vec<GlyphInventory>,
    options: &OutputOptions,
) -> Result<FontProject, LigatureFailure> {
    check_donor_names(tables)?;
    let feature = FeatureTag::new(&tables.output.feature)?;
    let language_systems: Vec<LanguageSystem> = match &tables.output.language_systems {
        Some(systems) => systems
            .iter()
            .map(|s| LanguageSystem::parse(s))
            .collect::<Result<Vec<_>, _>>()?,
        None => LanguageSystem::defaults(),
    };
    let project = FontProject::new(target).with_language_systems(language_systems);
    let mut compiler = LigatureCompiler::new(
        project,
        donors,
        CompilerOptions {
            feature,
            ..CompilerOptions::default()
        },
    )?;
    compile_tables(&mut compiler, &tables.tables)?;

    let mut project = compiler.into_engine();
    let name: &str = options.name.as_deref().unwrap_or(&tables.output.name);
    let names = FontNames::derive(
        name,
        project.target().copyright(),
        &tables.output.copyright_addendum,
    );
    project.set_names(names);
    Ok(project)
}

/// Reads the tables file `tables_path`, compiles it against the fonts
/// it names, and writes the result to `output_path`.  Nothing is
/// written unless every table compiles.
pub fn ligaturize_file(
    tables_path: &Path,
    output_path: &Path,
    options: &OutputOptions,
) -> Result<(), LigatureFailure> {
    let text = fs::read_to_string(tables_path).map_err(|error| LigatureFailure::Io {
        action: IoAction::Read,
        path: tables_path.to_path_buf(),
        error,
    })?;
    let mut tables = TablesFile::parse(tables_path, &text)?;
    tables.resolve_paths(tables_path.parent().unwrap_or_else(|| Path::new(".")));

    let target = GlyphInventory::load(ResourceId::target(), &tables.target.path)?;
    let donors: Vec<GlyphInventory> = tables
        .donors
        .iter()
        .map(|d| GlyphInventory::load(ResourceId::from(d.name.as_str()), &d.path))
        .collect::<Result<Vec<_>, _>>()?;

    let project = compile_project(&tables, target, donors, options)?;
    if options.list {
        print!("{}", Listing::new(&project));
    }
    project.serialize(output_path)?;
    event!(
        Level::INFO,
        "{} glyphs created, {} rule groups",
        project.created_glyphs().len(),
        project.rules().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::candidates_for;
    use super::super::resolver::Candidates;
    use glyphs::prelude::ResourceId;

    fn fonts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_candidates_for() {
        let fira = ResourceId::from("FiraCode");
        assert_eq!(
            candidates_for(&fonts(&["FiraCode"]), false),
            Candidates::new(vec![fira.clone()])
        );
        assert_eq!(
            candidates_for(&fonts(&["FiraCode"]), true),
            Candidates::listed_only(vec![fira.clone()])
        );
        assert_eq!(
            candidates_for(&fonts(&["FiraCode", "Default"]), false)
                .search_order(),
            vec![fira, ResourceId::target()]
        );
    }
}
