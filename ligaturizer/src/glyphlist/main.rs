use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use clap::ArgAction::Set;
use clap::Parser;
use tracing::{event, Level};
use tracing_subscriber::prelude::*;

use glyphs::prelude::{EngineError, GlyphInventory, GlyphRecord, ResourceId};

/// Lists the glyphs of a font, so that their names can be used in
/// ligature tables
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// The TrueType or OpenType font to list.
    #[clap(action = Set)]
    font: PathBuf,
}

#[derive(Debug)]
enum Fail {
    Font(EngineError),
    InitialisationFailure(String),
}

impl Display for Fail {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Fail::Font(e) => e.fmt(f),
            Fail::InitialisationFailure(msg) => f.write_str(msg.as_str()),
        }
    }
}

impl Error for Fail {}

fn describe(id: usize, glyph: &GlyphRecord) -> String {
    let mut line = format!("{id:>6} {:30}", glyph.name.as_str());
    if let Some(ch) = glyph.unicode {
        line.push_str(&format!(" U+{:04X}", u32::from(ch)));
    }
    for alt in &glyph.alternates {
        line.push_str(&format!(" (U+{:04X})", u32::from(*alt)));
    }
    line.trim_end().to_string()
}

fn run() -> Result<(), Fail> {
    let cli = Cli::parse();
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("warn"))
        .map_err(|e| {
            Fail::InitialisationFailure(format!("failed to initialise tracing filter: {e}"))
        })?;
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let name = cli
        .font
        .file_stem()
        .map_or_else(|| "font".to_string(), |s| s.to_string_lossy().into_owned());
    let inventory = GlyphInventory::load(ResourceId::from(name.as_str()), &cli.font).map_err(Fail::Font)?;
    event!(
        Level::INFO,
        "{} has {} glyphs",
        cli.font.display(),
        inventory.len()
    );
    for (id, glyph) in inventory.iter().enumerate() {
        println!("{}", describe(id, glyph));
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
