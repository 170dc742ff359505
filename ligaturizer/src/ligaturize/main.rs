use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use clap::ArgAction::{Set, SetTrue};
use clap::Parser;
use tracing::{event, span, Level};
use tracing_subscriber::prelude::*;

use ligaturizer::{ligaturize_file, LigatureFailure, OutputOptions};

/// Adds LaTeX-style macro ligatures to a monospace font
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// TOML file describing the target font, the donor fonts and the
    /// ligature tables.
    #[clap(action = Set)]
    tables: PathBuf,

    /// Feature file to write; the glyph manifest is written next to
    /// it.
    #[clap(action = Set, short = 'o', long)]
    output: PathBuf,

    /// Name of the output font, overriding the one in the tables
    /// file.
    #[clap(action = Set, long)]
    name: Option<String>,

    /// When set, list the created glyphs and the rule table.
    #[clap(action = SetTrue, long)]
    list: bool,
}

#[derive(Debug)]
enum Fail {
    /// The tables could not be compiled, or the result not written.
    Ligature(LigatureFailure),
    /// We were not able to initialise logging.
    InitialisationFailure(String),
}

impl Display for Fail {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Fail::Ligature(failure) => failure.fmt(f),
            Fail::InitialisationFailure(msg) => f.write_str(msg.as_str()),
        }
    }
}

impl Error for Fail {}

fn run_ligaturizer() -> Result<(), Fail> {
    let cli = Cli::parse();

    // Set RUST_LOG (for example RUST_LOG=debug) to select which trace
    // messages get printed.
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
        Err(e) => {
            return Err(Fail::InitialisationFailure(format!(
                "failed to initialise tracing filter (perhaps there is a problem with environment variables): {e}"
            )));
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let span = span!(Level::ERROR, "ligaturize", tables=?cli.tables, output=?cli.output);
    let _enter = span.enter();
    let options = OutputOptions {
        list: cli.list,
        name: cli.name,
    };
    let result = ligaturize_file(&cli.tables, &cli.output, &options).map_err(Fail::Ligature);
    if let Err(e) = &result {
        event!(Level::ERROR, "compilation failed: {:?}", e);
    } else {
        event!(Level::INFO, "compilation succeeded");
    }
    result
}

fn main() {
    match run_ligaturizer() {
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
        Ok(()) => {
            std::process::exit(0);
        }
    }
}
