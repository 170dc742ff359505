//! Compiles tables of LaTeX-style macros and plain ligatures into
//! substitution rules for a monospace font.
#![deny(unreachable_pub)]
#![deny(unsafe_code)]
#![warn(clippy::must_use_candidate)]
#![warn(clippy::manual_string_new)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::return_self_not_must_use)]
#![warn(clippy::wildcard_imports)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::match_same_arms)]
#![warn(clippy::items_after_statements)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)] // fix later
#![allow(clippy::module_name_repetitions)] // fix later
#![allow(clippy::doc_markdown)] // fix soon

mod builder;
mod chain;
mod compiler;
mod driver;
mod length;
mod listing;
mod resolver;
mod symbol;
mod tables;
mod types;

pub use builder::Decorations;
pub use chain::{Chain, ChainCompiler};
pub use compiler::{CompilerOptions, LigatureCompiler, SymbolSequence};
pub use driver::{compile_project, compile_tables, ligaturize_file, OutputOptions};
pub use length::{classifier_name, marker_name, LengthTagger, CLASSIFIER};
pub use listing::Listing;
pub use resolver::{Candidates, DonorResolver};
pub use symbol::{parse_sequence, SymbolFormat, SymbolSpec};
pub use tables::{DonorSection, FontSection, OutputSection, Table, TableKind, TablesFile};
pub use types::LigatureFailure;
