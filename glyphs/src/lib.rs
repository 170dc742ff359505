//! The `glyphs` crate defines the font-related things which are
//! useful in both the ligature rule compiler and other associated
//! tools.  The idea is that if you want to write a tool which
//! inspects glyph inventories or substitution rules, it would depend
//! on the glyphs crate but would not need to depend on the rule
//! compiler itself.
#![deny(unreachable_pub)]
#![deny(unsafe_code)]
#![warn(clippy::must_use_candidate)]
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

mod engine;
mod fea;
mod inventory;
mod manifest;
mod metadata;
mod name;
mod project;
mod rules;

pub mod prelude;
