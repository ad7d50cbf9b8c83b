//! Filesystem importer for the grind problem catalog.
//!
//! Walks a directory of `<id>-<slug>.js` solution files, parses each
//! into a problem record with inferred categories, and upserts the
//! result into the database. Safe to re-run: existing problems are
//! refreshed in place.

pub mod parser;
pub mod seeder;

pub use parser::{parse_solution, parse_solution_file, scan_solutions_dir, ParsedSolution};
pub use seeder::{import_directory, ImportSummary};
