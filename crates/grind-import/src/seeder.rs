//! Seeds parsed solutions into the problem catalog.

use std::path::Path;

use tracing::{debug, info};

use grind_core::{CategoryRepository, NewProblem, ProblemRepository, Result};
use grind_db::Database;

use crate::parser::{scan_solutions_dir, ParsedSolution};

/// Counts reported after an import run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportSummary {
    /// Problems inserted or refreshed.
    pub problems: usize,
    /// Category links attached (existing links count too).
    pub links: usize,
}

/// Import every solution file under `dir` into the catalog.
///
/// Each problem is upserted by slug, so re-running the import refreshes
/// title, description, difficulty, and content without duplicating
/// rows. Category links are attached afterwards; a solution whose slug
/// and title match no category keywords lands under the uncategorized
/// fallback.
pub async fn import_directory(db: &Database, dir: &Path) -> Result<ImportSummary> {
    let solutions = scan_solutions_dir(dir)?;
    info!(
        count = solutions.len(),
        dir = %dir.display(),
        "Importing solutions"
    );

    let mut summary = ImportSummary::default();
    for solution in solutions {
        let ParsedSolution {
            leetcode_id,
            slug,
            title,
            difficulty,
            categories,
            description,
            content,
        } = solution;

        debug!(
            leetcode_id,
            slug = %slug,
            categories = ?categories,
            "Seeding problem"
        );

        db.problems
            .upsert(NewProblem {
                leetcode_id,
                slug: slug.clone(),
                title,
                description,
                difficulty,
                content,
            })
            .await?;
        summary.problems += 1;

        for category in &categories {
            db.tags.add_to_problem(&slug, category).await?;
            summary.links += 1;
        }
    }

    info!(
        problems = summary.problems,
        links = summary.links,
        "Import complete"
    );

    Ok(summary)
}
