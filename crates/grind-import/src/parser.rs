//! Parses LeetCode solution files into structured problem records.
//!
//! A solution file is named `<id>-<slug>.js` and carries its metadata
//! inline: an optional leading doc comment with the problem statement
//! and a `Difficulty:` line, and an optional `<id>. <Title>` heading
//! comment. Files that do not match the naming scheme are skipped.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use grind_core::{Difficulty, Error, Result, UNCATEGORIZED_NAME};

/// Category keywords matched against the lowercased slug and title.
///
/// Every matching entry is collected, so a problem can land in several
/// categories. Entries are ordered from specific to generic.
const PATTERNS: &[(&str, &[&str])] = &[
    ("Palindrome", &["palindrome"]),
    ("Parentheses", &["parentheses", "bracket"]),
    ("Intervals", &["interval"]),
    ("Tree", &["tree", "bst", "traversal"]),
    ("Linked List", &["linked list", "list node"]),
    ("Matrix", &["matrix", "grid"]),
    (
        "Dynamic Programming",
        &["dp", "dynamic programming", "climbing stairs", "subsequence"],
    ),
    ("String", &["substring", "string", "anagram"]),
    ("Array", &["array", "sum", "subarray"]),
    ("Math", &["math", "number", "digit"]),
];

static FILENAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)-(.+)\.js$").unwrap());
static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.\s+(.+)").unwrap());
static DIFFICULTY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Difficulty:\s*(Easy|Medium|Hard)").unwrap());
static DOC_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*\*(.*?)\*/").unwrap());
static COMMENT_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\*\s?").unwrap());

/// One solution file parsed into its problem record.
#[derive(Debug, Clone)]
pub struct ParsedSolution {
    pub leetcode_id: i32,
    pub slug: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub categories: Vec<String>,
    pub description: Option<String>,
    pub content: String,
}

/// Derive a display title from a slug: `two-sum` becomes `Two Sum`.
fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip the leading ` * ` scaffolding from a doc comment body.
fn clean_doc_comment(block: &str) -> String {
    block
        .lines()
        .map(|line| COMMENT_PREFIX_RE.replace(line, ""))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Collect every category whose keywords appear in the slug or title.
/// Falls back to the uncategorized name when nothing matches.
fn categorize(slug: &str, title: &str) -> Vec<String> {
    let slug = slug.to_lowercase();
    let title = title.to_lowercase();

    let mut categories: Vec<String> = PATTERNS
        .iter()
        .filter(|(_, keywords)| {
            keywords
                .iter()
                .any(|kw| slug.contains(kw) || title.contains(kw))
        })
        .map(|(category, _)| (*category).to_string())
        .collect();

    if categories.is_empty() {
        categories.push(UNCATEGORIZED_NAME.to_string());
    }

    categories
}

/// Parse one solution from its file name and contents.
///
/// Returns `Ok(None)` when the file name does not match the
/// `<id>-<slug>.js` scheme. The title read from a numbered heading
/// comment wins over the slug-derived one; the first doc comment block
/// becomes the description with its comment scaffolding removed.
pub fn parse_solution(file_name: &str, content: &str) -> Result<Option<ParsedSolution>> {
    let caps = match FILENAME_RE.captures(file_name) {
        Some(caps) => caps,
        None => return Ok(None),
    };

    let leetcode_id: i32 = caps[1].parse().map_err(|_| {
        Error::InvalidInput(format!("Problem number out of range in '{}'", file_name))
    })?;
    let slug = caps[2].to_string();

    let title = TITLE_RE
        .captures(content)
        .map(|m| m[1].trim().to_string())
        .unwrap_or_else(|| title_from_slug(&slug));

    let difficulty = DIFFICULTY_RE
        .captures(content)
        .and_then(|m| m[1].parse::<Difficulty>().ok())
        .unwrap_or_default();

    let description = DOC_COMMENT_RE
        .captures(content)
        .map(|m| clean_doc_comment(&m[1]))
        .filter(|d| !d.is_empty());

    let categories = categorize(&slug, &title);

    Ok(Some(ParsedSolution {
        leetcode_id,
        slug,
        title,
        difficulty,
        categories,
        description,
        content: content.to_string(),
    }))
}

/// Parse a solution file from disk. Files outside the naming scheme
/// are skipped without being read.
pub fn parse_solution_file(path: &Path) -> Result<Option<ParsedSolution>> {
    let file_name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return Ok(None),
    };
    if !FILENAME_RE.is_match(file_name) {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    parse_solution(file_name, &content)
}

/// Scan a directory for solution files, sorted by LeetCode id.
pub fn scan_solutions_dir(dir: &Path) -> Result<Vec<ParsedSolution>> {
    if !dir.is_dir() {
        return Err(Error::InvalidInput(format!(
            "Solutions directory not found: {}",
            dir.display()
        )));
    }

    let mut solutions = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match parse_solution_file(&path)? {
            Some(solution) => solutions.push(solution),
            None => debug!(file = %path.display(), "Skipping non-solution file"),
        }
    }

    solutions.sort_by_key(|s| s.leetcode_id);
    Ok(solutions)
}
