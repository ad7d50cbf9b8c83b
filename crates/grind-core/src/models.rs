//! Core data models for grind.
//!
//! These types are shared across all grind crates and represent the
//! core domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// PROBLEM TYPES
// =============================================================================

/// Difficulty rating as published on LeetCode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// Source file did not declare a difficulty.
    #[default]
    Unknown,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "Easy"),
            Self::Medium => write!(f, "Medium"),
            Self::Hard => write!(f, "Hard"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Invalid difficulty: {}", s)),
        }
    }
}

/// How far along the user is with a problem.
///
/// Serialized with the display labels ("To Do", not "to_do") so API
/// payloads and database rows carry the same strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum LearningStatus {
    Mastered,
    Learning,
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
}

impl std::fmt::Display for LearningStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mastered => write!(f, "Mastered"),
            Self::Learning => write!(f, "Learning"),
            Self::ToDo => write!(f, "To Do"),
        }
    }
}

impl std::str::FromStr for LearningStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mastered" => Ok(Self::Mastered),
            "learning" => Ok(Self::Learning),
            "to do" | "todo" | "to-do" => Ok(Self::ToDo),
            _ => Err(format!("Invalid learning status: {}", s)),
        }
    }
}

/// A stored LeetCode problem with its solution file.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Problem {
    pub id: Uuid,
    /// Numeric LeetCode id, unique across the whole catalog.
    pub leetcode_id: i32,
    pub slug: String,
    pub title: String,
    /// Problem statement in Markdown.
    pub description: Option<String>,
    pub difficulty: Difficulty,
    /// Raw solution file contents as imported.
    pub content: String,
    /// Curated solution in Markdown, if one has been written or generated.
    pub solution: Option<String>,
    pub learning_status: LearningStatus,
    pub created_at_utc: DateTime<Utc>,
}

/// Summary view of a problem for listings.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProblemSummary {
    pub id: Uuid,
    pub leetcode_id: i32,
    pub slug: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub learning_status: LearningStatus,
    pub created_at_utc: DateTime<Utc>,
}

/// Complete problem with the categories it is tagged with.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProblemDetail {
    pub problem: Problem,
    /// Category display names, alphabetical.
    pub categories: Vec<String>,
}

/// Input for creating or updating a problem from an imported file.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NewProblem {
    pub leetcode_id: i32,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Difficulty,
    pub content: String,
}

// =============================================================================
// LISTING TYPES
// =============================================================================

/// Request to list problems with optional filters.
///
/// Both filters compose: a request with `tag` and `status` set returns
/// only problems carrying that tag in that status. Ordering is always
/// by ascending LeetCode id.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListProblemsRequest {
    /// Filter to problems tagged with this category slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Filter by learning status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LearningStatus>,

    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: i64,

    /// Problems per page.
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    crate::defaults::PAGE_SIZE
}

impl Default for ListProblemsRequest {
    fn default() -> Self {
        Self {
            tag: None,
            status: None,
            page: 1,
            page_size: crate::defaults::PAGE_SIZE,
        }
    }
}

/// One page of problems plus the total count for the active filters.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProblemPage {
    pub problems: Vec<ProblemSummary>,
    /// Total problems matching the filters, across all pages.
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

// =============================================================================
// CATEGORY TYPES
// =============================================================================

/// A category (tag) that problems can be grouped under.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Category with the number of problems tagged with it.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CategoryWithCount {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub problem_count: i64,
}

// =============================================================================
// NAVIGATION TYPES
// =============================================================================

/// Minimal reference to a neighboring problem for prev/next links.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NeighborRef {
    pub leetcode_id: i32,
    pub slug: String,
    pub title: String,
}

/// Previous and next problems relative to a given one, under the same
/// filters and ordering as the listing.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AdjacentProblems {
    pub prev: Option<NeighborRef>,
    pub next: Option<NeighborRef>,
}

// =============================================================================
// ANALYTICS TYPES
// =============================================================================

/// Per-status values keyed by the display labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatusBuckets {
    #[serde(rename = "Mastered")]
    pub mastered: i64,
    #[serde(rename = "Learning")]
    pub learning: i64,
    #[serde(rename = "To Do")]
    pub to_do: i64,
}

/// Learning progress breakdown across all three statuses.
///
/// Percentages are integers rounded to the nearest whole number and all
/// zero when `total` is zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LearningAnalytics {
    pub counts: StatusBuckets,
    pub percentages: StatusBuckets,
    pub total: i64,
}

// =============================================================================
// BULK OPERATION TYPES
// =============================================================================

/// Outcome of tagging a batch of problems by LeetCode id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BulkAddOutcome {
    /// Links actually created (skips duplicates).
    pub added_count: i64,
    /// Distinct problems matched by the requested ids.
    pub total_found: i64,
}

// =============================================================================
// ENHANCEMENT TYPES
// =============================================================================

/// AI-generated description and solution for a problem.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EnhancedProblem {
    /// Problem statement in Markdown.
    pub description: String,
    /// Commented JavaScript solution.
    pub solution: String,
}
