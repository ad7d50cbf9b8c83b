//! Core traits for grind abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// PROBLEM REPOSITORY TRAITS
// =============================================================================

/// Repository for problem CRUD and navigation.
#[async_trait]
pub trait ProblemRepository: Send + Sync {
    /// Insert a problem, or update title, description, difficulty, and
    /// content when the slug already exists.
    async fn upsert(&self, problem: NewProblem) -> Result<Uuid>;

    /// Fetch a full problem with its categories by slug.
    async fn get_by_slug(&self, slug: &str) -> Result<Option<ProblemDetail>>;

    /// List problems with filtering and pagination.
    async fn list(&self, req: ListProblemsRequest) -> Result<ProblemPage>;

    /// Find the previous and next problems around a LeetCode id, under
    /// the same filters and ordering as [`list`](Self::list).
    async fn adjacent(
        &self,
        leetcode_id: i32,
        tag: Option<&str>,
        status: Option<LearningStatus>,
    ) -> Result<AdjacentProblems>;

    /// Update the description and/or solution of a problem.
    async fn update_content(
        &self,
        slug: &str,
        description: Option<&str>,
        solution: Option<&str>,
    ) -> Result<()>;

    /// Update the learning status of a problem.
    async fn update_learning_status(&self, slug: &str, status: LearningStatus) -> Result<()>;

    /// Search problems by case-insensitive substring match against the
    /// title, the slug, or the decimal LeetCode id. A blank query matches
    /// nothing.
    async fn search(&self, query: &str, limit: i64) -> Result<Vec<ProblemSummary>>;
}

// =============================================================================
// CATEGORY REPOSITORY TRAITS
// =============================================================================

/// Repository for category (tag) operations.
///
/// Implementations must uphold one invariant across every mutation:
/// a problem is never left without categories. Removing or deleting the
/// last real tag re-files the affected problems under the uncategorized
/// fallback.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a category, or return the existing one when the normalized
    /// slug is already taken. No link side effects.
    async fn create(&self, name: &str) -> Result<Category>;

    /// List all categories with problem counts, ordered by name.
    async fn list(&self) -> Result<Vec<CategoryWithCount>>;

    /// List the categories attached to one problem, ordered by name.
    async fn get_for_problem(&self, problem_slug: &str) -> Result<Vec<Category>>;

    /// Tag a problem, creating the category if needed. Drops the
    /// uncategorized fallback from the problem as a side effect.
    async fn add_to_problem(&self, problem_slug: &str, name: &str) -> Result<Category>;

    /// Untag a problem. Re-files it under the uncategorized fallback
    /// when this was its last category.
    async fn remove_from_problem(&self, problem_slug: &str, category_slug: &str) -> Result<()>;

    /// Rename a category. The slug is re-derived from the new name.
    async fn rename(&self, slug: &str, new_name: &str) -> Result<Category>;

    /// Delete a category. Problems left with no categories are re-filed
    /// under the uncategorized fallback. Deleting a slug that does not
    /// exist reports success.
    async fn delete(&self, slug: &str) -> Result<()>;

    /// Tag every problem matching the given LeetCode ids. The category
    /// must already exist; ids with no matching problem are skipped and
    /// show up only in the returned total.
    async fn bulk_add_by_leetcode_ids(
        &self,
        slug: &str,
        leetcode_ids: &[i32],
    ) -> Result<BulkAddOutcome>;
}

// =============================================================================
// ANALYTICS TRAITS
// =============================================================================

/// Repository for learning progress analytics.
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Count problems per learning status, optionally restricted to one
    /// category slug, with rounded integer percentages.
    async fn learning_breakdown(&self, tag: Option<&str>) -> Result<LearningAnalytics>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync + std::fmt::Debug {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Generate text with system context, requesting a JSON object
    /// response where the provider has a native JSON mode. Backends
    /// without one fall back to plain generation.
    async fn generate_json_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.generate_with_system(system, prompt).await
    }

    /// Get the model name being used.
    fn model_name(&self) -> &str;

    /// Check if the backend is available and responding.
    async fn health_check(&self) -> Result<bool>;
}
