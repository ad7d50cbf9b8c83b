//! Problem HTTP handlers.
//!
//! Listing with filters and pagination, title search, prev/next
//! navigation, and content/status updates.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{ApiError, AppState};
use grind_core::{
    defaults, AdjacentProblems, LearningStatus, ListProblemsRequest, ProblemDetail, ProblemPage,
    ProblemRepository, ProblemSummary,
};

/// Query parameters for listing problems.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProblemsQuery {
    /// Filter to problems tagged with this category slug
    pub tag: Option<String>,
    /// Filter by learning status ("Mastered", "Learning", "To Do")
    pub status: Option<String>,
    /// 1-based page number (default 1)
    pub page: Option<i64>,
    /// Problems per page (default 12, capped at 100)
    pub limit: Option<i64>,
}

/// Query parameters for problem search.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Matched case-insensitively against title, slug, and LeetCode id
    pub q: Option<String>,
}

/// Query parameters for prev/next navigation.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdjacentQuery {
    /// LeetCode id to navigate around
    pub leetcode_id: Option<String>,
    /// Filter to problems tagged with this category slug
    pub tag: Option<String>,
    /// Filter by learning status
    pub status: Option<String>,
}

/// Request body for updating problem content.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateProblemRequest {
    /// New problem statement in Markdown
    pub description: Option<String>,
    /// New curated solution
    pub solution: Option<String>,
}

/// Request body for updating learning status.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    /// One of "Mastered", "Learning", "To Do"
    pub status: String,
}

fn parse_status(raw: Option<&str>) -> Result<Option<LearningStatus>, ApiError> {
    raw.map(|s| s.parse::<LearningStatus>())
        .transpose()
        .map_err(ApiError::BadRequest)
}

/// List problems with filtering and pagination, ordered by LeetCode id.
#[utoipa::path(get, path = "/api/v1/problems", tag = "Problems",
    params(ListProblemsQuery),
    responses(
        (status = 200, description = "One page of problems", body = ProblemPage),
        (status = 400, description = "Unknown status value")
    ))]
pub async fn list_problems(
    State(state): State<AppState>,
    Query(query): Query<ListProblemsQuery>,
) -> Result<Json<ProblemPage>, ApiError> {
    let status = parse_status(query.status.as_deref())?;
    let req = ListProblemsRequest {
        tag: query.tag,
        status,
        page: query.page.unwrap_or(1),
        page_size: query.limit.unwrap_or(defaults::PAGE_SIZE),
    };
    let page = state.db.problems.list(req).await?;
    Ok(Json(page))
}

/// Search problems by title, slug, or LeetCode id.
#[utoipa::path(get, path = "/api/v1/problems/search", tag = "Problems",
    params(SearchQuery),
    responses((status = 200, description = "Matching problems", body = [ProblemSummary])))]
pub async fn search_problems(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProblemSummary>>, ApiError> {
    let results = state
        .db
        .problems
        .search(query.q.as_deref().unwrap_or(""), defaults::SEARCH_LIMIT)
        .await?;
    Ok(Json(results))
}

/// Find the previous and next problems around a LeetCode id.
///
/// Neighbors respect the same tag and status filters as the listing.
#[utoipa::path(get, path = "/api/v1/problems/adjacent", tag = "Problems",
    params(AdjacentQuery),
    responses(
        (status = 200, description = "Previous and next problems", body = AdjacentProblems),
        (status = 400, description = "Missing or non-numeric leetcode_id")
    ))]
pub async fn adjacent_problems(
    State(state): State<AppState>,
    Query(query): Query<AdjacentQuery>,
) -> Result<Json<AdjacentProblems>, ApiError> {
    let leetcode_id = query
        .leetcode_id
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("leetcode_id is required".to_string()))?
        .parse::<i32>()
        .map_err(|_| ApiError::BadRequest("leetcode_id must be an integer".to_string()))?;
    let status = parse_status(query.status.as_deref())?;
    let adjacent = state
        .db
        .problems
        .adjacent(leetcode_id, query.tag.as_deref(), status)
        .await?;
    Ok(Json(adjacent))
}

/// Get a full problem with its categories by slug.
#[utoipa::path(get, path = "/api/v1/problems/{slug}", tag = "Problems",
    params(("slug" = String, Path, description = "Problem slug")),
    responses(
        (status = 200, description = "Problem detail", body = ProblemDetail),
        (status = 404, description = "Problem not found")
    ))]
pub async fn get_problem(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProblemDetail>, ApiError> {
    let detail = state
        .db
        .problems
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Problem '{}' not found", slug)))?;
    Ok(Json(detail))
}

/// Update the description and/or solution of a problem.
#[utoipa::path(patch, path = "/api/v1/problems/{slug}", tag = "Problems",
    params(("slug" = String, Path, description = "Problem slug")),
    request_body = UpdateProblemRequest,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Neither field provided"),
        (status = 404, description = "Problem not found")
    ))]
pub async fn update_problem(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<UpdateProblemRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .db
        .problems
        .update_content(&slug, req.description.as_deref(), req.solution.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Update the learning status of a problem.
#[utoipa::path(put, path = "/api/v1/problems/{slug}/status", tag = "Problems",
    params(("slug" = String, Path, description = "Problem slug")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Unknown status value"),
        (status = 404, description = "Problem not found")
    ))]
pub async fn update_problem_status(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<StatusCode, ApiError> {
    let status = req
        .status
        .parse::<LearningStatus>()
        .map_err(ApiError::BadRequest)?;
    state
        .db
        .problems
        .update_learning_status(&slug, status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
