//! Category (tag) HTTP handlers.
//!
//! All mutations go through the repository, which keeps every problem
//! tagged with at least one category.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{ApiError, AppState};
use grind_core::{BulkAddOutcome, Category, CategoryRepository, CategoryWithCount};

/// Request body for creating a category.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateTagRequest {
    /// Display name, e.g. "Dynamic Programming"
    pub name: String,
}

/// Request body for renaming a category.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RenameTagRequest {
    /// New display name
    pub name: String,
}

/// Request body for tagging a problem.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddTagRequest {
    /// Category name; created on first use
    pub name: String,
}

/// Request body for bulk-tagging problems by LeetCode id.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct BulkAddRequest {
    /// LeetCode ids to tag; ids with no matching problem are skipped
    pub leetcode_ids: Vec<i32>,
}

/// List all categories with problem counts.
#[utoipa::path(get, path = "/api/v1/tags", tag = "Tags",
    responses((status = 200, description = "All categories, ordered by name", body = [CategoryWithCount])))]
pub async fn list_tags(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryWithCount>>, ApiError> {
    let tags = state.db.tags.list().await?;
    Ok(Json(tags))
}

/// Create a category. Posting an existing name returns the existing
/// category unchanged.
#[utoipa::path(post, path = "/api/v1/tags", tag = "Tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Created (or already present)", body = Category),
        (status = 400, description = "Empty or overlong name")
    ))]
pub async fn create_tag(
    State(state): State<AppState>,
    Json(req): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state.db.tags.create(&req.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Per-category problem counts keyed by display name.
#[utoipa::path(get, path = "/api/v1/tags/counts", tag = "Tags",
    responses((status = 200, description = "Map of category name to problem count")))]
pub async fn tag_counts(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let tags = state.db.tags.list().await?;
    let counts: serde_json::Map<String, serde_json::Value> = tags
        .into_iter()
        .map(|tag| (tag.name, tag.problem_count.into()))
        .collect();
    Ok(Json(serde_json::Value::Object(counts)))
}

/// Rename a category. The slug is re-derived from the new name.
#[utoipa::path(patch, path = "/api/v1/tags/{slug}", tag = "Tags",
    params(("slug" = String, Path, description = "Category slug")),
    request_body = RenameTagRequest,
    responses(
        (status = 200, description = "Renamed; returns the new slug"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Name already exists")
    ))]
pub async fn rename_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<RenameTagRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let category = state.db.tags.rename(&slug, &req.name).await?;
    Ok(Json(json!({ "slug": category.slug })))
}

/// Delete a category. Problems left without categories fall back to
/// the uncategorized tag. Unknown slugs are reported as deleted.
#[utoipa::path(delete, path = "/api/v1/tags/{slug}", tag = "Tags",
    params(("slug" = String, Path, description = "Category slug")),
    responses((status = 204, description = "Deleted (or already absent)")))]
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.tags.delete(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Tag every problem matching the given LeetCode ids.
#[utoipa::path(post, path = "/api/v1/tags/{slug}/problems", tag = "Tags",
    params(("slug" = String, Path, description = "Category slug")),
    request_body = BulkAddRequest,
    responses(
        (status = 200, description = "How many problems matched and were tagged", body = BulkAddOutcome),
        (status = 400, description = "Empty id list"),
        (status = 404, description = "Category not found")
    ))]
pub async fn bulk_add_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<BulkAddRequest>,
) -> Result<Json<BulkAddOutcome>, ApiError> {
    let outcome = state
        .db
        .tags
        .bulk_add_by_leetcode_ids(&slug, &req.leetcode_ids)
        .await?;
    Ok(Json(outcome))
}

/// List the categories attached to a problem.
#[utoipa::path(get, path = "/api/v1/problems/{slug}/tags", tag = "Tags",
    params(("slug" = String, Path, description = "Problem slug")),
    responses(
        (status = 200, description = "Categories on the problem, ordered by name", body = [Category]),
        (status = 404, description = "Problem not found")
    ))]
pub async fn get_problem_tags(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let tags = state.db.tags.get_for_problem(&slug).await?;
    Ok(Json(tags))
}

/// Tag a problem, creating the category if needed.
#[utoipa::path(post, path = "/api/v1/problems/{slug}/tags", tag = "Tags",
    params(("slug" = String, Path, description = "Problem slug")),
    request_body = AddTagRequest,
    responses(
        (status = 201, description = "Tagged", body = Category),
        (status = 400, description = "Empty or overlong name"),
        (status = 404, description = "Problem not found")
    ))]
pub async fn add_problem_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<AddTagRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state.db.tags.add_to_problem(&slug, &req.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Untag a problem. Removing the last category re-files the problem
/// under the uncategorized tag.
#[utoipa::path(delete, path = "/api/v1/problems/{slug}/tags/{tag_slug}", tag = "Tags",
    params(
        ("slug" = String, Path, description = "Problem slug"),
        ("tag_slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 204, description = "Untagged"),
        (status = 404, description = "Problem or category not found")
    ))]
pub async fn remove_problem_tag(
    State(state): State<AppState>,
    Path((slug, tag_slug)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.db.tags.remove_from_problem(&slug, &tag_slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
