//! AI enhancement HTTP handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{ApiError, AppState};
use grind_core::{EnhancedProblem, GenerationBackend, ProblemRepository};

/// Request body selecting the provider for enhancement.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct EnhanceRequest {
    /// Provider id ("gemini" or "zai"); omitted selects the default
    pub provider: Option<String>,
}

/// Regenerate the description and solution of a problem with an LLM.
///
/// The generated content is written back to the problem before the
/// response is returned.
#[utoipa::path(post, path = "/api/v1/problems/{slug}/enhance", tag = "Enhance",
    params(("slug" = String, Path, description = "Problem slug")),
    request_body = EnhanceRequest,
    responses(
        (status = 200, description = "Enhanced content", body = EnhancedProblem),
        (status = 404, description = "Problem not found"),
        (status = 502, description = "Provider unreachable or reply unparsable")
    ))]
pub async fn enhance_problem(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    body: Option<Json<EnhanceRequest>>,
) -> Result<Json<EnhancedProblem>, ApiError> {
    let provider = body.and_then(|Json(req)| req.provider);

    let detail = state
        .db
        .problems
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Problem '{}' not found", slug)))?;

    let backend: Box<dyn GenerationBackend> = state.providers.resolve(provider.as_deref())?;
    info!(slug = %slug, model = %backend.model_name(), "Enhancing problem");

    let enhanced =
        grind_inference::enhance_problem(backend.as_ref(), &detail.problem.title).await?;
    state
        .db
        .problems
        .update_content(&slug, Some(&enhanced.description), Some(&enhanced.solution))
        .await?;

    Ok(Json(enhanced))
}
