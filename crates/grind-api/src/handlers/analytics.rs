//! Learning analytics HTTP handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{ApiError, AppState};
use grind_core::{AnalyticsRepository, LearningAnalytics};

/// Query parameters for the learning breakdown.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    /// Restrict the breakdown to problems tagged with this category slug
    pub tag: Option<String>,
}

/// Learning-status breakdown with rounded integer percentages.
///
/// Counts and percentages cover all three statuses and are all zero
/// when no problems match.
#[utoipa::path(get, path = "/api/v1/analytics", tag = "Analytics",
    params(AnalyticsQuery),
    responses((status = 200, description = "Counts and percentages per status", body = LearningAnalytics)))]
pub async fn learning_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<LearningAnalytics>, ApiError> {
    let analytics = state
        .db
        .analytics
        .learning_breakdown(query.tag.as_deref())
        .await?;
    Ok(Json(analytics))
}
