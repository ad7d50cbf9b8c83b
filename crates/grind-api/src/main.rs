//! grind-api - HTTP API server for grind

mod handlers;

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use governor::{Quota, RateLimiter};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use grind_core::defaults;
use grind_db::{log_pool_metrics, Database};
use grind_inference::ProviderRegistry;

use handlers::{
    analytics::learning_analytics,
    enhance::enhance_problem,
    problems::{
        adjacent_problems, get_problem, list_problems, search_problems, update_problem,
        update_problem_status,
    },
    tags::{
        add_problem_tag, bulk_add_tag, create_tag, delete_tag, get_problem_tags, list_tags,
        remove_problem_tag, rename_tag, tag_counts,
    },
};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so request ids sort chronologically
/// in logs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Global rate limiter type (direct quota, no keyed bucketing for a
/// personal server).
type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    db: Database,
    /// Inference providers for problem enhancement.
    providers: Arc<ProviderRegistry>,
    /// Global rate limiter (None if rate limiting is disabled).
    rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

// =============================================================================
// OPENAPI
// =============================================================================

/// OpenAPI documentation derived from the handler annotations.
///
/// Swagger UI at `/docs` loads the generated document from `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Grind API",
        version = "0.4.0",
        description = "LeetCode solutions knowledge base with tagging, learning progress tracking, and AI enhancement"
    ),
    paths(
        health_check,
        rate_limit_status,
        handlers::problems::list_problems,
        handlers::problems::search_problems,
        handlers::problems::adjacent_problems,
        handlers::problems::get_problem,
        handlers::problems::update_problem,
        handlers::problems::update_problem_status,
        handlers::tags::list_tags,
        handlers::tags::create_tag,
        handlers::tags::tag_counts,
        handlers::tags::rename_tag,
        handlers::tags::delete_tag,
        handlers::tags::bulk_add_tag,
        handlers::tags::get_problem_tags,
        handlers::tags::add_problem_tag,
        handlers::tags::remove_problem_tag,
        handlers::analytics::learning_analytics,
        handlers::enhance::enhance_problem,
    ),
    components(schemas(
        grind_core::Difficulty,
        grind_core::LearningStatus,
        grind_core::Problem,
        grind_core::ProblemSummary,
        grind_core::ProblemDetail,
        grind_core::ProblemPage,
        grind_core::Category,
        grind_core::CategoryWithCount,
        grind_core::NeighborRef,
        grind_core::AdjacentProblems,
        grind_core::StatusBuckets,
        grind_core::LearningAnalytics,
        grind_core::BulkAddOutcome,
        grind_core::EnhancedProblem,
        handlers::problems::UpdateProblemRequest,
        handlers::problems::UpdateStatusRequest,
        handlers::tags::CreateTagRequest,
        handlers::tags::RenameTagRequest,
        handlers::tags::AddTagRequest,
        handlers::tags::BulkAddRequest,
        handlers::enhance::EnhanceRequest,
    )),
    tags(
        (name = "Problems", description = "Problem listing, navigation, and content"),
        (name = "Tags", description = "Category management"),
        (name = "Analytics", description = "Learning progress breakdown"),
        (name = "Enhance", description = "AI content enhancement"),
        (name = "System", description = "Health checks and rate limit status")
    )
)]
struct ApiDoc;

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Parse allowed origins from the comma-separated `ALLOWED_ORIGINS` variable.
///
/// Defaults to the local dev frontends when unset or empty. Entries that
/// do not parse as header values are skipped with a warning.
fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str = std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    if origins_str.trim().is_empty() {
        return vec![
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ];
    }

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "grind_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "grind_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("grind-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            } else {
                layer = layer.with_ansi(false); // no ANSI in files
            }
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // Get configuration from environment
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/grind".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| defaults::SERVER_PORT.to_string())
        .parse()
        .unwrap_or(defaults::SERVER_PORT);

    // Rate limiting configuration (off by default for a personal server)
    // RATE_LIMIT_REQUESTS: requests per period (default: 100)
    // RATE_LIMIT_PERIOD_SECS: period in seconds (default: 60 = 1 minute)
    let rate_limit_requests: u64 = std::env::var("RATE_LIMIT_REQUESTS")
        .unwrap_or_else(|_| defaults::RATE_LIMIT_REQUESTS.to_string())
        .parse()
        .unwrap_or(defaults::RATE_LIMIT_REQUESTS);
    let rate_limit_period_secs: u64 = std::env::var("RATE_LIMIT_PERIOD_SECS")
        .unwrap_or_else(|_| defaults::RATE_LIMIT_PERIOD_SECS.to_string())
        .parse()
        .unwrap_or(defaults::RATE_LIMIT_PERIOD_SECS);
    let rate_limit_enabled: bool = std::env::var("RATE_LIMIT_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    info!(
        "Rate limiting: {} ({} requests per {} seconds)",
        if rate_limit_enabled {
            "enabled"
        } else {
            "disabled"
        },
        rate_limit_requests,
        rate_limit_period_secs
    );

    // Connect to database
    info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;
    info!("Database connected");
    log_pool_metrics(db.pool());

    // Run pending database migrations on startup
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // Configure inference providers for enhancement
    let providers = Arc::new(ProviderRegistry::from_env());

    // Create rate limiter if enabled
    let rate_limiter = if rate_limit_enabled {
        let quota = Quota::with_period(std::time::Duration::from_secs(rate_limit_period_secs))
            .expect("Rate limit period must be non-zero")
            .allow_burst(
                NonZeroU32::new(rate_limit_requests as u32).expect("Rate limit must be non-zero"),
            );
        Some(Arc::new(RateLimiter::direct(quota)))
    } else {
        None
    };

    // Create app state
    let state = AppState {
        db,
        providers,
        rate_limiter,
    };

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // OpenAPI / Swagger UI
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        // Problem catalog
        .route("/api/v1/problems", get(list_problems))
        .route("/api/v1/problems/search", get(search_problems))
        .route("/api/v1/problems/adjacent", get(adjacent_problems))
        .route(
            "/api/v1/problems/:slug",
            get(get_problem).patch(update_problem),
        )
        .route("/api/v1/problems/:slug/status", put(update_problem_status))
        .route("/api/v1/problems/:slug/enhance", post(enhance_problem))
        .route(
            "/api/v1/problems/:slug/tags",
            get(get_problem_tags).post(add_problem_tag),
        )
        .route(
            "/api/v1/problems/:slug/tags/:tag_slug",
            delete(remove_problem_tag),
        )
        // Categories
        .route("/api/v1/tags", get(list_tags).post(create_tag))
        .route("/api/v1/tags/counts", get(tag_counts))
        .route("/api/v1/tags/:slug", patch(rename_tag).delete(delete_tag))
        .route("/api/v1/tags/:slug/problems", post(bulk_add_tag))
        // Learning analytics
        .route("/api/v1/analytics", get(learning_analytics))
        // Rate limiting status endpoint
        .route("/api/v1/rate-limit/status", get(rate_limit_status))
        // Middleware
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer({
            let allowed_origins = parse_allowed_origins();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(defaults::CORS_MAX_AGE_SECS))
        })
        .layer(RequestBodyLimitLayer::new(defaults::MAX_BODY_SIZE_BYTES))
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// =============================================================================
// RATE LIMITING MIDDLEWARE
// =============================================================================

async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    // If rate limiting is disabled, pass through
    if let Some(limiter) = &state.rate_limiter {
        // Check rate limit
        if limiter.check().is_err() {
            tracing::warn!("Rate limit exceeded");
            return Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "error": "rate_limit_exceeded",
                    "error_description": "Too many requests. Please wait before retrying."
                })),
            ));
        }
    }
    Ok(next.run(request).await)
}

/// Get rate limiting status.
#[utoipa::path(get, path = "/api/v1/rate-limit/status", tag = "System",
    responses((status = 200, description = "Whether rate limiting is active")))]
async fn rate_limit_status(State(state): State<AppState>) -> impl IntoResponse {
    if let Some(_limiter) = &state.rate_limiter {
        Json(serde_json::json!({
            "enabled": true,
            "message": "Rate limiting is active"
        }))
    } else {
        Json(serde_json::json!({
            "enabled": false,
            "message": "Rate limiting is disabled"
        }))
    }
}

// =============================================================================
// HEALTH CHECK
// =============================================================================

#[utoipa::path(get, path = "/health", tag = "System",
    responses((status = 200, description = "Service is up")))]
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
enum ApiError {
    Database(grind_core::Error),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Upstream(String),
}

impl From<grind_core::Error> for ApiError {
    fn from(err: grind_core::Error) -> Self {
        match &err {
            grind_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            grind_core::Error::ProblemNotFound(_) | grind_core::Error::CategoryNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            grind_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            grind_core::Error::Inference(_)
            | grind_core::Error::Config(_)
            | grind_core::Error::Request(_) => ApiError::Upstream(err.to_string()),
            grind_core::Error::Database(sqlx_err) => {
                let msg = sqlx_err.to_string();
                if msg.contains("duplicate key") || msg.contains("unique constraint") {
                    // Provide user-friendly error messages for known constraints
                    let friendly_msg = if msg.contains("category_name_key")
                        || msg.contains("category_slug_key")
                    {
                        "A tag with this name already exists".to_string()
                    } else if msg.contains("problem_leetcode_id_key") {
                        "A problem with this LeetCode id already exists".to_string()
                    } else {
                        msg
                    };
                    return ApiError::Conflict(friendly_msg);
                }
                ApiError::Database(err)
            }
            _ => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_error(msg: &str) -> grind_core::Error {
        grind_core::Error::Database(sqlx::Error::Protocol(msg.to_string()))
    }

    // -- Error mapping --

    #[test]
    fn test_api_error_maps_not_found_variants() {
        let err: ApiError = grind_core::Error::ProblemNotFound("two-sum".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg.contains("two-sum")));

        let err: ApiError = grind_core::Error::CategoryNotFound("array".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = grind_core::Error::NotFound("gone".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg == "gone"));
    }

    #[test]
    fn test_api_error_maps_invalid_input_to_bad_request() {
        let err: ApiError = grind_core::Error::InvalidInput("empty tag name".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(ref msg) if msg == "empty tag name"));
    }

    #[test]
    fn test_api_error_maps_provider_failures_to_upstream() {
        for core_err in [
            grind_core::Error::Inference("unparsable reply".to_string()),
            grind_core::Error::Config("GEMINI_API_KEY is not configured".to_string()),
            grind_core::Error::Request("connect timeout".to_string()),
        ] {
            let err: ApiError = core_err.into();
            assert!(matches!(err, ApiError::Upstream(_)));
        }
    }

    #[test]
    fn test_api_error_duplicate_tag_reads_friendly() {
        let err: ApiError =
            db_error("duplicate key value violates unique constraint \"category_name_key\"")
                .into();
        match err {
            ApiError::Conflict(msg) => assert_eq!(msg, "A tag with this name already exists"),
            other => panic!("Expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_api_error_duplicate_leetcode_id_reads_friendly() {
        let err: ApiError =
            db_error("duplicate key value violates unique constraint \"problem_leetcode_id_key\"")
                .into();
        match err {
            ApiError::Conflict(msg) => {
                assert_eq!(msg, "A problem with this LeetCode id already exists")
            }
            other => panic!("Expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_api_error_unknown_duplicate_passes_message_through() {
        let err: ApiError = db_error(
            "duplicate key value violates unique constraint \"problem_category_problem_id_category_id_key\"",
        )
        .into();
        assert!(matches!(err, ApiError::Conflict(ref msg) if msg.contains("problem_category")));
    }

    #[test]
    fn test_api_error_other_database_errors_stay_internal() {
        let err: ApiError = db_error("connection reset by peer").into();
        assert!(matches!(err, ApiError::Database(_)));
    }

    #[test]
    fn test_api_error_response_statuses() {
        let cases = vec![
            (ApiError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (
                ApiError::BadRequest("x".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Conflict("x".to_string()), StatusCode::CONFLICT),
            (ApiError::Upstream("x".to_string()), StatusCode::BAD_GATEWAY),
            (
                ApiError::Database(grind_core::Error::Internal("x".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    // -- Request IDs --

    #[test]
    fn test_request_id_is_time_ordered_uuid() {
        let mut maker = MakeRequestUuidV7;
        let req = axum::http::Request::builder().body(()).unwrap();
        let id = maker.make_request_id(&req).unwrap();
        let parsed = Uuid::parse_str(id.header_value().to_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }

    // -- CORS origins --

    #[test]
    fn test_parse_allowed_origins_filters_invalid_entries() {
        std::env::set_var(
            "ALLOWED_ORIGINS",
            "http://localhost:5173,, \u{7f}bad ,http://app.example.com",
        );
        let origins = parse_allowed_origins();
        std::env::remove_var("ALLOWED_ORIGINS");

        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], HeaderValue::from_static("http://localhost:5173"));
        assert_eq!(
            origins[1],
            HeaderValue::from_static("http://app.example.com")
        );
    }

    // -- Health --

    #[tokio::test]
    async fn test_health_endpoint_reports_ok() {
        use tower::util::ServiceExt;

        let app = Router::new().route("/health", get(health_check));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());
    }

    // -- Routes --

    fn test_state(db: grind_db::Database) -> AppState {
        AppState {
            db,
            providers: Arc::new(ProviderRegistry::new("gemini".to_string())),
            rate_limiter: None,
        }
    }

    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        use tower::util::ServiceExt;

        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                axum::body::Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => axum::body::Body::empty(),
        };
        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_adjacent_route_requires_leetcode_id() {
        // connect_lazy never opens a connection, and the request fails
        // validation before touching the pool.
        let pool = sqlx::PgPool::connect_lazy("postgres://localhost/unreachable").unwrap();
        let app = Router::new()
            .route("/api/v1/problems/adjacent", get(adjacent_problems))
            .with_state(test_state(grind_db::Database::new(pool)));

        let (status, json) = send(app, Method::GET, "/api/v1/problems/adjacent", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "leetcode_id is required");
    }

    #[tokio::test]
    #[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
    async fn test_list_problems_route_paginates() {
        use grind_db::test_fixtures::{seed_problem_ladder, TestDatabase};

        let test_db = TestDatabase::new().await;
        seed_problem_ladder(&test_db.db, 15).await;

        let app = Router::new()
            .route("/api/v1/problems", get(list_problems))
            .with_state(test_state(test_db.db.clone()));

        let (status, json) =
            send(app, Method::GET, "/api/v1/problems?page=2&limit=10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 15);
        assert_eq!(json["page"], 2);
        let problems = json["problems"].as_array().unwrap();
        assert_eq!(problems.len(), 5);
        assert_eq!(problems[0]["leetcode_id"], 11);

        test_db.cleanup().await;
    }

    #[tokio::test]
    #[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
    async fn test_problem_detail_route_includes_tags() {
        use grind_db::test_fixtures::{seed_minimal_data, TestDatabase};

        let test_db = TestDatabase::new().await;
        seed_minimal_data(&test_db.db).await;

        let app = Router::new()
            .route("/api/v1/problems/:slug", get(get_problem))
            .with_state(test_state(test_db.db.clone()));

        let (status, json) = send(app.clone(), Method::GET, "/api/v1/problems/two-sum", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["problem"]["slug"], "two-sum");
        assert_eq!(json["categories"][0], "Array");

        let (status, json) = send(app, Method::GET, "/api/v1/problems/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("missing"));

        test_db.cleanup().await;
    }

    #[tokio::test]
    #[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
    async fn test_create_tag_route_is_idempotent() {
        use grind_db::test_fixtures::TestDatabase;

        let test_db = TestDatabase::new().await;
        let app = Router::new()
            .route("/api/v1/tags", get(list_tags).post(create_tag))
            .with_state(test_state(test_db.db.clone()));

        let body = serde_json::json!({"name": "Dynamic Programming"});
        let (status, json) = send(
            app.clone(),
            Method::POST,
            "/api/v1/tags",
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["slug"], "dynamic-programming");
        let first_id = json["id"].as_str().unwrap().to_string();

        // Same name again returns the existing row, not a conflict
        let (status, json) = send(
            app.clone(),
            Method::POST,
            "/api/v1/tags",
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["id"].as_str().unwrap(), first_id);

        let (_, json) = send(app, Method::GET, "/api/v1/tags", None).await;
        assert_eq!(json.as_array().unwrap().len(), 1);

        test_db.cleanup().await;
    }

    #[tokio::test]
    #[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
    async fn test_status_route_updates_learning_progress() {
        use grind_db::test_fixtures::{seed_minimal_data, TestDatabase};

        let test_db = TestDatabase::new().await;
        seed_minimal_data(&test_db.db).await;

        let app = Router::new()
            .route("/api/v1/problems/:slug", get(get_problem))
            .route("/api/v1/problems/:slug/status", put(update_problem_status))
            .route("/api/v1/analytics", get(learning_analytics))
            .with_state(test_state(test_db.db.clone()));

        let (status, _) = send(
            app.clone(),
            Method::PUT,
            "/api/v1/problems/two-sum/status",
            Some(serde_json::json!({"status": "Mastered"})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, json) = send(app.clone(), Method::GET, "/api/v1/problems/two-sum", None).await;
        assert_eq!(json["problem"]["learning_status"], "Mastered");

        let (status, json) = send(app, Method::GET, "/api/v1/analytics", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 2);
        assert_eq!(json["counts"]["Mastered"], 1);
        assert_eq!(json["counts"]["To Do"], 1);
        assert_eq!(json["percentages"]["Mastered"], 50);

        test_db.cleanup().await;
    }

    #[tokio::test]
    #[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
    async fn test_remove_last_tag_route_falls_back_to_uncategorized() {
        use grind_db::test_fixtures::{seed_minimal_data, TestDatabase};

        let test_db = TestDatabase::new().await;
        seed_minimal_data(&test_db.db).await;

        let app = Router::new()
            .route("/api/v1/problems/:slug/tags", get(get_problem_tags))
            .route(
                "/api/v1/problems/:slug/tags/:tag_slug",
                delete(remove_problem_tag),
            )
            .with_state(test_state(test_db.db.clone()));

        let (status, _) = send(
            app.clone(),
            Method::DELETE,
            "/api/v1/problems/two-sum/tags/array",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, json) = send(app, Method::GET, "/api/v1/problems/two-sum/tags", None).await;
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Uncategorized"]);

        test_db.cleanup().await;
    }

    #[tokio::test]
    #[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
    async fn test_bulk_add_route_reports_added_and_found() {
        use grind_db::test_fixtures::{seed_minimal_data, TestDatabase};

        let test_db = TestDatabase::new().await;
        seed_minimal_data(&test_db.db).await;

        let app = Router::new()
            .route("/api/v1/tags/:slug/problems", post(bulk_add_tag))
            .with_state(test_state(test_db.db.clone()));

        // Problem 1 already carries Array; problem 2 gets it; id 99 does
        // not exist and only lowers total_found.
        let (status, json) = send(
            app.clone(),
            Method::POST,
            "/api/v1/tags/array/problems",
            Some(serde_json::json!({"leetcode_ids": [1, 2, 99]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["added_count"], 1);
        assert_eq!(json["total_found"], 2);

        let (status, _) = send(
            app,
            Method::POST,
            "/api/v1/tags/two-pointers/problems",
            Some(serde_json::json!({"leetcode_ids": [1]})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        test_db.cleanup().await;
    }
}
