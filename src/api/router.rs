//! HTTP router.
//!
//! All routes live under `/api`. Everything except the banner, health,
//! signup/login and the PDF export requires bearer token authentication.
//! Uploaded media is served statically under `/media`.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::state::AppState;

/// Build the full application router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost
/// layer); endpoint handlers use `State<ApiContext>` via `with_state`.
pub fn api_router(state: Arc<AppState>) -> Router {
    let ctx = ApiContext::new(state.clone());

    let protected = Router::new()
        .route("/patients", get(endpoints::patients::list))
        .route("/patients/:id/metrics", get(endpoints::patients::metrics))
        .route("/vitals/:patient_id", get(endpoints::vitals::latest))
        .route(
            "/vitals/:patient_id/update",
            post(endpoints::vitals::push),
        )
        .route(
            "/assessments/speech/analyze",
            post(endpoints::assessments::speech),
        )
        .route(
            "/assessments/drawing/analyze",
            post(endpoints::assessments::drawing),
        )
        .route(
            "/assessments/recall/generate",
            get(endpoints::assessments::recall_generate),
        )
        .route(
            "/assessments/recall/evaluate",
            post(endpoints::assessments::recall_evaluate),
        )
        .route(
            "/assessments/history/:patient_id",
            get(endpoints::assessments::history),
        )
        .route("/agitation/predict", post(endpoints::agitation::predict))
        .route(
            "/agitation/patterns/:patient_id",
            get(endpoints::agitation::patterns),
        )
        .route("/agitation/:patient_id/log", post(endpoints::agitation::log))
        .route("/memoryscape/upload", post(endpoints::memoryscape::upload))
        .route("/memoryscape/analyze", post(endpoints::memoryscape::analyze))
        .route(
            "/memoryscape/generate-session",
            post(endpoints::memoryscape::generate_session),
        )
        .route(
            "/narratives/generate",
            post(endpoints::sessions::generate_narrative),
        )
        .route("/sessions/config", post(endpoints::sessions::configure))
        .route("/sessions/:id/play", get(endpoints::sessions::play))
        .route("/family/:patient_id", get(endpoints::family::members))
        .route("/family/invite", post(endpoints::family::invite))
        .route(
            "/family/activity/:patient_id",
            get(endpoints::family::activity_feed),
        )
        .route(
            "/clinician/report/:patient_id",
            get(endpoints::clinician::clinical_report),
        )
        .route(
            "/export/csv/:patient_id",
            get(endpoints::clinician::export_csv),
        )
        .route(
            "/clinician/analytics/compare",
            post(endpoints::clinician::compare_periods),
        )
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        // Extension must be outermost so the auth middleware can extract it.
        .layer(axum::Extension(ctx.clone()));

    let unprotected = Router::new()
        .route("/", get(endpoints::health::banner))
        .route("/health", get(endpoints::health::health))
        .route("/auth/signup", post(endpoints::auth::signup))
        .route("/auth/login", post(endpoints::auth::login))
        // PDF export stays tokenless so the link opens from a plain
        // browser tab.
        .route(
            "/export/pdf/:patient_id",
            get(endpoints::clinician::export_pdf),
        )
        .with_state(ctx);

    Router::new()
        .nest("/api", protected)
        .nest("/api/", unprotected)
        .nest_service(
            "/media",
            ServeDir::new(state.settings.data_dir.join("media")),
        )
        .layer(CorsLayer::permissive())
}
