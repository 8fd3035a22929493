use crate::handlers::{self, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Request body cap for the API routes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the application router.
///
/// `/health` sits outside the rate limiter; everything under `/api` goes through it.
pub fn app(state: Arc<AppState>) -> anyhow::Result<Router> {
    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("invalid rate limiter configuration"))?,
    );

    let protected_routes = Router::new()
        .route("/api/v1/clients/check", post(handlers::check_client))
        .route("/api/v1/installments/check", post(handlers::check_installment))
        .route("/api/v1/obligations/check", post(handlers::check_obligation))
        .route(
            "/api/v1/installments/plan",
            post(handlers::plan_installment_schedule),
        )
        .route(
            "/api/v1/fiscal/reference-label",
            get(handlers::reference_label),
        )
        .route("/api/v1/fiscal/occurrences", get(handlers::next_occurrences))
        .route("/api/v1/fiscal/quarterly-due", get(handlers::quarterly_due))
        .route(
            "/api/v1/business-days/adjust",
            get(handlers::adjust_due_date),
        )
        .route(
            "/api/v1/documents/format",
            get(handlers::format_document_value),
        )
        .route(
            "/api/v1/recurrences/run",
            post(handlers::run_recurrence_job),
        )
        .layer(
            ServiceBuilder::new()
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Ok(app)
}
