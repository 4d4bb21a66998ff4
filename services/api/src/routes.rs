use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use rent_estimator::estimate::{estimate_router, EstimateService, PredictionGateway};
use rent_estimator::location::{location_router, LocationCatalog};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<G>(
    catalog: Arc<LocationCatalog>,
    service: Arc<EstimateService<G>>,
) -> axum::Router
where
    G: PredictionGateway + 'static,
{
    location_router(catalog)
        .merge(estimate_router(service))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if let Some(reason) = state.catalog.unavailable_reason() {
        let payload = json!({
            "status": "configuration_error",
            "detail": reason,
        });
        return (StatusCode::SERVICE_UNAVAILABLE, Json(payload));
    }

    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
