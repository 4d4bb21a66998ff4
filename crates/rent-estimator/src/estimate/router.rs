use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use super::gateway::{GatewayError, PredictionGateway};
use super::service::{Estimate, EstimateError, EstimateRequest, EstimateService};
use crate::error::AppError;

/// Router builder exposing the feature vocabulary and the estimate endpoints.
pub fn estimate_router<G>(service: Arc<EstimateService<G>>) -> Router
where
    G: PredictionGateway + 'static,
{
    Router::new()
        .route("/api/v1/vocabulary", get(vocabulary_handler::<G>))
        .route("/api/v1/estimates", post(estimate_handler::<G>))
        .route("/api/v1/estimates/record", post(record_handler::<G>))
        .with_state(service)
}

pub(crate) async fn vocabulary_handler<G>(
    State(service): State<Arc<EstimateService<G>>>,
) -> Response
where
    G: PredictionGateway + 'static,
{
    let categories = service.mapper().vocabulary();
    (
        StatusCode::OK,
        axum::Json(json!({ "categories": categories })),
    )
        .into_response()
}

pub(crate) async fn estimate_handler<G>(
    State(service): State<Arc<EstimateService<G>>>,
    payload: Result<axum::Json<EstimateRequest>, JsonRejection>,
) -> Result<axum::Json<Estimate>, AppError>
where
    G: PredictionGateway + 'static,
{
    let axum::Json(request) = payload?;
    let estimate = service.estimate(&request).await?;
    Ok(axum::Json(estimate))
}

/// Returns the record that would be sent to the model, without calling it.
pub(crate) async fn record_handler<G>(
    State(service): State<Arc<EstimateService<G>>>,
    payload: Result<axum::Json<EstimateRequest>, JsonRejection>,
) -> Result<axum::Json<Value>, AppError>
where
    G: PredictionGateway + 'static,
{
    let axum::Json(request) = payload?;
    let record = service.preview_at(&request, chrono::Local::now().naive_local())?;
    Ok(axum::Json(json!({
        "record": record,
        "dataframe_split": record.dataframe_split(),
    })))
}

pub(crate) fn status_for(error: &EstimateError) -> StatusCode {
    match error {
        EstimateError::InvalidInput(_) | EstimateError::LocationUnresolved(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EstimateError::Feature(_) => StatusCode::BAD_REQUEST,
        EstimateError::LocationUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        EstimateError::Gateway(GatewayError::ModelUnavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        EstimateError::Gateway(GatewayError::PredictionFailed(_)) => StatusCode::BAD_GATEWAY,
    }
}
