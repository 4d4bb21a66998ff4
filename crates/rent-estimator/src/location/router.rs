use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::resolver::{LocationSelection, LocationTrigger, Resolution, ResolutionOutcome};
use super::LocationCatalog;
use crate::error::AppError;

/// Router exposing the location hierarchy and the selection resolver.
pub fn location_router(catalog: Arc<LocationCatalog>) -> Router {
    Router::new()
        .route("/api/v1/locations/states", get(states_handler))
        .route(
            "/api/v1/locations/states/:state/cities",
            get(cities_handler),
        )
        .route(
            "/api/v1/locations/states/:state/cities/:city/postal-codes",
            get(postal_codes_handler),
        )
        .route(
            "/api/v1/locations/postal-codes/:code",
            get(postal_code_lookup_handler),
        )
        .route("/api/v1/locations/default", get(default_selection_handler))
        .route("/api/v1/locations/resolve", post(resolve_handler))
        .with_state(catalog)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResolveRequest {
    #[serde(default)]
    pub(crate) selection: LocationSelection,
    #[serde(default)]
    pub(crate) trigger: Option<LocationTrigger>,
}

#[derive(Debug, Serialize)]
struct SelectionView<'a> {
    selection: LocationSelection,
    outcome: ResolutionOutcome,
    cities: Vec<&'a str>,
    postal_codes: Vec<&'a str>,
}

impl<'a> SelectionView<'a> {
    fn from_resolution(catalog: &'a LocationCatalog, resolution: Resolution) -> Self {
        let resolver = catalog.resolver();
        let cities = resolver.cities(&resolution.selection);
        let postal_codes = resolver.postal_codes(&resolution.selection);
        Self {
            selection: resolution.selection,
            outcome: resolution.outcome,
            cities,
            postal_codes,
        }
    }
}

fn configuration_error(catalog: &LocationCatalog) -> Option<Response> {
    catalog.unavailable_reason().map(|reason| {
        let payload = json!({
            "error": "configuration error",
            "detail": reason,
        });
        (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
    })
}

pub(crate) async fn states_handler(State(catalog): State<Arc<LocationCatalog>>) -> Response {
    if let Some(response) = configuration_error(&catalog) {
        return response;
    }

    let states = catalog.index().states_ordered();
    (StatusCode::OK, Json(json!({ "states": states }))).into_response()
}

pub(crate) async fn cities_handler(
    State(catalog): State<Arc<LocationCatalog>>,
    Path(state): Path<String>,
) -> Response {
    if let Some(response) = configuration_error(&catalog) {
        return response;
    }

    let cities = catalog.index().cities_of(&state);
    (
        StatusCode::OK,
        Json(json!({ "state": state, "cities": cities })),
    )
        .into_response()
}

pub(crate) async fn postal_codes_handler(
    State(catalog): State<Arc<LocationCatalog>>,
    Path((state, city)): Path<(String, String)>,
) -> Response {
    if let Some(response) = configuration_error(&catalog) {
        return response;
    }

    let postal_codes = catalog.index().postal_codes_of(&state, &city);
    (
        StatusCode::OK,
        Json(json!({
            "state": state,
            "city": city,
            "postal_codes": postal_codes,
        })),
    )
        .into_response()
}

pub(crate) async fn postal_code_lookup_handler(
    State(catalog): State<Arc<LocationCatalog>>,
    Path(code): Path<String>,
) -> Response {
    if let Some(response) = configuration_error(&catalog) {
        return response;
    }

    match catalog.index().lookup_by_postal_code(&code) {
        Some(location) => (
            StatusCode::OK,
            Json(json!({
                "postal_code": code.trim(),
                "city": location.city,
                "state": location.state,
            })),
        )
            .into_response(),
        None => {
            let payload = json!({
                "error": "postal code not found",
                "postal_code": code,
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn default_selection_handler(
    State(catalog): State<Arc<LocationCatalog>>,
) -> Response {
    if let Some(response) = configuration_error(&catalog) {
        return response;
    }

    let resolution = catalog.initial_selection();
    let view = SelectionView::from_resolution(&catalog, resolution);
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn resolve_handler(
    State(catalog): State<Arc<LocationCatalog>>,
    payload: Result<Json<ResolveRequest>, JsonRejection>,
) -> Response {
    if let Some(response) = configuration_error(&catalog) {
        return response;
    }
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return AppError::from(rejection).into_response(),
    };

    let resolver = catalog.resolver();
    let resolution = match &request.trigger {
        Some(trigger) => resolver.apply(&request.selection, trigger),
        None => resolver.reconcile(&request.selection),
    };
    let view = SelectionView::from_resolution(&catalog, resolution);
    (StatusCode::OK, Json(view)).into_response()
}
