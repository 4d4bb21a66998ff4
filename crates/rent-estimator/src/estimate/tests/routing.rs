use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;
use tower::ServiceExt;

use crate::estimate::router::{estimate_handler, record_handler, status_for};
use crate::estimate::{estimate_router, EstimateError, GatewayError, InputError};
use crate::features::{FeatureCategory, FeatureError};

#[tokio::test]
async fn estimate_route_returns_amount_and_record() {
    let (service, _) = build_service(FixedGateway::new(1180.0));
    let payload = json!({
        "location": {"state": "Bayern", "city": "München", "postal_code": "80331"},
        "living_space": 60.0,
        "rooms": 2.0,
        "floor": 1,
        "year_constructed": 2000,
        "features": {
            "heating": "Zentralheizung",
            "condition": "Gepflegt",
            "interior_quality": "Normal",
            "flat_type": "Etagenwohnung"
        },
        "amenities": {"balcony": true}
    });

    let response = estimate_router(service)
        .oneshot(
            Request::post("/api/v1/estimates")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["estimate"], 1180.0);
    assert_eq!(body["currency"], "EUR");
    assert_eq!(body["city"], "München");
    assert_eq!(body["record"]["geo_plz"], "80331");
    assert_eq!(body["record"]["balcony"], true);
    assert_eq!(body["record"]["yearConstructed_was_missing"], 0);
}

#[tokio::test]
async fn vocabulary_route_lists_categories_in_form_order() {
    let (service, _) = build_service(FixedGateway::new(0.0));

    let response = estimate_router(service)
        .oneshot(
            Request::get("/api/v1/vocabulary")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let categories = body["categories"].as_array().expect("categories");
    assert_eq!(categories.len(), 4);
    assert_eq!(categories[0]["category"], "heating");
    assert_eq!(categories[1]["entries"][0]["label"], "Gepflegt");
    assert_eq!(categories[1]["entries"][0]["code"], "well_kept");
}

#[tokio::test]
async fn record_handler_previews_without_calling_model() {
    let (service, gateway) = build_service(FixedGateway::new(0.0));
    let mut request = request();
    request.year_constructed = Some(0);

    let response = record_handler(State(service), Ok(axum::Json(request)))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["record"]["yearConstructed"], serde_json::Value::Null);
    assert_eq!(body["record"]["yearConstructed_was_missing"], 1);
    assert_eq!(body["dataframe_split"]["columns"][4], "regio1");
    assert_eq!(body["dataframe_split"]["data"][0][4], "Bayern");
    assert!(gateway.records().is_empty());
}

#[tokio::test]
async fn estimate_handler_maps_unknown_label_to_bad_request() {
    let (service, _) = build_service(FixedGateway::new(0.0));
    let mut request = request();
    request.features.flat_type = "Bungalow".to_string();

    let response = estimate_handler(State(service), Ok(axum::Json(request)))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(
        body["error"],
        "estimate error: unknown flat_type label 'Bungalow'"
    );
}

#[tokio::test]
async fn estimate_handler_maps_model_outage_to_service_unavailable() {
    let (service, _) = build_service(FailingGateway(GatewayError::ModelUnavailable(
        "connection refused".to_string(),
    )));

    let response = estimate_handler(State(service), Ok(axum::Json(request())))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn out_of_range_field_is_rejected_with_json_error() {
    let (service, gateway) = build_service(FixedGateway::new(0.0));
    let payload = json!({
        "location": {"state": "Bayern", "city": "München", "postal_code": "80331"},
        "living_space": 60.0,
        "rooms": 2.0,
        "floor": 1,
        "year_constructed": -5,
        "features": {
            "heating": "Zentralheizung",
            "condition": "Gepflegt",
            "interior_quality": "Normal",
            "flat_type": "Etagenwohnung"
        }
    });

    let response = estimate_router(service)
        .oneshot(
            Request::post("/api/v1/estimates")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let body = read_json_body(response).await;
    let message = body["error"].as_str().expect("error message");
    assert!(message.starts_with("invalid request body"), "{message}");
    assert!(message.contains("year_constructed"), "{message}");
    assert!(gateway.records().is_empty());
}

#[tokio::test]
async fn record_route_without_json_content_type_is_rejected_with_json_error() {
    let (service, _) = build_service(FixedGateway::new(0.0));

    let response = estimate_router(service)
        .oneshot(
            Request::post("/api/v1/estimates/record")
                .body(Body::from("{}"))
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .starts_with("invalid request body"));
}

#[test]
fn error_statuses_follow_failure_kind() {
    assert_eq!(
        status_for(&EstimateError::InvalidInput(InputError::RoomStep(2.25))),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        status_for(&EstimateError::LocationUnresolved("Berlin".to_string())),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        status_for(&EstimateError::Feature(FeatureError::UnknownLabel {
            category: FeatureCategory::Heating,
            label: "Kamin".to_string(),
        })),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_for(&EstimateError::LocationUnavailable("missing".to_string())),
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
        status_for(&EstimateError::Gateway(GatewayError::PredictionFailed(
            "bad".to_string()
        ))),
        StatusCode::BAD_GATEWAY
    );
}
