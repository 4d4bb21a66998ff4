use super::common::*;
use std::sync::Arc;

use crate::estimate::{
    EstimateError, EstimateService, GatewayError, InputError, UnconfiguredGateway,
};
use crate::features::{FeatureCategory, FeatureError, FeatureMapper};
use crate::location::LocationSelection;

#[tokio::test]
async fn estimate_sends_built_record_and_returns_gateway_value() {
    let (service, gateway) = build_service(FixedGateway::new(1234.5));

    let estimate = service
        .estimate_at(&request(), timestamp())
        .await
        .expect("estimate");

    assert_eq!(estimate.estimate, 1234.5);
    assert_eq!(estimate.currency, "EUR");
    assert_eq!(estimate.city, "München");
    assert_eq!(estimate.living_space, 60.0);

    let records = gateway.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record, &estimate.record);
    assert_eq!(record.state, "Bayern");
    assert_eq!(record.postal_code, "80331");
    assert_eq!(record.condition, "well_kept");
    assert_eq!(record.flat_type, "apartment");
    assert_eq!(record.date, timestamp());
}

#[tokio::test]
async fn known_postal_code_overrides_state_and_city() {
    let (service, gateway) = build_service(FixedGateway::new(900.0));
    let mut request = request();
    request.location = LocationSelection::new("Sachsen", "Dresden", " 80333 ");

    service
        .estimate_at(&request, timestamp())
        .await
        .expect("estimate");

    let record = &gateway.records()[0];
    assert_eq!(record.state, "Bayern");
    assert_eq!(record.city, "München");
    assert_eq!(record.postal_code, "80333");
}

#[test]
fn missing_postal_code_is_derived_from_city() {
    let (service, _) = build_service(FixedGateway::new(0.0));
    let mut request = request();
    request.location = LocationSelection {
        state: Some("Bayern".to_string()),
        city: Some("Augsburg".to_string()),
        postal_code: Some("   ".to_string()),
    };

    let record = service.preview_at(&request, timestamp()).expect("record");
    assert_eq!(record.city, "Augsburg");
    assert_eq!(record.postal_code, "86150");
}

#[test]
fn unknown_postal_code_is_rejected() {
    let (service, _) = build_service(FixedGateway::new(0.0));
    let mut request = request();
    request.location.postal_code = Some("99999".to_string());

    match service.preview_at(&request, timestamp()) {
        Err(EstimateError::LocationUnresolved(message)) => assert!(message.contains("99999")),
        other => panic!("expected unresolved location, got {other:?}"),
    }
}

#[test]
fn unknown_state_is_unresolved() {
    let (service, _) = build_service(FixedGateway::new(0.0));
    let mut request = request();
    request.location = LocationSelection {
        state: Some("Berlin".to_string()),
        city: None,
        postal_code: None,
    };

    assert!(matches!(
        service.preview_at(&request, timestamp()),
        Err(EstimateError::LocationUnresolved(_))
    ));
}

#[tokio::test]
async fn invalid_numbers_never_reach_the_gateway() {
    let (service, gateway) = build_service(FixedGateway::new(0.0));
    let mut request = request();
    request.living_space = 0.0;

    let error = service
        .estimate_at(&request, timestamp())
        .await
        .expect_err("rejected");
    assert!(matches!(
        error,
        EstimateError::InvalidInput(InputError::OutOfRange {
            field: "living_space",
            ..
        })
    ));
    assert!(gateway.records().is_empty());
}

#[test]
fn unknown_label_names_its_category() {
    let (service, _) = build_service(FixedGateway::new(0.0));
    let mut request = request();
    request.features.condition = "Baufällig".to_string();

    match service.preview_at(&request, timestamp()) {
        Err(EstimateError::Feature(FeatureError::UnknownLabel { category, label })) => {
            assert_eq!(category, FeatureCategory::Condition);
            assert_eq!(label, "Baufällig");
        }
        other => panic!("expected unknown label, got {other:?}"),
    }
}

#[test]
fn unknown_year_is_sent_as_missing() {
    let (service, _) = build_service(FixedGateway::new(0.0));
    let mut request = request();
    request.year_constructed = Some(0);

    let record = service.preview_at(&request, timestamp()).expect("record");
    assert!(record.year_constructed.is_none());
    assert!(record.year_constructed_was_missing);
}

#[tokio::test]
async fn gateway_errors_are_passed_through() {
    let (service, _) = build_service(FailingGateway(GatewayError::PredictionFailed(
        "schema mismatch".to_string(),
    )));

    let error = service
        .estimate_at(&request(), timestamp())
        .await
        .expect_err("gateway failure");
    assert!(matches!(
        error,
        EstimateError::Gateway(GatewayError::PredictionFailed(_))
    ));
}

#[tokio::test]
async fn non_finite_estimate_is_a_prediction_failure() {
    let (service, _) = build_service(FixedGateway::new(f64::NAN));

    let error = service
        .estimate_at(&request(), timestamp())
        .await
        .expect_err("nan rejected");
    assert!(matches!(
        error,
        EstimateError::Gateway(GatewayError::PredictionFailed(_))
    ));
}

#[tokio::test]
async fn unconfigured_model_reports_unavailable() {
    let (service, _) = build_service(UnconfiguredGateway);

    let error = service
        .estimate_at(&request(), timestamp())
        .await
        .expect_err("no model");
    assert!(matches!(
        error,
        EstimateError::Gateway(GatewayError::ModelUnavailable(_))
    ));
}

#[test]
fn missing_geo_data_is_a_configuration_error() {
    let service = EstimateService::new(
        unavailable_catalog(),
        FeatureMapper::standard().expect("vocabulary valid"),
        Arc::new(FixedGateway::new(0.0)),
    );

    match service.preview_at(&request(), timestamp()) {
        Err(EstimateError::LocationUnavailable(reason)) => {
            assert!(reason.contains("geo data unavailable"))
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}
