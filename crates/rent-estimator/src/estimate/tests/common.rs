use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::estimate::{
    AmenityFlags, EstimateRequest, EstimateService, GatewayError, PredictionGateway,
    PredictionRecord,
};
use crate::features::{FeatureLabels, FeatureMapper};
use crate::location::{
    GeoIndex, GeoIndexError, LocationCatalog, LocationDefaults, LocationSelection,
};

pub(super) const GEO_DATA: &str = r#"{
    "Bayern": {"München": ["80331", "80333"], "Augsburg": ["86150"]},
    "Sachsen": {"Dresden": ["01067"]}
}"#;

pub(super) fn timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 9, 24)
        .expect("valid date")
        .and_hms_opt(12, 0, 0)
        .expect("valid time")
}

pub(super) fn catalog() -> Arc<LocationCatalog> {
    let index = GeoIndex::from_json_str(GEO_DATA).expect("geo data parses");
    Arc::new(LocationCatalog::new(index, LocationDefaults::default()))
}

pub(super) fn unavailable_catalog() -> Arc<LocationCatalog> {
    let error = GeoIndexError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "geo_data.json",
    ));
    Arc::new(LocationCatalog::unavailable(
        error,
        LocationDefaults::default(),
    ))
}

pub(super) fn labels() -> FeatureLabels {
    FeatureLabels {
        heating: "Zentralheizung".to_string(),
        condition: "Gepflegt".to_string(),
        interior_quality: "Normal".to_string(),
        flat_type: "Etagenwohnung".to_string(),
    }
}

pub(super) fn request() -> EstimateRequest {
    EstimateRequest {
        location: LocationSelection::new("Bayern", "München", "80331"),
        living_space: 60.0,
        rooms: 2.0,
        floor: 1,
        year_constructed: Some(2000),
        features: labels(),
        amenities: AmenityFlags::default(),
    }
}

/// Answers every record with a fixed estimate and remembers what it saw.
pub(super) struct FixedGateway {
    pub(super) value: f64,
    pub(super) seen: Mutex<Vec<PredictionRecord>>,
}

impl FixedGateway {
    pub(super) fn new(value: f64) -> Self {
        Self {
            value,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn records(&self) -> Vec<PredictionRecord> {
        self.seen.lock().expect("gateway mutex").clone()
    }
}

#[async_trait]
impl PredictionGateway for FixedGateway {
    async fn predict(&self, record: &PredictionRecord) -> Result<f64, GatewayError> {
        self.seen
            .lock()
            .expect("gateway mutex")
            .push(record.clone());
        Ok(self.value)
    }
}

pub(super) struct FailingGateway(pub(super) GatewayError);

#[async_trait]
impl PredictionGateway for FailingGateway {
    async fn predict(&self, _record: &PredictionRecord) -> Result<f64, GatewayError> {
        Err(self.0.clone())
    }
}

pub(super) fn build_service<G>(gateway: G) -> (Arc<EstimateService<G>>, Arc<G>)
where
    G: PredictionGateway + 'static,
{
    let gateway = Arc::new(gateway);
    let service = EstimateService::new(
        catalog(),
        FeatureMapper::standard().expect("vocabulary valid"),
        gateway.clone(),
    );
    (Arc::new(service), gateway)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
