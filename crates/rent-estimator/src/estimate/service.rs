use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::gateway::{GatewayError, PredictionGateway};
use super::inputs::{AmenityFlags, InputError, NumericInputs};
use super::record::{PredictionRecord, RecordBuilder};
use crate::features::{FeatureError, FeatureLabels, FeatureMapper};
use crate::location::{LocationCatalog, LocationSelection, ResolutionOutcome, ResolvedLocation};

/// Everything the form submits for one estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    #[serde(default)]
    pub location: LocationSelection,
    pub living_space: f64,
    pub rooms: f64,
    pub floor: i32,
    #[serde(default)]
    pub year_constructed: Option<u16>,
    pub features: FeatureLabels,
    #[serde(default)]
    pub amenities: AmenityFlags,
}

impl EstimateRequest {
    pub fn numeric(&self) -> NumericInputs {
        NumericInputs {
            living_space: self.living_space,
            rooms: self.rooms,
            floor: self.floor,
            year_constructed: self.year_constructed,
        }
    }
}

/// Estimated cold rent together with the record it was computed from.
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub estimate: f64,
    pub currency: &'static str,
    pub living_space: f64,
    pub city: String,
    pub record: PredictionRecord,
}

#[derive(Debug, thiserror::Error)]
pub enum EstimateError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error("configuration error: {0}")]
    LocationUnavailable(String),
    #[error("location unresolved: {0}")]
    LocationUnresolved(String),
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Composes location resolution, label mapping, record assembly and the model call.
pub struct EstimateService<G> {
    catalog: Arc<LocationCatalog>,
    mapper: FeatureMapper,
    gateway: Arc<G>,
}

impl<G> EstimateService<G>
where
    G: PredictionGateway + 'static,
{
    pub fn new(catalog: Arc<LocationCatalog>, mapper: FeatureMapper, gateway: Arc<G>) -> Self {
        Self {
            catalog,
            mapper,
            gateway,
        }
    }

    pub fn mapper(&self) -> &FeatureMapper {
        &self.mapper
    }

    /// Builds the record without calling the model.
    pub fn preview_at(
        &self,
        request: &EstimateRequest,
        timestamp: NaiveDateTime,
    ) -> Result<PredictionRecord, EstimateError> {
        let numeric = request.numeric();
        numeric.validate()?;

        let location = self.resolve_location(&request.location)?;
        let features = self.mapper.map_all(&request.features)?;

        Ok(RecordBuilder::build(
            &location,
            &numeric,
            &features,
            &request.amenities,
            timestamp,
        ))
    }

    pub async fn estimate(&self, request: &EstimateRequest) -> Result<Estimate, EstimateError> {
        self.estimate_at(request, Local::now().naive_local()).await
    }

    pub async fn estimate_at(
        &self,
        request: &EstimateRequest,
        timestamp: NaiveDateTime,
    ) -> Result<Estimate, EstimateError> {
        let record = self.preview_at(request, timestamp)?;

        let estimate = match self.gateway.predict(&record).await {
            Ok(value) if value.is_finite() => value,
            Ok(value) => {
                return Err(GatewayError::PredictionFailed(format!(
                    "model returned a non-finite estimate ({value})"
                ))
                .into())
            }
            Err(err) => {
                warn!(error = %err, city = %record.city, "rent estimate failed");
                return Err(err.into());
            }
        };

        info!(
            city = %record.city,
            postal_code = %record.postal_code,
            estimate,
            "rent estimate computed"
        );

        Ok(Estimate {
            estimate,
            currency: "EUR",
            living_space: record.living_space,
            city: record.city.clone(),
            record,
        })
    }

    /// A postal code known to the index decides the location; otherwise the selection is
    /// reconciled. Unknown postal codes are rejected instead of being sent to the model.
    fn resolve_location(
        &self,
        selection: &LocationSelection,
    ) -> Result<ResolvedLocation, EstimateError> {
        if let Some(reason) = self.catalog.unavailable_reason() {
            return Err(EstimateError::LocationUnavailable(reason.to_string()));
        }

        let resolver = self.catalog.resolver();
        let typed_code = selection
            .postal_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty());
        let resolution = match typed_code {
            Some(code) => {
                let typed = resolver.on_postal_code(selection, code);
                if typed.outcome != ResolutionOutcome::Resolved {
                    return Err(EstimateError::LocationUnresolved(format!(
                        "postal code '{code}' is not in the geo data"
                    )));
                }
                typed
            }
            None => resolver.reconcile(&LocationSelection {
                postal_code: None,
                ..selection.clone()
            }),
        };

        resolution.selection.resolved().ok_or_else(|| {
            EstimateError::LocationUnresolved(match &selection.state {
                Some(state) => format!("no city or postal code known for state '{state}'"),
                None => "a state or postal code is required".to_string(),
            })
        })
    }
}
