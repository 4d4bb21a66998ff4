//! Rent estimation: numeric inputs, the prediction record, and the model gateway.

mod gateway;
mod http;
mod inputs;
mod record;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use gateway::{GatewayError, ModelGateway, PredictionGateway, UnconfiguredGateway};
pub use http::HttpPredictionGateway;
pub use inputs::{
    AmenityFlags, InputError, NumericInputs, FLOOR_RANGE, LIVING_SPACE_RANGE, ROOMS_RANGE,
    YEAR_RANGE, YEAR_UNKNOWN,
};
pub use record::{PredictionRecord, RecordBuilder, COLUMNS};
pub use router::estimate_router;
pub use service::{Estimate, EstimateError, EstimateRequest, EstimateService};
