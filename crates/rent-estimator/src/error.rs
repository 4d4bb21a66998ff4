use crate::config::ConfigError;
use crate::estimate::{EstimateError, GatewayError};
use crate::features::VocabularyError;
use crate::location::GeoIndexError;
use crate::telemetry::TelemetryError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    GeoData(GeoIndexError),
    Vocabulary(VocabularyError),
    Gateway(GatewayError),
    Estimate(EstimateError),
    Csv(csv::Error),
    Request(JsonRejection),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::GeoData(err) => write!(f, "configuration error: {}", err),
            AppError::Vocabulary(err) => write!(f, "vocabulary error: {}", err),
            AppError::Gateway(err) => write!(f, "model gateway error: {}", err),
            AppError::Estimate(err) => write!(f, "estimate error: {}", err),
            AppError::Csv(err) => write!(f, "csv export error: {}", err),
            AppError::Request(err) => write!(f, "invalid request body: {}", err.body_text()),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::GeoData(err) => Some(err),
            AppError::Vocabulary(err) => Some(err),
            AppError::Gateway(err) => Some(err),
            AppError::Estimate(err) => Some(err),
            AppError::Csv(err) => Some(err),
            AppError::Request(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Estimate(err) => crate::estimate::router::status_for(err),
            AppError::Request(err) => err.status(),
            AppError::GeoData(_) | AppError::Gateway(GatewayError::ModelUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Gateway(GatewayError::PredictionFailed(_)) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Vocabulary(_)
            | AppError::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<GeoIndexError> for AppError {
    fn from(value: GeoIndexError) -> Self {
        Self::GeoData(value)
    }
}

impl From<VocabularyError> for AppError {
    fn from(value: VocabularyError) -> Self {
        Self::Vocabulary(value)
    }
}

impl From<GatewayError> for AppError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

impl From<EstimateError> for AppError {
    fn from(value: EstimateError) -> Self {
        Self::Estimate(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::Request(value)
    }
}
