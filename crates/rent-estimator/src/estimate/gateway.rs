use async_trait::async_trait;

use super::http::HttpPredictionGateway;
use super::record::PredictionRecord;
use crate::config::ModelConfig;

/// The external price model: one record in, one estimate out.
#[async_trait]
pub trait PredictionGateway: Send + Sync {
    async fn predict(&self, record: &PredictionRecord) -> Result<f64, GatewayError>;
}

/// Gateway failures. Neither is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("prediction failed: {0}")]
    PredictionFailed(String),
}

/// Stand-in used when no model endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGateway;

#[async_trait]
impl PredictionGateway for UnconfiguredGateway {
    async fn predict(&self, _record: &PredictionRecord) -> Result<f64, GatewayError> {
        Err(GatewayError::ModelUnavailable(
            "no model endpoint configured (set MODEL_ENDPOINT)".to_string(),
        ))
    }
}

/// Gateway selected from [`ModelConfig`] at startup.
#[derive(Debug, Clone)]
pub enum ModelGateway {
    Http(HttpPredictionGateway),
    Unconfigured(UnconfiguredGateway),
}

impl ModelGateway {
    pub fn from_config(config: &ModelConfig) -> Result<Self, GatewayError> {
        match config.endpoint.as_deref() {
            Some(endpoint) => Ok(Self::Http(HttpPredictionGateway::new(
                endpoint,
                config.timeout,
            )?)),
            None => Ok(Self::Unconfigured(UnconfiguredGateway)),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

#[async_trait]
impl PredictionGateway for ModelGateway {
    async fn predict(&self, record: &PredictionRecord) -> Result<f64, GatewayError> {
        match self {
            Self::Http(gateway) => gateway.predict(record).await,
            Self::Unconfigured(gateway) => gateway.predict(record).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn missing_endpoint_selects_unconfigured_gateway() {
        let config = ModelConfig {
            endpoint: None,
            timeout: Duration::from_secs(10),
        };
        let gateway = ModelGateway::from_config(&config).expect("gateway");
        assert!(!gateway.is_configured());
    }

    #[test]
    fn endpoint_selects_http_gateway() {
        let config = ModelConfig {
            endpoint: Some("http://127.0.0.1:5001/invocations".to_string()),
            timeout: Duration::from_secs(10),
        };
        let gateway = ModelGateway::from_config(&config).expect("gateway");
        assert!(gateway.is_configured());
    }
}
