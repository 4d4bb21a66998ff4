use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::gateway::{GatewayError, PredictionGateway};
use super::record::PredictionRecord;

/// Posts records to a model-serving endpoint as a `dataframe_split` single-row table.
#[derive(Debug, Clone)]
pub struct HttpPredictionGateway {
    client: reqwest::Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InvocationResponse {
    Wrapped { predictions: Vec<f64> },
    Bare(Vec<f64>),
}

impl InvocationResponse {
    fn first(self) -> Option<f64> {
        match self {
            InvocationResponse::Wrapped { predictions } | InvocationResponse::Bare(predictions) => {
                predictions.into_iter().next()
            }
        }
    }
}

impl HttpPredictionGateway {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let endpoint = Url::parse(endpoint).map_err(|err| {
            GatewayError::ModelUnavailable(format!("invalid model endpoint '{endpoint}': {err}"))
        })?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GatewayError::ModelUnavailable(format!("http client: {err}")))?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl PredictionGateway for HttpPredictionGateway {
    async fn predict(&self, record: &PredictionRecord) -> Result<f64, GatewayError> {
        let payload = json!({ "dataframe_split": record.dataframe_split() });

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                if err.is_connect() || err.is_timeout() {
                    GatewayError::ModelUnavailable(format!("model endpoint unreachable: {err}"))
                } else {
                    GatewayError::PredictionFailed(format!("request failed: {err}"))
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(GatewayError::ModelUnavailable(format!(
                "model endpoint answered {status}"
            )));
        }
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body.trim().to_string(),
                Err(err) => format!("<unreadable body: {err}>"),
            };
            return Err(GatewayError::PredictionFailed(format!(
                "model endpoint answered {status}: {body}"
            )));
        }

        let parsed: InvocationResponse = response.json().await.map_err(|err| {
            GatewayError::PredictionFailed(format!("malformed model response: {err}"))
        })?;

        parsed.first().ok_or_else(|| {
            GatewayError::PredictionFailed("model returned no predictions".to_string())
        })
    }
}
