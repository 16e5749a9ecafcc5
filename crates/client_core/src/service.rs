use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    error::{ApiErrorBody, ApiException},
    protocol::{HealthResponse, ModelInfoResponse, PredictionRequest, PredictionResponse},
};
use tracing::debug;
use url::Url;

use crate::error::{ServiceError, TransportError};

const PREDICT_PATH: &str = "api/predict";
const HEALTH_PATH: &str = "api/health";
const MODEL_INFO_PATH: &str = "api/model-info";

/// Remote model-serving endpoint.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// A decoded body is returned whatever the HTTP status; `success: false`
    /// is for the caller to interpret.
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, TransportError>;
    async fn health(&self) -> Result<HealthResponse, TransportError>;
    async fn model_info(&self) -> Result<ModelInfoResponse, ServiceError>;
}

pub struct HttpPredictionService {
    http: Client,
    base_url: Url,
}

impl HttpPredictionService {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, mut base_url: Url) -> Self {
        // Endpoints are joined relatively, so any path prefix must be a directory.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        Ok(self.base_url.join(path)?)
    }
}

async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let status = response.status().as_u16();
    let url = response.url().clone();
    let bytes = response
        .bytes()
        .await
        .map_err(|err| TransportError::request(&url, err))?;
    serde_json::from_slice(&bytes).map_err(|err| TransportError::Decode {
        status,
        detail: err.to_string(),
    })
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, TransportError> {
        let url = self.endpoint(PREDICT_PATH)?;
        let response = self
            .http
            .post(url.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| TransportError::request(&url, err))?;
        debug!(status = %response.status(), "prediction response received");
        decode_body(response).await
    }

    async fn health(&self) -> Result<HealthResponse, TransportError> {
        let url = self.endpoint(HEALTH_PATH)?;
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|err| TransportError::request(&url, err))?;
        decode_body(response).await
    }

    async fn model_info(&self) -> Result<ModelInfoResponse, ServiceError> {
        let url = self.endpoint(MODEL_INFO_PATH)?;
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|err| TransportError::request(&url, err))?;

        let status = response.status();
        if status.is_success() {
            return Ok(decode_body(response).await?);
        }

        let message = match decode_body::<ApiErrorBody>(response).await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        };
        Err(ApiException::new(status.as_u16(), message).into())
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
