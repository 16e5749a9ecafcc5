use std::time::Duration;

use shared::error::ApiException;
use thiserror::Error;

/// Failure to obtain a usable response from the prediction service.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid service endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("undecodable response body (status {status}): {detail}")]
    Decode { status: u16, detail: String },
    #[error("successful response carried no prediction")]
    MissingPrediction,
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

impl TransportError {
    pub(crate) fn request(endpoint: &url::Url, source: reqwest::Error) -> Self {
        Self::Request {
            endpoint: endpoint.to_string(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Api(#[from] ApiException),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("a prediction submission is already in flight")]
    InFlight,
}
