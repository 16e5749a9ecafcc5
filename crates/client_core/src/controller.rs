use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::{Local, Utc};
use shared::protocol::{
    HealthResponse, ModelInfoResponse, PredictionRequest, PredictionResponse,
};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::{
    error::{ServiceError, SubmitError, TransportError},
    locale::Locale,
    normalize::normalize_form,
    presentation::ResultsView,
    service::PredictionService,
    view::RenderInstruction,
};

const DEFAULT_RESULT_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationOptions {
    pub locale: Locale,
    /// Pause before showing a successful result. Purely cosmetic.
    pub result_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for PresentationOptions {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            result_delay: DEFAULT_RESULT_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    Loaded,
    NotLoaded,
    /// The health endpoint could not be consulted.
    Unknown,
}

/// Holds the Loading flag for one submission; dropping it returns to Idle.
struct InFlightGuard<'a> {
    loading: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(loading: &'a AtomicBool) -> Result<Self, SubmitError> {
        loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SubmitError::InFlight)?;
        Ok(Self { loading })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.loading.store(false, Ordering::Release);
    }
}

/// Turns one form submission into exactly one prediction call and a
/// [`RenderInstruction`] describing its outcome.
pub struct SubmissionController {
    service: Arc<dyn PredictionService>,
    options: PresentationOptions,
    loading: AtomicBool,
}

impl SubmissionController {
    pub fn new(service: Arc<dyn PredictionService>, options: PresentationOptions) -> Self {
        Self {
            service,
            options,
            loading: AtomicBool::new(false),
        }
    }

    pub fn options(&self) -> &PresentationOptions {
        &self.options
    }

    pub fn phase(&self) -> SubmissionPhase {
        if self.loading.load(Ordering::Acquire) {
            SubmissionPhase::Loading
        } else {
            SubmissionPhase::Idle
        }
    }

    /// Rejects with [`SubmitError::InFlight`] while an earlier submission is
    /// still pending; that submission is left running.
    pub async fn submit(
        &self,
        entries: &[(String, String)],
    ) -> Result<RenderInstruction, SubmitError> {
        let _guard = InFlightGuard::acquire(&self.loading)?;
        let request = normalize_form(entries, &Local, Utc::now());
        let submission_id = Uuid::new_v4();
        Ok(self
            .run(request)
            .instrument(info_span!("submission", %submission_id))
            .await)
    }

    async fn run(&self, request: PredictionRequest) -> RenderInstruction {
        let locale = self.options.locale;
        info!(title_len = request.title.chars().count(), "submitting prediction request");

        match self.call_service(&request).await {
            Err(err) => {
                error!(error = %err, "prediction request failed");
                RenderInstruction::transport_error(locale)
            }
            Ok(response) if !response.success => {
                warn!(error = ?response.error, "prediction service rejected the request");
                RenderInstruction::application_error(response.error, locale)
            }
            Ok(response) => self.present(response).await,
        }
    }

    async fn call_service(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, TransportError> {
        let timeout = self.options.request_timeout;
        tokio::time::timeout(timeout, self.service.predict(request))
            .await
            .unwrap_or(Err(TransportError::Timeout(timeout)))
    }

    async fn present(&self, response: PredictionResponse) -> RenderInstruction {
        let locale = self.options.locale;
        let Some(prediction) = response.prediction.as_ref() else {
            error!(error = %TransportError::MissingPrediction, "prediction response unusable");
            return RenderInstruction::transport_error(locale);
        };

        if !self.options.result_delay.is_zero() {
            tokio::time::sleep(self.options.result_delay).await;
        }

        info!(
            first_week_views = prediction.first_week_views,
            confidence = prediction.confidence,
            "prediction received"
        );
        RenderInstruction::ShowResults(Box::new(ResultsView::build(
            &response, prediction, locale,
        )))
    }

    /// Health check bounded by the request timeout.
    pub async fn health(&self) -> Result<HealthResponse, TransportError> {
        let timeout = self.options.request_timeout;
        tokio::time::timeout(timeout, self.service.health())
            .await
            .unwrap_or(Err(TransportError::Timeout(timeout)))
    }

    pub async fn model_info(&self) -> Result<ModelInfoResponse, ServiceError> {
        let timeout = self.options.request_timeout;
        tokio::time::timeout(timeout, self.service.model_info())
            .await
            .unwrap_or_else(|_| Err(TransportError::Timeout(timeout).into()))
    }

    /// Consults the health endpoint once. Failures are logged, not surfaced.
    pub async fn model_status(&self) -> ModelStatus {
        match self.health().await {
            Ok(health) if health.model_loaded => ModelStatus::Loaded,
            Ok(_) => {
                warn!("model not loaded; train the model before predicting");
                ModelStatus::NotLoaded
            }
            Err(err) => {
                error!(error = %err, "health check failed");
                ModelStatus::Unknown
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
