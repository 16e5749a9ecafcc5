use std::{
    ops::{Deref, DerefMut},
    sync::Arc,
};

use chrono::Local;
use tracing::debug;

use crate::{
    controller::{ModelStatus, SubmissionController, SubmissionPhase},
    error::SubmitError,
    normalize::default_publish_date_input,
    view::Renderer,
};

/// Keeps a renderer in its loading state; leaving happens on drop, so every
/// exit path (including unwinding) re-enables the trigger.
pub struct LoadingScope<'a, R: Renderer> {
    renderer: &'a mut R,
}

impl<'a, R: Renderer> LoadingScope<'a, R> {
    pub fn enter(renderer: &'a mut R) -> Self {
        renderer.enter_loading();
        Self { renderer }
    }
}

impl<R: Renderer> Deref for LoadingScope<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.renderer
    }
}

impl<R: Renderer> DerefMut for LoadingScope<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.renderer
    }
}

impl<R: Renderer> Drop for LoadingScope<'_, R> {
    fn drop(&mut self) {
        self.renderer.leave_loading();
    }
}

/// One prediction form: a controller plus the renderer it drives.
pub struct FormSession<R: Renderer> {
    controller: Arc<SubmissionController>,
    renderer: R,
}

impl<R: Renderer> FormSession<R> {
    pub fn new(controller: Arc<SubmissionController>, renderer: R) -> Self {
        Self {
            controller,
            renderer,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Pre-fills the publish date with the current local time and consults
    /// the health endpoint once.
    pub async fn initialize(&mut self) -> ModelStatus {
        self.renderer
            .prefill_publish_date(default_publish_date_input(&Local::now()));

        let status = self.controller.model_status().await;
        if status == ModelStatus::NotLoaded {
            self.renderer.mark_model_unavailable();
        }
        status
    }

    /// Runs one submission through loading, panel reset and rendering.
    pub async fn submit(&mut self, entries: &[(String, String)]) -> Result<(), SubmitError> {
        if self.controller.phase() == SubmissionPhase::Loading {
            debug!("ignoring submit while a prediction is in flight");
            return Err(SubmitError::InFlight);
        }

        let mut scope = LoadingScope::enter(&mut self.renderer);
        scope.clear_panels();
        let instruction = self.controller.submit(entries).await?;
        scope.render(instruction);
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
