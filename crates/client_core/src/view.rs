//! View-model standing in for the prediction page, and the renderer seam.

use crate::{locale::Locale, presentation::ResultsView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Application,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of one submission, consumed by a [`Renderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderInstruction {
    ShowResults(Box<ResultsView>),
    ShowError(ErrorView),
}

impl RenderInstruction {
    pub fn transport_error(locale: Locale) -> Self {
        Self::ShowError(ErrorView {
            kind: ErrorKind::Transport,
            message: locale.generic_error().to_string(),
        })
    }

    /// Uses the server's message verbatim, or the generic fallback when it
    /// sent none.
    pub fn application_error(message: Option<String>, locale: Locale) -> Self {
        let message = message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| locale.generic_error().to_string());
        Self::ShowError(ErrorView {
            kind: ErrorKind::Application,
            message,
        })
    }
}

/// Performs the visible effects of a submission.
pub trait Renderer {
    /// Must be idempotent.
    fn enter_loading(&mut self);
    fn leave_loading(&mut self);
    fn clear_panels(&mut self);
    fn render(&mut self, instruction: RenderInstruction);
    fn prefill_publish_date(&mut self, value: String);
    fn mark_model_unavailable(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerLabel {
    Ready,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerControl {
    pub disabled: bool,
    pub label: TriggerLabel,
}

impl Default for TriggerControl {
    fn default() -> Self {
        Self {
            disabled: false,
            label: TriggerLabel::Ready,
        }
    }
}

/// Result and error panels share one slot, so at most one is ever visible.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Panel {
    #[default]
    Hidden,
    Results(Box<ResultsView>),
    Error(ErrorView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Results,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelBadge {
    #[default]
    Ready,
    NotLoaded,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewModel {
    pub trigger: TriggerControl,
    pub panel: Panel,
    pub model_badge: ModelBadge,
    pub publish_date_input: String,
    /// Panel most recently scrolled into view.
    pub scrolled_to: Option<PanelKind>,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.trigger.disabled
    }

    pub fn results(&self) -> Option<&ResultsView> {
        match &self.panel {
            Panel::Results(view) => Some(view.as_ref()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorView> {
        match &self.panel {
            Panel::Error(view) => Some(view),
            _ => None,
        }
    }
}

impl Renderer for ViewModel {
    fn enter_loading(&mut self) {
        self.trigger = TriggerControl {
            disabled: true,
            label: TriggerLabel::Busy,
        };
    }

    fn leave_loading(&mut self) {
        self.trigger = TriggerControl::default();
    }

    fn clear_panels(&mut self) {
        self.panel = Panel::Hidden;
    }

    fn render(&mut self, instruction: RenderInstruction) {
        let (panel, kind) = match instruction {
            RenderInstruction::ShowResults(view) => (Panel::Results(view), PanelKind::Results),
            RenderInstruction::ShowError(view) => (Panel::Error(view), PanelKind::Error),
        };
        self.panel = panel;
        self.scrolled_to = Some(kind);
    }

    fn prefill_publish_date(&mut self, value: String) {
        self.publish_date_input = value;
    }

    fn mark_model_unavailable(&mut self) {
        self.model_badge = ModelBadge::NotLoaded;
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
