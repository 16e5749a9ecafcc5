//! Client side of the video success predictor: form normalization, the
//! prediction service seam, the submission controller and the view-model it
//! renders into.

pub mod controller;
pub mod error;
pub mod locale;
pub mod normalize;
pub mod presentation;
pub mod service;
pub mod session;
pub mod view;

pub use controller::{ModelStatus, PresentationOptions, SubmissionController, SubmissionPhase};
pub use error::{ServiceError, SubmitError, TransportError};
pub use locale::Locale;
pub use service::{HttpPredictionService, PredictionService};
pub use session::{FormSession, LoadingScope};
pub use view::{RenderInstruction, Renderer, ViewModel};
