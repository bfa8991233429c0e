//! UI patches produced by the form controller
//!
//! The controller never touches the terminal directly. It emits patches and a sink
//! decides how to show them.

use crate::api::PredictResponse;

pub const POSITIVE_RESULT_TEXT: &str = "RISK DETECTED";
pub const NEGATIVE_RESULT_TEXT: &str = "NO RISK";

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AlertKind {
    Success,
    Danger,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Danger,
            message: message.into(),
        }
    }
}

/// Rendered prediction: risk flag plus formatted confidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub positive: bool,
    pub confidence: String,
    pub model: Option<String>,
}

impl ResultView {
    pub fn from_response(response: &PredictResponse) -> Self {
        let positive = response
            .prediction
            .as_ref()
            .is_some_and(|prediction| prediction.is_positive());
        Self {
            positive,
            confidence: format_confidence(response.probability),
            model: response.model.clone(),
        }
    }

    pub fn headline(&self) -> &'static str {
        if self.positive {
            POSITIVE_RESULT_TEXT
        } else {
            NEGATIVE_RESULT_TEXT
        }
    }
}

/// `probability * 100` with two decimals, or `N/A`.
///
/// The service reports a probability of exactly 0 for models without probability estimates,
/// so 0 also renders as `N/A`.
pub fn format_confidence(probability: Option<f64>) -> String {
    match probability {
        Some(probability) if probability.is_finite() && probability != 0.0 => {
            format!("{:.2}%", probability * 100.0)
        }
        _ => "N/A".to_string(),
    }
}

/// A single declarative UI update.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    SetFieldError { field: String, message: String },
    ClearFieldError { field: String },
    ShowField { field: String },
    HideField { field: String },
    SetFieldValue { field: String, value: String },
    ShowLoader { message: String },
    HideLoader,
    SetProgress(u8),
    ShowAlert(Alert),
    RenderResult(ResultView),
}

/// Applies patches to some environment.
pub trait PatchSink {
    fn apply(&mut self, patch: Patch);
}

impl PatchSink for Vec<Patch> {
    fn apply(&mut self, patch: Patch) {
        self.push(patch);
    }
}
