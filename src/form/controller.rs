//! Form controller
//!
//! Handles UI intents and drives a submission through
//! `Idle -> Validating -> Submitting -> Rendering -> Idle`, leaving through `Error`
//! on any failure. Every exit path hides the loader and resets the progress bar.

use super::conditional::{HIDDEN_FIELD_VALUE, Visibility, visibility_for};
use super::field::check_bmi;
use super::patch::{Alert, Patch, PatchSink, ResultView};
use super::{AGE_CATEGORY, BMI, DIABETIC, PredictionForm};
use crate::api::error::ApiError;
use crate::api::{FormPayload, PredictResponse, PredictionApi};
use crate::logging::log_at;
use std::fmt;

pub const VALIDATION_FAILED: &str = "Please correct the errors in the form";
pub const PREDICTION_SUCCEEDED: &str = "Prediction completed successfully!";
pub const LOADER_MESSAGE: &str = "Analysis in progress...";
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Progress shown when the request is sent.
pub const PROGRESS_REQUEST_SENT: u8 = 30;
/// Progress shown once the server has answered.
pub const PROGRESS_RESPONSE_RECEIVED: u8 = 70;
/// Progress shown once the answer has been handled.
pub const PROGRESS_DONE: u8 = 100;

/// A user interaction with the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    FieldChanged { field: String, value: String },
    FieldBlurred { field: String },
    AgeChanged { value: String },
    FormSubmitted,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Submitting,
    Rendering,
    Error,
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Client-side validation failed; nothing was sent.
    Invalid,
    Rendered(ResultView),
    /// The server answered `success: false`.
    Rejected(String),
    /// The server answered with a non-success status.
    HttpError(u16),
    /// The request never completed or the answer could not be read.
    ConnectionError(String),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Rendered(_))
    }
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionOutcome::Invalid => write!(f, "{}", VALIDATION_FAILED),
            SubmissionOutcome::Rendered(view) => write!(f, "{}", view.headline()),
            SubmissionOutcome::Rejected(message) => write!(f, "Error: {}", message),
            SubmissionOutcome::HttpError(status) => write!(f, "Server error. Status: {}", status),
            SubmissionOutcome::ConnectionError(message) => {
                write!(f, "Connection error: {}", message)
            }
        }
    }
}

#[derive(Debug)]
pub struct FormController {
    form: PredictionForm,
    phase: SubmissionPhase,
}

impl FormController {
    /// Creates the controller and applies the age gate once for the initial values.
    pub fn new(form: PredictionForm, sink: &mut dyn PatchSink) -> Self {
        let mut controller = Self {
            form,
            phase: SubmissionPhase::Idle,
        };
        controller.apply_age_gate(sink);
        controller
    }

    #[cfg(test)]
    pub fn form(&self) -> &PredictionForm {
        &self.form
    }

    #[cfg(test)]
    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    fn set_phase(&mut self, next: SubmissionPhase) {
        log::trace!("Submission phase {} -> {}", self.phase, next);
        self.phase = next;
    }

    /// Handles one intent. Only `FormSubmitted` reaches the network.
    pub async fn dispatch(
        &mut self,
        intent: Intent,
        api: &dyn PredictionApi,
        sink: &mut dyn PatchSink,
    ) -> Option<SubmissionOutcome> {
        match intent {
            Intent::FieldChanged { field, value } => {
                self.field_changed(&field, value, sink);
                None
            }
            Intent::FieldBlurred { field } => {
                self.validate_field(&field, sink);
                None
            }
            Intent::AgeChanged { value } => {
                self.field_changed(AGE_CATEGORY, value, sink);
                None
            }
            Intent::FormSubmitted => Some(self.submit(api, sink).await),
        }
    }

    fn field_changed(&mut self, name: &str, value: String, sink: &mut dyn PatchSink) {
        let Some(field) = self.form.field_mut(name) else {
            log::debug!("Ignoring change for unknown field {}", name);
            return;
        };
        field.value = value;
        field.clear_error(sink);

        match name {
            // BMI is checked live while typing.
            BMI => {
                if let Err(message) = bmi_bounds(&field.value) {
                    field.set_error(message.to_string(), sink);
                }
            }
            AGE_CATEGORY => self.apply_age_gate(sink),
            _ => {}
        }
    }

    fn validate_field(&mut self, name: &str, sink: &mut dyn PatchSink) {
        let Some(field) = self.form.field_mut(name) else {
            log::debug!("Ignoring blur for unknown field {}", name);
            return;
        };
        if name == BMI {
            field.validate_with(bmi_bounds, sink);
        } else {
            field.validate(sink);
        }
    }

    /// Shows the dependent field for ages of 50 and over; otherwise hides it and resets it.
    fn apply_age_gate(&mut self, sink: &mut dyn PatchSink) {
        let category = self.form.value(AGE_CATEGORY).unwrap_or_default().to_string();
        let Some(dependent) = self.form.field_mut(DIABETIC) else {
            return;
        };

        match visibility_for(&category) {
            Visibility::Shown => {
                dependent.visible = true;
                sink.apply(Patch::ShowField {
                    field: dependent.name.clone(),
                });
            }
            Visibility::Hidden => {
                dependent.visible = false;
                dependent.value = HIDDEN_FIELD_VALUE.to_string();
                sink.apply(Patch::HideField {
                    field: dependent.name.clone(),
                });
                sink.apply(Patch::SetFieldValue {
                    field: dependent.name.clone(),
                    value: HIDDEN_FIELD_VALUE.to_string(),
                });
            }
        }
    }

    /// Runs every visible field's rules plus the BMI bounds. All errors are reported.
    fn validate_all(&mut self, sink: &mut dyn PatchSink) -> bool {
        let mut valid = true;
        for field in self.form.fields_mut().filter(|field| field.visible) {
            valid &= if field.name == BMI {
                field.validate_with(bmi_bounds, sink)
            } else {
                field.validate(sink)
            };
        }
        valid
    }

    async fn submit(
        &mut self,
        api: &dyn PredictionApi,
        sink: &mut dyn PatchSink,
    ) -> SubmissionOutcome {
        self.set_phase(SubmissionPhase::Validating);
        if !self.validate_all(sink) {
            log::info!("Form submission blocked by validation errors");
            sink.apply(Patch::ShowAlert(Alert::danger(VALIDATION_FAILED)));
            self.set_phase(SubmissionPhase::Idle);
            return SubmissionOutcome::Invalid;
        }

        let payload = self.form.payload();
        self.set_phase(SubmissionPhase::Submitting);
        sink.apply(Patch::ShowLoader {
            message: LOADER_MESSAGE.to_string(),
        });
        sink.apply(Patch::SetProgress(PROGRESS_REQUEST_SENT));

        let outcome = self.exchange(api, &payload, sink).await;

        // Cleanup runs on every path.
        sink.apply(Patch::HideLoader);
        sink.apply(Patch::SetProgress(0));
        self.set_phase(SubmissionPhase::Idle);
        outcome
    }

    async fn exchange(
        &mut self,
        api: &dyn PredictionApi,
        payload: &FormPayload,
        sink: &mut dyn PatchSink,
    ) -> SubmissionOutcome {
        let body = match api.predict(payload).await {
            Ok(body) => body,
            Err(ApiError::Http { status, message }) => {
                sink.apply(Patch::SetProgress(PROGRESS_RESPONSE_RECEIVED));
                log::error!("Prediction request failed with status {}: {}", status, message);
                sink.apply(Patch::ShowAlert(Alert::danger(format!(
                    "Server error. Status: {}",
                    status
                ))));
                sink.apply(Patch::SetProgress(PROGRESS_DONE));
                self.set_phase(SubmissionPhase::Error);
                return SubmissionOutcome::HttpError(status);
            }
            Err(e) => return self.connection_error(&e, sink),
        };

        sink.apply(Patch::SetProgress(PROGRESS_RESPONSE_RECEIVED));
        self.set_phase(SubmissionPhase::Rendering);

        let response = match PredictResponse::from_body(&body) {
            Ok(response) => response,
            Err(e) => return self.connection_error(&ApiError::from(e), sink),
        };

        let outcome = if response.success {
            let view = ResultView::from_response(&response);
            log::info!(
                "Prediction received: {} ({} confidence)",
                view.headline(),
                view.confidence
            );
            sink.apply(Patch::RenderResult(view.clone()));
            sink.apply(Patch::ShowAlert(Alert::success(PREDICTION_SUCCEEDED)));
            SubmissionOutcome::Rendered(view)
        } else {
            let message = response
                .error
                .filter(|error| !error.is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
            log::warn!("Prediction rejected by the server: {}", message);
            sink.apply(Patch::ShowAlert(Alert::danger(format!("Error: {}", message))));
            self.set_phase(SubmissionPhase::Error);
            SubmissionOutcome::Rejected(message)
        };
        sink.apply(Patch::SetProgress(PROGRESS_DONE));
        outcome
    }

    fn connection_error(&mut self, error: &ApiError, sink: &mut dyn PatchSink) -> SubmissionOutcome {
        log_at(error.log_level(), &format!("Prediction request failed: {}", error));
        let message = error.user_message();
        sink.apply(Patch::ShowAlert(Alert::danger(format!(
            "Connection error: {}",
            message
        ))));
        self.set_phase(SubmissionPhase::Error);
        SubmissionOutcome::ConnectionError(message)
    }
}

fn bmi_bounds(value: &str) -> Result<(), &'static str> {
    check_bmi(value).map(drop)
}
