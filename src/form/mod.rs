//! Prediction form
//!
//! Field definitions, client-side validation and the submission controller.

pub mod conditional;
pub mod controller;
pub mod field;
pub mod patch;
pub mod rules;

pub use controller::{FormController, Intent, SubmissionOutcome};
pub use field::FormField;
pub use patch::{Alert, AlertKind, Patch, PatchSink, ResultView};
pub use rules::RuleSet;

use crate::api::FormPayload;
use clap::ValueEnum;

pub const HEART_DISEASE: &str = "HeartDisease";
pub const BMI: &str = "BMI";
pub const SMOKING: &str = "Smoking";
pub const SEX: &str = "Sex";
pub const AGE_CATEGORY: &str = "AgeCategory";
pub const DIABETIC: &str = "Diabetic";
pub const PHYSICAL_ACTIVITY: &str = "PhysicalActivity";
pub const GEN_HEALTH: &str = "GenHealth";
pub const MODEL_CHOICE: &str = "model_choice";

/// Models the prediction service can run.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, ValueEnum, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ModelChoice {
    #[default]
    LogReg,
    RandomForest,
    GradientBoosting,
    Knn,
}

/// The health-risk form, fields kept in submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionForm {
    fields: Vec<FormField>,
}

impl Default for PredictionForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionForm {
    pub fn new() -> Self {
        let select = |name: &str, message: &str| FormField::new(name, RuleSet::new().required(message));
        Self {
            fields: vec![
                select(HEART_DISEASE, "Please indicate any heart disease"),
                FormField::new(
                    BMI,
                    RuleSet::new()
                        .required("BMI is required")
                        .number("BMI must be a number"),
                ),
                select(SMOKING, "Please indicate smoking status"),
                select(SEX, "Please select a sex"),
                select(AGE_CATEGORY, "Please select an age category"),
                select(DIABETIC, "Please indicate diabetes status").with_value("No"),
                select(PHYSICAL_ACTIVITY, "Please indicate physical activity"),
                select(GEN_HEALTH, "Please rate your general health"),
                select(MODEL_CHOICE, "Please select a model")
                    .with_value(ModelChoice::default().to_string()),
            ],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut FormField> {
        self.fields.iter_mut()
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.field(name).map(|field| field.value.as_str())
    }

    /// Serializes every field, hidden ones included, in form order.
    pub fn payload(&self) -> FormPayload {
        let mut payload = FormPayload::new();
        for field in &self.fields {
            payload.push(field.name.as_str(), field.value.trim());
        }
        payload
    }
}
