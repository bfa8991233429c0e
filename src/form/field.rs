//! Form field with its rules and error slot

use super::patch::{Patch, PatchSink};
use super::rules::{RuleSet, parse_number};

/// Upper bound accepted for BMI.
pub const MAX_BMI: f64 = 200.0;

pub const BMI_NOT_POSITIVE: &str = "BMI must be a positive number";
pub const BMI_TOO_LARGE: &str = "BMI must not exceed 200";

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: String,
    pub rules: RuleSet,
    /// Error slot next to the field. `None` when the field is valid.
    pub error: Option<String>,
    pub visible: bool,
}

impl FormField {
    pub fn new(name: impl Into<String>, rules: RuleSet) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            rules,
            error: None,
            visible: true,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Runs the field's rules, updating the error slot.
    pub fn validate(&mut self, sink: &mut dyn PatchSink) -> bool {
        self.validate_with(|_| Ok(()), sink)
    }

    /// Runs the rules, then `extra` once they pass, and applies the first failure.
    pub fn validate_with<F>(&mut self, extra: F, sink: &mut dyn PatchSink) -> bool
    where
        F: FnOnce(&str) -> Result<(), &'static str>,
    {
        let checked = match self.rules.check(&self.value) {
            Ok(()) => extra(&self.value).map_err(str::to_string),
            Err(violation) => Err(violation.message),
        };
        match checked {
            Ok(()) => {
                self.clear_error(sink);
                true
            }
            Err(message) => {
                self.set_error(message, sink);
                false
            }
        }
    }

    /// Shows `message` on the field. An error already on display is not repeated.
    pub fn set_error(&mut self, message: String, sink: &mut dyn PatchSink) {
        if self.error.as_deref() == Some(message.as_str()) {
            return;
        }
        sink.apply(Patch::SetFieldError {
            field: self.name.clone(),
            message: message.clone(),
        });
        self.error = Some(message);
    }

    pub fn clear_error(&mut self, sink: &mut dyn PatchSink) {
        self.error = None;
        sink.apply(Patch::ClearFieldError {
            field: self.name.clone(),
        });
    }
}

/// BMI must be numeric, strictly positive and at most [`MAX_BMI`].
pub fn check_bmi(value: &str) -> Result<f64, &'static str> {
    match parse_number(value) {
        Some(bmi) if bmi <= 0.0 => Err(BMI_NOT_POSITIVE),
        Some(bmi) if bmi > MAX_BMI => Err(BMI_TOO_LARGE),
        Some(bmi) => Ok(bmi),
        None => Err(BMI_NOT_POSITIVE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_bounds() {
        assert_eq!(check_bmi("0.1"), Ok(0.1));
        assert_eq!(check_bmi("24.5"), Ok(24.5));
        assert_eq!(check_bmi("200"), Ok(200.0));
        assert_eq!(check_bmi("0"), Err(BMI_NOT_POSITIVE));
        assert_eq!(check_bmi("-3"), Err(BMI_NOT_POSITIVE));
        assert_eq!(check_bmi("abc"), Err(BMI_NOT_POSITIVE));
        assert_eq!(check_bmi(""), Err(BMI_NOT_POSITIVE));
        assert_eq!(check_bmi("200.01"), Err(BMI_TOO_LARGE));
    }

    #[test]
    fn test_validate_writes_and_clears_error_slot() {
        let mut patches = Vec::new();
        let mut field = FormField::new("Sex", RuleSet::new().required("Please select a sex"));

        assert!(!field.validate(&mut patches));
        assert_eq!(field.error.as_deref(), Some("Please select a sex"));

        field.value = "Female".to_string();
        assert!(field.validate(&mut patches));
        assert!(field.is_valid());

        assert_eq!(
            patches,
            vec![
                Patch::SetFieldError {
                    field: "Sex".to_string(),
                    message: "Please select a sex".to_string(),
                },
                Patch::ClearFieldError {
                    field: "Sex".to_string(),
                },
            ]
        );
    }

    #[test]
    // The extra check only runs once the rules pass, and a repeated error is emitted once.
    fn test_validate_with_extra_check() {
        let mut patches = Vec::new();
        let mut field = FormField::new("BMI", RuleSet::new().required("BMI is required"));
        let bounds = |value: &str| check_bmi(value).map(drop);

        assert!(!field.validate_with(bounds, &mut patches));
        assert_eq!(field.error.as_deref(), Some("BMI is required"));

        field.value = "250".to_string();
        assert!(!field.validate_with(bounds, &mut patches));
        assert!(!field.validate_with(bounds, &mut patches));
        assert_eq!(field.error.as_deref(), Some(BMI_TOO_LARGE));

        let too_large = patches
            .iter()
            .filter(|patch| {
                matches!(patch, Patch::SetFieldError { message, .. } if message == BMI_TOO_LARGE)
            })
            .count();
        assert_eq!(too_large, 1);
    }

    #[test]
    fn test_field_without_rules_is_always_valid() {
        let mut patches = Vec::new();
        let mut field = FormField::new("notes", RuleSet::new());
        assert!(field.validate(&mut patches));
    }
}
