//! Field rules
//!
//! Rules are always evaluated in the same order: required, min length, max length,
//! number, range, email. The first failing rule decides the error.

use regex::Regex;
use std::sync::OnceLock;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Name of a single field rule.
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RuleKind {
    Required,
    Min,
    Max,
    Number,
    Range,
    Email,
}

/// A length threshold with its message.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthRule {
    pub value: usize,
    pub message: String,
}

/// An inclusive numeric range with its message.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeRule {
    pub min: f64,
    pub max: f64,
    pub message: String,
}

/// Rule configuration for one field. Unset rules are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub required: Option<String>,
    pub min: Option<LengthRule>,
    pub max: Option<LengthRule>,
    pub number: Option<String>,
    pub range: Option<RangeRule>,
    pub email: Option<String>,
}

/// The first rule a value failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub rule: RuleKind,
    pub message: String,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = Some(message.into());
        self
    }

    #[cfg(test)]
    pub fn min_length(mut self, value: usize, message: impl Into<String>) -> Self {
        self.min = Some(LengthRule {
            value,
            message: message.into(),
        });
        self
    }

    #[cfg(test)]
    pub fn max_length(mut self, value: usize, message: impl Into<String>) -> Self {
        self.max = Some(LengthRule {
            value,
            message: message.into(),
        });
        self
    }

    pub fn number(mut self, message: impl Into<String>) -> Self {
        self.number = Some(message.into());
        self
    }

    #[cfg(test)]
    pub fn range(mut self, min: f64, max: f64, message: impl Into<String>) -> Self {
        self.range = Some(RangeRule {
            min,
            max,
            message: message.into(),
        });
        self
    }

    #[cfg(test)]
    pub fn email(mut self, message: impl Into<String>) -> Self {
        self.email = Some(message.into());
        self
    }

    /// Checks `raw` against the configured rules, stopping at the first failure.
    pub fn check(&self, raw: &str) -> Result<(), RuleViolation> {
        let value = raw.trim();
        let fail = |rule: RuleKind, message: &str| {
            Err(RuleViolation {
                rule,
                message: message.to_string(),
            })
        };

        if let Some(message) = &self.required {
            if value.is_empty() {
                return fail(RuleKind::Required, message);
            }
        }
        if let Some(min) = &self.min {
            if value.chars().count() < min.value {
                return fail(RuleKind::Min, &min.message);
            }
        }
        if let Some(max) = &self.max {
            if value.chars().count() > max.value {
                return fail(RuleKind::Max, &max.message);
            }
        }
        if let Some(message) = &self.number {
            if parse_number(value).is_none() {
                return fail(RuleKind::Number, message);
            }
        }
        if let Some(range) = &self.range {
            match parse_number(value) {
                Some(number) if number >= range.min && number <= range.max => {}
                _ => return fail(RuleKind::Range, &range.message),
            }
        }
        if let Some(message) = &self.email {
            if !email_pattern().is_match(value) {
                return fail(RuleKind::Email, message);
            }
        }
        Ok(())
    }
}

/// Parses a trimmed value as a finite number.
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_rules() -> RuleSet {
        RuleSet::new()
            .required("required")
            .min_length(2, "too short")
            .max_length(5, "too long")
            .number("not a number")
            .range(10.0, 99.0, "out of range")
            .email("not an email")
    }

    #[test]
    fn test_empty_rule_set_accepts_anything() {
        let rules = RuleSet::new();
        assert!(rules.check("").is_ok());
        assert!(rules.check("whatever").is_ok());
    }

    #[test]
    // The first failing rule in evaluation order decides the reported error.
    fn test_first_failure_short_circuits() {
        let rules = all_rules();
        assert_eq!(rules.check("  ").unwrap_err().rule, RuleKind::Required);
        assert_eq!(rules.check("x").unwrap_err().rule, RuleKind::Min);
        assert_eq!(rules.check("abcdef").unwrap_err().rule, RuleKind::Max);
        assert_eq!(rules.check("abc").unwrap_err().rule, RuleKind::Number);
        assert_eq!(rules.check("5.5").unwrap_err().rule, RuleKind::Range);
        // Passes every numeric rule, so the email rule is finally reached.
        assert_eq!(rules.check("42").unwrap_err().rule, RuleKind::Email);
    }

    #[test]
    fn test_violation_carries_configured_message() {
        let rules = RuleSet::new().required("Field is required");
        let violation = rules.check("").unwrap_err();
        assert_eq!(violation.message, "Field is required");
        assert_eq!(violation.rule.to_string(), "required");
    }

    #[test]
    fn test_range_rejects_non_numeric_values() {
        let rules = RuleSet::new().range(0.0, 10.0, "out of range");
        assert!(rules.check("5").is_ok());
        assert!(rules.check("0").is_ok());
        assert!(rules.check("10").is_ok());
        assert!(rules.check("NaN").is_err());
        assert!(rules.check("abc").is_err());
        assert!(rules.check("").is_err());
        assert!(rules.check("10.01").is_err());
    }

    #[test]
    fn test_length_counts_characters_after_trim() {
        let rules = RuleSet::new().max_length(3, "too long");
        assert!(rules.check("  éàü  ").is_ok());
        assert!(rules.check("abcd").is_err());
    }

    #[test]
    fn test_email_pattern() {
        let rules = RuleSet::new().email("bad email");
        assert!(rules.check("someone@example.org").is_ok());
        assert!(rules.check("someone@example").is_err());
        assert!(rules.check("some one@example.org").is_err());
        assert!(rules.check("@example.org").is_err());
    }

    #[test]
    fn test_parse_number_is_strict() {
        assert_eq!(parse_number(" 24.5 "), Some(24.5));
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("inf"), None);
    }
}
