//! Age-gated visibility of the `Diabetic` field

/// Age assumed when the category cannot be read. High enough to keep the field visible.
pub const DEFAULT_AGE: u32 = 80;

/// Youngest age for which the dependent field is shown.
pub const MIN_VISIBLE_AGE: u32 = 50;

/// Value forced into the dependent field while it is hidden.
pub const HIDDEN_FIELD_VALUE: &str = "No";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Visibility {
    Shown,
    Hidden,
}

/// Leading integer of an age category such as `"50-59"` or `"80 or older"`.
///
/// Falls back to [`DEFAULT_AGE`] when no positive integer can be read.
pub fn parse_age(category: &str) -> u32 {
    let lower = category.split('-').next().unwrap_or_default().trim_start();
    let digits: String = lower.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<u32>() {
        Ok(age) if age > 0 => age,
        _ => DEFAULT_AGE,
    }
}

pub fn visibility_for(category: &str) -> Visibility {
    if parse_age(category) >= MIN_VISIBLE_AGE {
        Visibility::Shown
    } else {
        Visibility::Hidden
    }
}
