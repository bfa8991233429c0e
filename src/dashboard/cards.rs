//! Stat card slots and the patches that fill them.

use crate::api::DashboardStats;

pub const PREDICTIONS_SLOT: usize = 0;
pub const POSITIVE_CASES_SLOT: usize = 1;
pub const ACCURACY_SLOT: usize = 2;

/// Shown in a slot the server has not filled yet.
pub const EMPTY_STAT_VALUE: &str = "--";

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StatStyle {
    #[default]
    Plain,
    Danger,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardPatch {
    SetStatValue { slot: usize, text: String },
    AddStyle { slot: usize, style: StatStyle },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    pub style: StatStyle,
}

impl StatCard {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            value: EMPTY_STAT_VALUE.to_string(),
            style: StatStyle::Plain,
        }
    }
}

/// The fixed row of stat cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCards {
    cards: Vec<StatCard>,
}

impl Default for StatCards {
    fn default() -> Self {
        Self {
            cards: vec![
                StatCard::new("Predictions"),
                StatCard::new("Positive cases"),
                StatCard::new("Accuracy"),
            ],
        }
    }
}

impl StatCards {
    pub fn cards(&self) -> &[StatCard] {
        &self.cards
    }

    #[cfg(test)]
    pub fn get(&self, slot: usize) -> Option<&StatCard> {
        self.cards.get(slot)
    }

    /// A patch aimed at a slot that does not exist is dropped.
    pub fn apply(&mut self, patch: &DashboardPatch) {
        match patch {
            DashboardPatch::SetStatValue { slot, text } => {
                if let Some(card) = self.cards.get_mut(*slot) {
                    card.value = text.clone();
                }
            }
            DashboardPatch::AddStyle { slot, style } => {
                if let Some(card) = self.cards.get_mut(*slot) {
                    card.style = *style;
                }
            }
        }
    }
}

pub fn format_accuracy(accuracy: f64) -> String {
    format!("{:.2}%", accuracy * 100.0)
}

/// One independent patch group per field present in `stats`.
pub fn render_stats(stats: &DashboardStats) -> Vec<DashboardPatch> {
    let mut patches = Vec::new();
    if let Some(total) = stats.total_predictions {
        patches.push(DashboardPatch::SetStatValue {
            slot: PREDICTIONS_SLOT,
            text: total.to_string(),
        });
    }
    if let Some(positive) = stats.positive_cases {
        patches.push(DashboardPatch::SetStatValue {
            slot: POSITIVE_CASES_SLOT,
            text: positive.to_string(),
        });
        patches.push(DashboardPatch::AddStyle {
            slot: POSITIVE_CASES_SLOT,
            style: StatStyle::Danger,
        });
    }
    if let Some(accuracy) = stats.accuracy {
        patches.push(DashboardPatch::SetStatValue {
            slot: ACCURACY_SLOT,
            text: format_accuracy(accuracy),
        });
        patches.push(DashboardPatch::AddStyle {
            slot: ACCURACY_SLOT,
            style: StatStyle::Success,
        });
    }
    patches
}
