//! Dashboard controller
//!
//! Loads summary statistics into the stat cards and exposes them as an exportable table.

pub mod cards;

pub use cards::{DashboardPatch, StatCards, StatStyle, render_stats};

use crate::api::error::ApiError;
use crate::api::{DashboardStats, PredictionApi};
use crate::export::{ExportError, ExportFile, ExportFormat, MetricsTable};
use cards::format_accuracy;
use std::sync::Arc;

pub struct Dashboard {
    api: Arc<dyn PredictionApi>,
    /// `None` when there is nowhere to display the stats.
    cards: Option<StatCards>,
    stats: Option<DashboardStats>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn PredictionApi>) -> Self {
        Self {
            api,
            cards: Some(StatCards::default()),
            stats: None,
        }
    }

    /// A dashboard without stat cards, for headless use. Refreshes still fetch the stats
    /// behind the metrics table but patch nothing.
    pub fn without_cards(api: Arc<dyn PredictionApi>) -> Self {
        Self {
            api,
            cards: None,
            stats: None,
        }
    }

    pub fn cards(&self) -> Option<&StatCards> {
        self.cards.as_ref()
    }

    pub fn base_url(&self) -> String {
        self.api.base_url()
    }

    /// Fetches fresh stats and patches the cards. On failure the cards keep their previous values.
    pub async fn refresh(&mut self) -> Result<Vec<DashboardPatch>, ApiError> {
        let stats = match self.api.dashboard_stats().await {
            Ok(stats) => stats,
            Err(e) => {
                log::warn!("Failed to load dashboard stats: {}", e);
                return Err(e);
            }
        };

        let patches = render_stats(&stats);
        if let Some(cards) = self.cards.as_mut() {
            for patch in &patches {
                cards.apply(patch);
            }
        }
        log::debug!("Applied {} dashboard patches", patches.len());
        self.stats = Some(stats);
        Ok(patches)
    }

    /// The metrics table, once stats have been loaded.
    pub fn metrics_table(&self) -> Option<MetricsTable> {
        let stats = self.stats.as_ref()?;

        let mut table = MetricsTable::new(["Metric", "Value"]);
        if let Some(total) = stats.total_predictions {
            table.push_row(["Total predictions".to_string(), total.to_string()]);
        }
        if let Some(positive) = stats.positive_cases {
            table.push_row(["Positive cases".to_string(), positive.to_string()]);
        }
        if let Some(accuracy) = stats.accuracy {
            table.push_row(["Accuracy".to_string(), format_accuracy(accuracy)]);
        }
        Some(table)
    }

    pub fn export(&self, format: ExportFormat) -> Result<ExportFile, ExportError> {
        ExportFile::build(self.metrics_table().as_ref(), format)
    }

    /// Plain-text rendering of the cards and the metrics table.
    pub fn snapshot_text(&self) -> String {
        let mut out = String::from("Dashboard\n");
        match &self.cards {
            Some(cards) => {
                for card in cards.cards() {
                    out.push_str(&format!("  {:<16}{}\n", card.label, card.value));
                }
            }
            None => out.push_str("  (no stat cards)\n"),
        }
        if let Some(table) = self.metrics_table() {
            out.push('\n');
            out.push_str(&table.headers.join(" | "));
            out.push('\n');
            for row in &table.rows {
                out.push_str(&row.join(" | "));
                out.push('\n');
            }
        }
        out
    }
}
