//! Dashboard export
//!
//! Turns the metrics table into a dated CSV or JSON file.

pub mod table;

pub use table::{MetricsTable, to_csv, to_json};

use chrono::{NaiveDate, Utc};
use clap::ValueEnum;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export")]
    NothingToExport,

    #[error("Failed to serialize table: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

/// `dashboard-export-<YYYY-MM-DD>.<ext>`
pub fn export_filename(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "dashboard-export-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// A rendered export, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub media_type: &'static str,
    pub content: String,
}

impl ExportFile {
    /// Renders `table` for today's UTC date.
    pub fn build(table: Option<&MetricsTable>, format: ExportFormat) -> Result<Self, ExportError> {
        Self::build_dated(table, format, Utc::now().date_naive())
    }

    pub fn build_dated(
        table: Option<&MetricsTable>,
        format: ExportFormat,
        date: NaiveDate,
    ) -> Result<Self, ExportError> {
        let table = table.ok_or(ExportError::NothingToExport)?;
        let content = match format {
            ExportFormat::Csv => to_csv(table)?,
            ExportFormat::Json => to_json(table)?,
        };
        Ok(Self {
            filename: export_filename(format, date),
            media_type: format.media_type(),
            content,
        })
    }

    /// Writes the file into `dir`, creating it if needed. Overwrites an export from the same day.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.content)?;
        log::debug!("Wrote {} ({})", path.display(), self.media_type);
        Ok(path)
    }
}
