//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::dashboard::StatStyle;
use crate::events::Source;
use ratatui::prelude::Color;

/// Get a ratatui color for an event based on where it came from
pub fn get_source_color(source: &Source) -> Color {
    match source {
        Source::Stats => Color::Cyan,
        Source::Export => Color::Green,
        Source::Snapshot => Color::Yellow,
    }
}

pub fn get_stat_color(style: StatStyle) -> Color {
    match style {
        StatStyle::Plain => Color::White,
        StatStyle::Danger => Color::LightRed,
        StatStyle::Success => Color::LightGreen,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    if let Some((date_part, time_part)) = timestamp.split_once(' ') {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    // Fallback to original timestamp if parsing fails
    timestamp.to_string()
}

/// `1h 02m 03s` style duration.
pub fn format_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else {
        format!("{}m {:02}s", minutes, seconds)
    }
}
