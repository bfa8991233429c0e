//! Dashboard header component
//!
//! Renders the title and refresh gauge

use super::super::state::{DashboardState, FetchingState};
use super::super::utils::format_uptime;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

/// Render header with title and refresh status.
pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let version = env!("CARGO_PKG_VERSION");
    let title = Paragraph::new(format!(
        "RISK PREDICTION DASHBOARD v{}  |  {}  |  up {}",
        version,
        state.base_url,
        format_uptime(state.uptime_secs())
    ))
    .alignment(Alignment::Center)
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Thick),
    );
    f.render_widget(title, header_chunks[0]);

    let (progress_text, gauge_color, progress_percent) = match state.fetching_state() {
        FetchingState::Active { started_at } => {
            // Loops every 20 ticks
            let progress = ((state.tick % 20) as f64 / 20.0 * 100.0) as u16;
            (
                format!(
                    "REFRESHING - Loading stats ({}s)",
                    started_at.elapsed().as_secs()
                ),
                Color::LightBlue,
                progress,
            )
        }
        FetchingState::Failed => (
            "STATS UNAVAILABLE - press R to retry".to_string(),
            Color::LightRed,
            100,
        ),
        FetchingState::Idle => {
            let text = match state.last_refresh_timestamp() {
                Some(timestamp) => format!("UP TO DATE - last refresh {}", timestamp),
                None => "WAITING - no stats loaded".to_string(),
            };
            (text, Color::LightGreen, 100)
        }
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(
            Style::default()
                .fg(gauge_color)
                .add_modifier(Modifier::BOLD),
        )
        .percent(progress_percent)
        .label(progress_text);

    f.render_widget(gauge, header_chunks[1]);
}
