//! Dashboard metrics table component

use super::super::state::DashboardState;

use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Row, Table};

/// Render the metrics table, or a placeholder until stats arrive.
pub fn render_metrics_table(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let block = Block::default()
        .title("METRICS")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::LightBlue))
        .padding(Padding::horizontal(1));

    let Some(table) = &state.table else {
        let placeholder = Paragraph::new("No stats loaded yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(placeholder, area);
        return;
    };

    let columns = table.headers.len().max(1);
    let header = Row::new(table.headers.clone()).style(
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD),
    );
    let rows = table
        .rows
        .iter()
        .map(|row| Row::new(row.clone()).style(Style::default().fg(Color::White)));
    let widths = vec![Constraint::Ratio(1, columns as u32); columns];

    let widget = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(2);
    f.render_widget(widget, area);
}
