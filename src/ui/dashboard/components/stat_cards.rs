//! Stat cards component
//!
//! One bordered card per stat slot

use super::super::state::DashboardState;
use super::super::utils::get_stat_color;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

pub fn render_stat_cards(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let cards = state.cards.cards();
    let constraints = vec![Constraint::Ratio(1, cards.len().max(1) as u32); cards.len()];
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (card, chunk) in cards.iter().zip(chunks.iter()) {
        let color = get_stat_color(card.style);
        let widget = Paragraph::new(card.value.clone())
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .block(
                Block::default()
                    .title(card.label)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(widget, *chunk);
    }
}
