//! Key binding reference drawn over the dashboard

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Bindings grouped by section, in display order
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Data",
        &[
            ("r", "Refresh (keeps fresh cache)"),
            ("c", "Clear cache and reload"),
        ],
    ),
    ("Other", &[("?", "Toggle this help"), ("q, Esc", "Quit")]),
];

const OVERLAY_WIDTH: u16 = 46;

/// Draws the overlay centered on the frame
pub fn render(frame: &mut Frame) {
    let lines = help_lines();
    // Content plus the two border rows
    let height = lines.len() as u16 + 2;
    let area = centered(frame.area(), OVERLAY_WIDTH, height);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn help_lines() -> Vec<Line<'static>> {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();

    for (index, (title, bindings)) in SECTIONS.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(*title, heading)));
        lines.extend(bindings.iter().map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("  {:<10}", keys), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        }));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Esc or ? closes",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
