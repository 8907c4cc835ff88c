//! Dashboard screen rendering
//!
//! Header with the clock, one bordered panel per category, and a footer with
//! key hints and data age.

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::format::row_columns;
use crate::app::App;
use crate::data::{InstrumentKind, QuoteRow, QuoteStatus};

/// Width of the label column
const LABEL_WIDTH: usize = 18;

/// Width of the price column
const PRICE_WIDTH: usize = 14;

const KINDS: [InstrumentKind; 3] = [
    InstrumentKind::Stock,
    InstrumentKind::Crypto,
    InstrumentKind::Forex,
];

/// Color for a row's change column
fn change_color(row: &QuoteRow) -> Color {
    match &row.status {
        QuoteStatus::Live(quote) => match quote.change {
            Some(change) if change.non_negative => Color::Green,
            Some(_) => Color::Red,
            None => Color::Gray,
        },
        QuoteStatus::Placeholder(_) => Color::Yellow,
        QuoteStatus::Unavailable => Color::DarkGray,
    }
}

/// Renders the dashboard screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let panel_heights: Vec<Constraint> = KINDS
        .iter()
        .map(|kind| {
            let rows = app
                .snapshot
                .as_ref()
                .map(|s| s.rows(*kind).len())
                .unwrap_or(0);
            Constraint::Length(rows.max(1) as u16 + 2)
        })
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Clock header
            Constraint::Min(3),    // Panels
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_header(frame, chunks[0]);

    let panels = Layout::default()
        .direction(Direction::Vertical)
        .constraints(panel_heights)
        .split(chunks[1]);
    for (kind, panel) in KINDS.iter().zip(panels.iter()) {
        render_panel(frame, app, *kind, *panel);
    }

    render_help(frame, chunks[2], app);
}

/// Renders a loading message while data is being fetched
pub fn render_loading(frame: &mut Frame) {
    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Loading quotes...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Renders the title, clock and date
fn render_header(frame: &mut Frame, area: Rect) {
    let now = Local::now();

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "TICKERBOARD",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                now.format("%H:%M:%S").to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                now.format("%A %-d %B %Y").to_string(),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Line::from(Span::styled(
            "─".repeat(area.width.saturating_sub(2) as usize),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

/// Renders one category panel
fn render_panel(frame: &mut Frame, app: &App, kind: InstrumentKind, area: Rect) {
    let rows = app.snapshot.as_ref().map(|s| s.rows(kind)).unwrap_or(&[]);

    let lines: Vec<Line> = if rows.is_empty() {
        vec![Line::from(Span::styled(
            "Nothing tracked",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        rows.iter().map(render_row).collect()
    };

    let block = Block::default()
        .title(format!(" {} ", kind.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_row(row: &QuoteRow) -> Line<'static> {
    let (price, change) = row_columns(row);
    Line::from(vec![
        Span::styled(
            format!(" {:<width$}", row.instrument.display_label(), width = LABEL_WIDTH),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:>width$}  ", price, width = PRICE_WIDTH),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(change, Style::default().fg(change_color(row))),
    ])
}

/// Renders key hints and data freshness
fn render_help(frame: &mut Frame, area: Rect, app: &App) {
    let mut help_spans = vec![
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Refresh  "),
        Span::styled("c", Style::default().fg(Color::Yellow)),
        Span::raw(" Clear cache  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" Help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ];

    if app.loading {
        help_spans.push(Span::styled(" │ Updating...", Style::default().fg(Color::Cyan)));
    } else if let Some(last_refresh) = app.last_refresh() {
        help_spans.push(Span::styled(
            format!(" │ Updated {}", last_refresh.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph =
        Paragraph::new(Line::from(help_spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Snapshot;
    use crate::data::{Instrument, Quote};
    use crate::quote::derive_change;
    use ratatui::{backend::TestBackend, Terminal};

    fn row(symbol: &str, status: QuoteStatus) -> QuoteRow {
        QuoteRow {
            kind: InstrumentKind::Stock,
            instrument: Instrument::new(symbol),
            status,
        }
    }

    fn live(price: f64, previous: f64) -> QuoteStatus {
        QuoteStatus::Live(Quote {
            price,
            change: derive_change(price, previous),
            currency: Some("USD".to_string()),
        })
    }

    fn buffer_text(app: &App) -> String {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn test_app(snapshot: Snapshot) -> App {
        let mut app = App::new(crate::testing::offline_dashboard());
        app.snapshot = Some(snapshot);
        app.state = crate::app::AppState::Dashboard;
        app
    }

    #[test]
    fn test_change_color() {
        assert_eq!(change_color(&row("A", live(110.0, 100.0))), Color::Green);
        assert_eq!(change_color(&row("A", live(100.0, 100.0))), Color::Green);
        assert_eq!(change_color(&row("A", live(90.0, 100.0))), Color::Red);
        assert_eq!(change_color(&row("A", QuoteStatus::Unavailable)), Color::DarkGray);
    }

    #[test]
    fn test_dashboard_renders_rows_and_panels() {
        let app = test_app(Snapshot {
            stocks: vec![
                row("AAPL", live(110.0, 100.0)),
                row("TSLA", QuoteStatus::Unavailable),
            ],
            crypto: vec![],
            forex: vec![],
            refreshed_at: Local::now(),
        });

        let content = buffer_text(&app);

        assert!(content.contains("TICKERBOARD"));
        assert!(content.contains("Stocks"));
        assert!(content.contains("Crypto"));
        assert!(content.contains("Currencies"));
        assert!(content.contains("AAPL"));
        assert!(content.contains("$110.00"));
        assert!(content.contains("+10.00 (+10.00%)"));
        assert!(content.contains("Offline"));
        assert!(content.contains("Nothing tracked"));
        assert!(content.contains("Updated"));
    }

    #[test]
    fn test_loading_renders() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(render_loading).unwrap();
        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("Loading quotes"));
    }
}
