//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

/// Render the header bar with a summary of the chart.
///
/// Displays: live indicator, series count, observations received, arrival rate, retained
/// points, rejected observations and the pause state.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let series = app.chart.series().len();
    let rate = app
        .history
        .rate()
        .map(|r| format!("{:.1}/s", r))
        .unwrap_or_else(|| "-".to_string());
    let rejected = app.validator.rejected();

    let mut spans = vec![
        Span::styled(" ● ", Style::default().fg(indicator_color(app))),
        Span::styled("QUALITYWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(format!("{}", series), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" series │ "),
        Span::raw(format!("{} obs │ ", format_count(app.history.total))),
        Span::raw(format!("{} │ ", rate)),
        Span::raw(format!("{} pts │ ", format_count(app.chart.sample_count() as u64))),
        if rejected > 0 {
            Span::styled(
                format!("{}", format_count(rejected)),
                Style::default().fg(app.theme.warning),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" rejected"),
    ];

    if app.paused {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            "PAUSED",
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Color of the live indicator: source error, paused, receiving, or idle.
fn indicator_color(app: &App) -> Color {
    if app.load_error.is_some() {
        app.theme.critical
    } else if app.paused {
        app.theme.warning
    } else if app.last_update.is_some() {
        app.theme.healthy
    } else {
        app.theme.border
    }
}

/// Format a count for display (e.g., 1234 -> "1.2K", 1234567 -> "1.2M").
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = [View::Chart, View::Series]
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!(" {}:{} ", i + 1, view.label())))
        .collect();

    let selected = match app.current_view {
        View::Chart => 0,
        View::Series => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Temporary status messages win over source errors, which win over the
/// regular source and controls line.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref err) = app.load_error {
        let paragraph = Paragraph::new(format!(" {}: {} | r:retry q:quit", app.source_description(), err))
            .style(Style::default().fg(app.theme.critical));
        frame.render_widget(paragraph, area);
        return;
    }

    let updated = match app.last_update {
        Some(at) => format!("Updated {:.1}s ago", at.elapsed().as_secs_f64()),
        None => "Waiting for data".to_string(),
    };
    let controls = match app.current_view {
        View::Chart => "+/-:threshold p:pause Tab:switch ?:help q:quit",
        View::Series => "↑↓:select space:show/hide Tab:switch ?:help q:quit",
    };
    let status = format!(" {} | {} | {}", app.source_description(), updated, controls);

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(" Navigation", bold)]),
        Line::from("  Tab 1/2     Switch views"),
        Line::from("  ↑/↓ j/k     Select series"),
        Line::from("  space       Show/hide series"),
        Line::from(""),
        Line::from(vec![Span::styled(" Chart", bold)]),
        Line::from("  +/-         Decimation threshold"),
        Line::from("  p           Pause/resume"),
        Line::from("  c           Reset chart"),
        Line::from(""),
        Line::from(vec![Span::styled(" General", bold)]),
        Line::from("  r           Poll now"),
        Line::from("  e           Export to JSON"),
        Line::from("  ?           Toggle help"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_area = centered(area, 40, 22);
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// A `width`×`height` rectangle centred in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(4));
    let h = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}
