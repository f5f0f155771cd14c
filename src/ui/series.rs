//! Series table view.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;

const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Number of recent values shown in the trend column.
const TREND_WIDTH: usize = 8;

/// Render the series table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec!["", "Series", "Last", "Min", "Max", "Kept", "Trend"])
        .style(app.theme.header)
        .bottom_margin(0);

    let rows: Vec<Row> = app
        .chart
        .series()
        .iter()
        .map(|series| {
            let visible = app.is_visible(series.name());
            let swatch = if visible { "■" } else { "□" };
            let (min, max) = series.value_range();
            let last = series.last().map(|s| format_value(s.value)).unwrap_or_default();
            let trend = sparkline(&app.history.sparkline(series.name()));

            let label_style = if visible {
                Style::default()
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };

            Row::new(vec![
                Cell::from(Span::styled(swatch, app.theme.series_style(series.color(), visible))),
                Cell::from(Span::styled(series.label().to_string(), label_style)),
                Cell::from(last),
                Cell::from(format_value(min)),
                Cell::from(format_value(max)),
                Cell::from(series.len().to_string()),
                Cell::from(Line::from(Span::styled(
                    trend,
                    app.theme.series_style(series.color(), visible),
                ))),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Min(16),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(TREND_WIDTH as u16 + 1),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Series [{}] ", app.chart.series().len()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("> ");

    let mut state = TableState::default();
    if !app.chart.series().is_empty() {
        state.select(Some(app.selected_series));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

/// Sparkline characters for the last few normalised levels (0..=7).
fn sparkline(levels: &[u8]) -> String {
    let start = levels.len().saturating_sub(TREND_WIDTH);
    levels[start..]
        .iter()
        .map(|&l| SPARK_CHARS[(l as usize).min(SPARK_CHARS.len() - 1)])
        .collect()
}

/// Format a measure value with precision suited to its magnitude.
pub fn format_value(v: f64) -> String {
    let a = v.abs();
    if a == 0.0 {
        "0".to_string()
    } else if a >= 1e6 || a < 1e-3 {
        format!("{:.2e}", v)
    } else if a >= 100.0 {
        format!("{:.1}", v)
    } else if a >= 1.0 {
        format!("{:.2}", v)
    } else {
        format!("{:.4}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_precision_follows_magnitude() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(0.25), "0.2500");
        assert_eq!(format_value(3.14159), "3.14");
        assert_eq!(format_value(-250.04), "-250.0");
        assert_eq!(format_value(2_500_000.0), "2.50e6");
    }

    #[test]
    fn sparkline_keeps_the_newest_levels() {
        assert_eq!(sparkline(&[0, 7, 3]), "▁█▄");
        let long: Vec<u8> = (0..12).map(|i| (i % 8) as u8).collect();
        let s = sparkline(&long);
        assert_eq!(s.chars().count(), TREND_WIDTH);
        assert!(s.starts_with('▅'));
    }
}
