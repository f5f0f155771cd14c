//! Chart view rendering.
//!
//! Draws the projected polylines of every visible series on a Braille
//! canvas. Each terminal cell holds 2×4 Braille dots, so the chart's pixel
//! space is measured in dots. The row under the canvas carries the x-axis
//! tick labels.

use qualitywatch_chart::{Point, Tick};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Context, Line as Segment, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};

use crate::app::App;

/// Braille dots per terminal cell, horizontally.
pub const DOTS_PER_COL: f64 = 2.0;
/// Braille dots per terminal cell, vertically.
pub const DOTS_PER_ROW: f64 = 4.0;

/// Cell area of the canvas and of the axis label row inside the view.
pub fn canvas_rects(content: Rect) -> (Rect, Rect) {
    let inner = Block::default().borders(Borders::ALL).inner(content);
    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
    (chunks[0], chunks[1])
}

/// Canvas size in dots for a content area.
pub fn canvas_size(content: Rect) -> (f64, f64) {
    let (canvas, _) = canvas_rects(content);
    (
        canvas.width as f64 * DOTS_PER_COL,
        canvas.height as f64 * DOTS_PER_ROW,
    )
}

/// Render the chart view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(
            " Quality [{} series, threshold {:.1} dots] ",
            app.chart.series().len(),
            app.chart.decimate_threshold()
        ))
        .title_bottom(legend(app))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    frame.render_widget(block, area);

    let (canvas_area, axis_area) = canvas_rects(area);

    if app.chart.is_empty() {
        let waiting = Paragraph::new(format!("Waiting for observations from {}", app.source_description()))
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(waiting, canvas_area);
        return;
    }

    let height = app.chart.height();
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, app.chart.width()])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            let selected = app.selected().map(|s| s.name());
            // selected series last so it stays on top
            let ordered = app
                .chart
                .series()
                .iter()
                .filter(|s| Some(s.name()) != selected)
                .chain(app.selected());
            for series in ordered {
                if !app.is_visible(series.name()) {
                    continue;
                }
                let color = app.theme.series_color(series.color());
                draw_polyline(ctx, &app.chart.project(series), height, color);
            }
        });
    frame.render_widget(canvas, canvas_area);

    let labels = layout_tick_labels(app.chart.x_ticks(), axis_area.width as usize);
    frame.render_widget(
        Paragraph::new(labels).style(Style::default().fg(app.theme.axis)),
        axis_area,
    );
}

/// Draw consecutive points as segments, flipping y to the canvas's upward axis.
fn draw_polyline(ctx: &mut Context, points: &[Point], height: f64, color: ratatui::style::Color) {
    match points {
        [] => {}
        [only] => ctx.draw(&Points {
            coords: &[(only.x, height - only.y)],
            color,
        }),
        _ => {
            for pair in points.windows(2) {
                ctx.draw(&Segment::new(
                    pair[0].x,
                    height - pair[0].y,
                    pair[1].x,
                    height - pair[1].y,
                    color,
                ));
            }
        }
    }
}

/// Colored labels of the visible series.
fn legend(app: &App) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for series in app.chart.series() {
        if !app.is_visible(series.name()) {
            continue;
        }
        spans.push(Span::styled("■ ", app.theme.series_style(series.color(), true)));
        spans.push(Span::raw(format!("{} ", series.label())));
    }
    Line::from(spans)
}

/// Place tick labels under their dot positions in a row `width` cells wide.
///
/// Labels are centred on their tick, clamped to the row, and skipped when
/// they would touch the previous label.
pub fn layout_tick_labels(ticks: &[Tick], width: usize) -> String {
    let mut row = vec![' '; width];
    let mut next_free = 0;

    for tick in ticks {
        let label: Vec<char> = tick.label.chars().collect();
        if label.is_empty() || label.len() > width {
            continue;
        }
        let col = (tick.position / DOTS_PER_COL).round().max(0.0) as usize;
        let start = col.saturating_sub(label.len() / 2).min(width - label.len());
        if start < next_free {
            continue;
        }
        row[start..start + label.len()].copy_from_slice(&label);
        next_free = start + label.len() + 1;
    }

    row.into_iter().collect::<String>().trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(position: f64, label: &str) -> Tick {
        Tick {
            value: 0.0,
            position,
            label: label.to_string(),
        }
    }

    #[test]
    fn labels_sit_under_their_ticks() {
        let ticks = [tick(0.0, "0"), tick(100.0, "5"), tick(200.0, "10")];
        let row = layout_tick_labels(&ticks, 101);
        assert_eq!(row.chars().next(), Some('0'));
        assert_eq!(row.chars().nth(50), Some('5'));
        assert!(row.ends_with("10"));
        assert_eq!(row.chars().count(), 101);
    }

    #[test]
    fn crowded_labels_are_skipped() {
        let ticks = [tick(0.0, "100"), tick(4.0, "200"), tick(40.0, "300")];
        let row = layout_tick_labels(&ticks, 40);
        assert!(row.contains("100"));
        assert!(!row.contains("200"));
        assert!(row.contains("300"));
    }

    #[test]
    fn oversized_labels_are_dropped() {
        let row = layout_tick_labels(&[tick(0.0, "123456")], 4);
        assert!(row.is_empty());
    }

    #[test]
    fn canvas_size_counts_dots() {
        // 40x12 content: borders leave 38x10, the axis row leaves 38x9
        let (w, h) = canvas_size(Rect::new(0, 0, 40, 12));
        assert_eq!(w, 76.0);
        assert_eq!(h, 36.0);
    }
}
