//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`chart`]: Braille canvas with every visible series and the time axis
//! - [`series`]: Table of series with latest values and a trend sparkline
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (chart/series::render)               │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Help overlay rendered on top
//! ```

pub mod chart;
pub mod common;
pub mod series;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, View};

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 10;

/// Screen regions shared by every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub header: Rect,
    pub tabs: Rect,
    pub content: Rect,
    pub status: Rect,
}

/// Split the terminal into header, tabs, content and status bar.
pub fn regions(area: Rect) -> Regions {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(1), // Tabs
        Constraint::Min(4),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    Regions {
        header: chunks[0],
        tabs: chunks[1],
        content: chunks[2],
        status: chunks[3],
    }
}

/// Size the chart canvas to the content area, in Braille dots.
///
/// Below the minimum terminal size nothing is drawn, so the chart keeps its
/// last size instead of being squeezed.
pub fn fit_chart(app: &mut App, area: Rect) {
    if too_small(area) {
        return;
    }
    let (width, height) = chart::canvas_size(regions(area).content);
    app.fit_chart(width, height);
}

fn too_small(area: Rect) -> bool {
    area.width < MIN_WIDTH || area.height < MIN_HEIGHT
}

/// Draw a full frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if too_small(area) {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let top = (area.height / 2).saturating_sub(2);
        let centered = Rect::new(0, top, area.width, 5.min(area.height - top));
        frame.render_widget(paragraph, centered);
        return;
    }

    let r = regions(area);
    common::render_header(frame, app, r.header);
    common::render_tabs(frame, app, r.tabs);
    match app.current_view {
        View::Chart => chart::render(frame, app, r.content),
        View::Series => series::render(frame, app, r.content),
    }
    common::render_status_bar(frame, app, r.status);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_cover_the_screen() {
        let r = regions(Rect::new(0, 0, 80, 24));
        assert_eq!(r.header.height, 1);
        assert_eq!(r.tabs.y, 1);
        assert_eq!(r.content.height, 21);
        assert_eq!(r.status.y, 23);
    }

    #[test]
    fn fit_chart_uses_braille_resolution() {
        let (_tx, source) = crate::source::ChannelSource::create("test", 1);
        let mut app = App::with_theme(
            Box::new(source),
            qualitywatch_chart::StripChart::new(10.0, 10.0),
            Theme::dark(),
        );
        // content 80x21, inside borders 78x19, minus the axis row 78x18
        fit_chart(&mut app, Rect::new(0, 0, 80, 24));
        assert_eq!(app.chart.width(), 156.0);
        assert_eq!(app.chart.height(), 72.0);
    }

    #[test]
    fn tiny_terminal_leaves_the_chart_alone() {
        use qualitywatch_types::Observation;

        let (_tx, source) = crate::source::ChannelSource::create("test", 1);
        let mut app = App::with_theme(
            Box::new(source),
            qualitywatch_chart::StripChart::new(10.0, 10.0),
            Theme::dark(),
        );
        let full = Rect::new(0, 0, 200, 50);
        fit_chart(&mut app, full);
        for t in 0..2_000 {
            let obs = Observation::builder().timestamp(t as f64).measure("q.loss", (t as f64 * 0.05).sin()).build();
            app.ingest(vec![obs]);
        }
        let before = app.chart.sample_count();
        let size = (app.chart.width(), app.chart.height());

        fit_chart(&mut app, Rect::new(0, 0, 8, 12));
        assert_eq!((app.chart.width(), app.chart.height()), size);
        assert_eq!(app.chart.sample_count(), before);

        fit_chart(&mut app, full);
        assert_eq!(app.chart.sample_count(), before);
    }

    #[test]
    fn draws_every_view_without_panicking() {
        use ratatui::{backend::TestBackend, Terminal};
        use qualitywatch_types::Observation;

        let (_tx, source) = crate::source::ChannelSource::create("test", 1);
        let mut app = App::with_theme(
            Box::new(source),
            qualitywatch_chart::StripChart::new(10.0, 10.0),
            Theme::dark(),
        );
        for t in 0..20 {
            let obs = Observation::builder()
                .timestamp(t as f64)
                .measure("q.loss", 1.0 / (t as f64 + 1.0))
                .measure("q.acc", t as f64)
                .build();
            app.ingest(vec![obs]);
        }

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        fit_chart(&mut app, Rect::new(0, 0, 80, 24));
        for view in [View::Chart, View::Series] {
            app.set_view(view);
            terminal.draw(|f| draw(f, &app)).unwrap();
        }
        app.toggle_help();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let mut tiny = Terminal::new(TestBackend::new(20, 5)).unwrap();
        tiny.draw(|f| draw(f, &app)).unwrap();
    }
}
