//! Application state and navigation logic.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use qualitywatch_chart::{Series, StripChart};
use qualitywatch_types::Observation;
use tracing::{debug, info};

use crate::data::{ChartExport, History, Validator};
use crate::source::DataSource;
use crate::ui::Theme;

/// Smallest decimation threshold reachable from the keyboard, in dots.
pub const MIN_THRESHOLD: f64 = 0.5;

/// Threshold change per `+` / `-` press, in dots.
pub const THRESHOLD_STEP: f64 = 0.5;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Every visible series drawn on one canvas.
    Chart,
    /// Table of series with latest values and a short trend.
    Series,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Chart => View::Series,
            View::Series => View::Chart,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Chart => "Chart",
            View::Series => "Series",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    /// While set, sources are not polled.
    pub paused: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub chart: StripChart,
    pub history: History,
    pub validator: Validator,
    pub load_error: Option<String>,
    pub last_update: Option<Instant>,

    // Navigation state
    pub selected_series: usize,
    /// Series names excluded from the chart view.
    pub hidden: HashSet<String>,

    // UI
    pub theme: Theme,
    pub export_path: PathBuf,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App feeding `chart` from `source`.
    pub fn new(source: Box<dyn DataSource>, chart: StripChart) -> Self {
        Self::with_theme(source, chart, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme.
    pub fn with_theme(source: Box<dyn DataSource>, chart: StripChart, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Chart,
            show_help: false,
            paused: false,
            source,
            chart,
            history: History::new(),
            validator: Validator::new(),
            load_error: None,
            last_update: None,
            selected_series: 0,
            hidden: HashSet::new(),
            theme,
            export_path: PathBuf::from("qualitywatch_export.json"),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source and feed what arrived into the chart.
    ///
    /// Returns the number of observations accepted. Does nothing while
    /// paused.
    pub fn reload_data(&mut self) -> usize {
        if self.paused {
            return 0;
        }
        let batch = self.source.poll();
        if self.source.take_restart() {
            info!(source = self.source.description(), "source restarted");
            self.reset();
            self.set_status_message("Source restarted, chart reset".to_string());
        }
        let accepted = self.ingest(batch);
        self.load_error = self.source.error().map(str::to_string);
        accepted
    }

    /// Validate and add a batch of observations, in order.
    pub fn ingest(&mut self, batch: Vec<Observation>) -> usize {
        let mut accepted = 0;
        for obs in batch {
            if self.validator.check(&obs).is_err() {
                continue;
            }
            let outcome = self.chart.add(obs.timestamp, obs.iter());
            if outcome.new_series > 0 {
                debug!(new = outcome.new_series, total = self.chart.series().len(), "new series");
            }
            self.history.record(&obs);
            accepted += 1;
        }

        if accepted > 0 {
            self.last_update = Some(Instant::now());
            debug!(accepted, retained = self.chart.sample_count(), "ingested batch");
        }
        accepted
    }

    /// Match the chart canvas to the space available, in dots.
    pub fn fit_chart(&mut self, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        if self.chart.width() != width {
            self.chart.set_width(width);
        }
        if self.chart.height() != height {
            self.chart.set_height(height);
        }
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by one series.
    pub fn select_next(&mut self) {
        let max = self.chart.series().len().saturating_sub(1);
        self.selected_series = (self.selected_series + 1).min(max);
    }

    /// Move selection up by one series.
    pub fn select_prev(&mut self) {
        self.selected_series = self.selected_series.saturating_sub(1);
    }

    /// The currently selected series.
    pub fn selected(&self) -> Option<&Series> {
        self.chart.series().get(self.selected_series)
    }

    /// Whether a series is drawn on the chart view.
    pub fn is_visible(&self, name: &str) -> bool {
        !self.hidden.contains(name)
    }

    /// Hide or show the selected series.
    pub fn toggle_selected(&mut self) {
        let Some(name) = self.selected().map(|s| s.name().to_string()) else {
            return;
        };
        if !self.hidden.remove(&name) {
            self.hidden.insert(name);
        }
    }

    /// Change the decimation threshold by `delta` dots.
    pub fn adjust_threshold(&mut self, delta: f64) {
        let current = self.chart.decimate_threshold();
        let next = (current + delta).max(MIN_THRESHOLD);
        if next != current {
            self.chart.set_decimate_threshold(next);
            info!(threshold = next, retained = self.chart.sample_count(), "decimation threshold changed");
        }
        self.set_status_message(format!("Decimation threshold: {:.1} dots", next));
    }

    /// Stop or resume polling the source.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        let msg = if self.paused { "Paused" } else { "Resumed" };
        self.set_status_message(msg.to_string());
    }

    /// Drop every series and start over with the same canvas.
    pub fn reset(&mut self) {
        let (width, height) = (self.chart.width(), self.chart.height());
        let margins = self.chart.margins();
        self.chart.initialize(width, height);
        self.chart.set_margins(margins);
        self.history.clear();
        self.validator.reset();
        self.hidden.clear();
        self.selected_series = 0;
        info!("chart reset");
        self.set_status_message("Chart reset".to_string());
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the chart to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        if self.chart.is_empty() {
            anyhow::bail!("No data to export");
        }
        ChartExport::from_chart(&self.chart).write_to(path)
    }
}
