//! The strip-chart accumulator.

use std::collections::HashMap;

use crate::scale::{PowScale, Scale};
use crate::series::{Point, Series};
use crate::ticks::{axis_ticks, tick_count, Tick};

/// Exponent of the time scale.
pub const TIME_EXPONENT: f64 = 2.0;

/// Default minimum horizontal spacing, in pixels, between retained samples.
pub const DEFAULT_DECIMATE_THRESHOLD: f64 = 2.0;

/// Space kept free around the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 2.0,
            right: 2.0,
            bottom: 4.0,
            left: 2.0,
        }
    }
}

/// Pixel bounds of the plot area inside the margins.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlotArea {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Vertical centre.
    pub fn mid_y(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }
}

/// What a call to [`StripChart::add`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddOutcome {
    /// The time range widened, so the x-axis ticks were rebuilt.
    pub axis_changed: bool,
    /// Series seen for the first time.
    pub new_series: usize,
    /// Samples removed by decimation.
    pub dropped: usize,
}

/// Accumulates timestamped measures per series and keeps, for each series,
/// a decimated polyline that fits the canvas.
///
/// Time is mapped with a quadratic power scale shared by every series, so
/// recent history gets more horizontal room than old history. Values are
/// mapped per series with an independent linear scale.
///
/// Decimation is destructive: samples that would render within
/// `decimate_threshold` pixels of the previous committed sample are removed
/// from storage, which keeps memory proportional to the canvas width. The
/// newest sample of each series is always kept so the line reaches the
/// latest reading.
///
/// # Example
///
/// ```rust
/// use qualitywatch_chart::StripChart;
///
/// let mut chart = StripChart::new(200.0, 60.0);
/// chart.add(0.0, [("loss", 0.9), ("accuracy", 0.4)]);
/// chart.add(1.0, [("loss", 0.7), ("accuracy", 0.55)]);
///
/// assert_eq!(chart.series().len(), 2);
/// assert_eq!(chart.time_range(), Some((0.0, 1.0)));
/// let line = chart.polyline("loss").unwrap();
/// assert_eq!(line.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct StripChart {
    width: f64,
    height: f64,
    margins: Margins,
    decimate_threshold: f64,
    time_range: Option<(f64, f64)>,
    x_scale: PowScale,
    /// Series in order of first appearance.
    series: Vec<Series>,
    index: HashMap<String, usize>,
    next_color: usize,
    ticks: Vec<Tick>,
}

impl StripChart {
    /// Create an empty chart with the given canvas size.
    pub fn new(width: f64, height: f64) -> Self {
        let mut chart = Self {
            width: 0.0,
            height: 0.0,
            margins: Margins::default(),
            decimate_threshold: DEFAULT_DECIMATE_THRESHOLD,
            time_range: None,
            x_scale: PowScale::new(TIME_EXPONENT),
            series: Vec::new(),
            index: HashMap::new(),
            next_color: 0,
            ticks: Vec::new(),
        };
        chart.initialize(width, height);
        chart
    }

    /// Set the canvas size, restore default margins and forget every series.
    ///
    /// The decimation threshold is kept.
    pub fn initialize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.margins = Margins::default();
        self.time_range = None;
        self.series.clear();
        self.index.clear();
        self.next_color = 0;
        self.ticks.clear();
        self.rebuild_x_scale();
    }

    /// Ingest one observation.
    ///
    /// `measures` yields `(series name, value)` pairs. Values and the
    /// timestamp must be finite; timestamps are expected not to decrease.
    pub fn add<I, K>(&mut self, timestamp: f64, measures: I) -> AddOutcome
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut outcome = AddOutcome::default();

        let widened = match self.time_range {
            None => (timestamp, timestamp),
            Some((lo, hi)) => (lo.min(timestamp), hi.max(timestamp)),
        };
        outcome.axis_changed = self.time_range != Some(widened);
        self.time_range = Some(widened);
        self.rebuild_x_scale();

        let mut touched = Vec::new();
        for (name, value) in measures {
            let name = name.as_ref();
            let idx = match self.index.get(name) {
                Some(&idx) => idx,
                None => {
                    let idx = self.series.len();
                    self.series.push(Series::new(name, self.next_color, value));
                    self.index.insert(name.to_string(), idx);
                    self.next_color += 1;
                    outcome.new_series += 1;
                    idx
                }
            };
            self.series[idx].observe(timestamp, value);
            touched.push(idx);
        }

        // a wider time range re-projects every series, not just this batch
        if outcome.axis_changed {
            outcome.dropped = self.decimate_all();
            self.refresh_ticks();
        } else {
            for idx in touched {
                outcome.dropped += self.series[idx].decimate(&self.x_scale, self.decimate_threshold);
            }
        }

        outcome
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Change the canvas width. Samples that end up too close are dropped.
    pub fn set_width(&mut self, px: f64) {
        self.width = px.max(0.0);
        self.regeometry();
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Change the canvas height. Only vertical projection is affected.
    pub fn set_height(&mut self, px: f64) {
        self.height = px.max(0.0);
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
        self.regeometry();
    }

    pub fn decimate_threshold(&self) -> f64 {
        self.decimate_threshold
    }

    /// Change the minimum pixel spacing and re-decimate every series.
    pub fn set_decimate_threshold(&mut self, px: f64) {
        self.decimate_threshold = px.max(0.0);
        self.decimate_all();
    }

    /// Bounds of the plot area.
    pub fn plot_area(&self) -> PlotArea {
        PlotArea {
            left: self.margins.left,
            right: self.width - self.margins.right,
            top: self.margins.top,
            bottom: self.height - self.margins.bottom,
        }
    }

    /// `(min_ts, max_ts)` over every observation, `None` before the first.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.time_range
    }

    /// The shared time scale.
    pub fn x_scale(&self) -> &PowScale {
        &self.x_scale
    }

    /// Every series, in order of first appearance.
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.index.get(name).map(|&idx| &self.series[idx])
    }

    /// Override a series' display label. Returns false for unknown series.
    pub fn set_label(&mut self, name: &str, label: &str) -> bool {
        match self.index.get(name) {
            Some(&idx) => {
                self.series[idx].set_label(label);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Total retained samples across all series.
    pub fn sample_count(&self) -> usize {
        self.series.iter().map(Series::len).sum()
    }

    /// Projected polyline for a series.
    pub fn polyline(&self, name: &str) -> Option<Vec<Point>> {
        self.get(name).map(|s| self.project(s))
    }

    /// Projected polyline for a series obtained from [`series`](Self::series).
    pub fn project(&self, series: &Series) -> Vec<Point> {
        let area = self.plot_area();
        series.project(&self.x_scale, area.top, area.bottom)
    }

    /// Current x-axis ticks.
    pub fn x_ticks(&self) -> &[Tick] {
        &self.ticks
    }

    fn rebuild_x_scale(&mut self) {
        let (lo, hi) = self.time_range.unwrap_or((0.0, 0.0));
        let area = self.plot_area();
        self.x_scale = PowScale::new(TIME_EXPONENT)
            .with_domain(lo, hi)
            .with_range(area.left, area.right);
    }

    fn regeometry(&mut self) {
        self.rebuild_x_scale();
        self.decimate_all();
        self.refresh_ticks();
    }

    fn decimate_all(&mut self) -> usize {
        let (scale, threshold) = (self.x_scale, self.decimate_threshold);
        self.series.iter_mut().map(|s| s.decimate(&scale, threshold)).sum()
    }

    fn refresh_ticks(&mut self) {
        self.ticks = match self.time_range {
            Some(_) => axis_ticks(&self.x_scale, tick_count(self.plot_area().width())),
            None => Vec::new(),
        };
    }
}

impl Default for StripChart {
    fn default() -> Self {
        Self::new(400.0, 100.0)
    }
}
