//! Serializable snapshot of a chart.

use std::path::Path;

use anyhow::{Context, Result};
use qualitywatch_chart::{Margins, Point, Sample, StripChart, Tick, TIME_EXPONENT};
use serde::{Deserialize, Serialize};

/// Everything a renderer needs to redraw a chart, plus the raw retained
/// samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartExport {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub decimate_threshold: f64,
    pub time_exponent: f64,
    /// `[min_ts, max_ts]`, absent before the first observation.
    pub time_range: Option<(f64, f64)>,
    pub ticks: Vec<Tick>,
    pub series: Vec<SeriesExport>,
}

/// One series inside a [`ChartExport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesExport {
    pub name: String,
    pub label: String,
    pub palette_index: usize,
    /// `#rrggbb`.
    pub color: String,
    pub min_value: f64,
    pub max_value: f64,
    pub samples: Vec<Sample>,
    /// Samples projected into pixel space.
    pub points: Vec<Point>,
}

impl ChartExport {
    pub fn from_chart(chart: &StripChart) -> Self {
        let series = chart
            .series()
            .iter()
            .map(|s| {
                let (min_value, max_value) = s.value_range();
                SeriesExport {
                    name: s.name().to_string(),
                    label: s.label().to_string(),
                    palette_index: s.palette_index(),
                    color: s.color().to_hex(),
                    min_value,
                    max_value,
                    samples: s.samples().to_vec(),
                    points: chart.project(s),
                }
            })
            .collect();

        Self {
            width: chart.width(),
            height: chart.height(),
            margins: chart.margins(),
            decimate_threshold: chart.decimate_threshold(),
            time_exponent: TIME_EXPONENT,
            time_range: chart.time_range(),
            ticks: chart.x_ticks().to_vec(),
            series,
        }
    }

    /// Write as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> StripChart {
        let mut chart = StripChart::new(200.0, 50.0);
        chart.add(0.0, [("tsne.kl", 3.0), ("tsne.grad", 0.5)]);
        chart.add(10.0, [("tsne.kl", 1.0)]);
        chart
    }

    #[test]
    fn export_mirrors_chart() {
        let chart = chart();
        let export = ChartExport::from_chart(&chart);

        assert_eq!(export.width, 200.0);
        assert_eq!(export.time_range, Some((0.0, 10.0)));
        assert_eq!(export.series.len(), 2);
        assert!(!export.ticks.is_empty());

        let kl = &export.series[0];
        assert_eq!(kl.name, "tsne.kl");
        assert_eq!(kl.color, "#1f77b4");
        assert_eq!((kl.min_value, kl.max_value), (1.0, 3.0));
        assert_eq!(kl.samples.len(), kl.points.len());
        assert_eq!(kl.points, chart.polyline("tsne.kl").unwrap());
    }

    #[test]
    fn empty_chart_exports() {
        let export = ChartExport::from_chart(&StripChart::new(100.0, 40.0));
        assert!(export.series.is_empty());
        assert_eq!(export.time_range, None);
    }

    #[test]
    fn writes_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");

        let export = ChartExport::from_chart(&chart());
        export.write_to(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: ChartExport = serde_json::from_str(&text).unwrap();
        assert_eq!(back.series.len(), 2);
        assert_eq!(back.series[1].label, "tsne.grad");
    }
}
