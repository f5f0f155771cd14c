//! Per-series sample storage and decimation.

use crate::palette::{self, Rgb};
use crate::scale::{LinearScale, PowScale, Scale};

/// One raw measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    pub timestamp: f64,
    pub value: f64,
}

/// A projected point in pixel space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A named sequence of samples drawn as one polyline.
///
/// Samples are kept in insertion order. Decimation removes samples for
/// good; only the retained ones are stored.
#[derive(Debug, Clone)]
pub struct Series {
    name: String,
    label: String,
    palette_index: usize,
    color: Rgb,
    samples: Vec<Sample>,
    min_value: f64,
    max_value: f64,
}

impl Series {
    pub(crate) fn new(name: &str, palette_index: usize, first_value: f64) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            palette_index,
            color: palette::color(palette_index),
            samples: Vec::new(),
            min_value: first_value,
            max_value: first_value,
        }
    }

    /// Series key as it appears in observations.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Order of first appearance, starting at zero.
    pub fn palette_index(&self) -> usize {
        self.palette_index
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Retained samples, oldest first.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recent sample.
    pub fn last(&self) -> Option<Sample> {
        self.samples.last().copied()
    }

    /// `(min, max)` over every value ever observed, including dropped ones.
    pub fn value_range(&self) -> (f64, f64) {
        (self.min_value, self.max_value)
    }

    /// Vertical scale for this series inside `[top, bottom]`.
    pub fn y_scale(&self, top: f64, bottom: f64) -> LinearScale {
        LinearScale::new((self.min_value, self.max_value), (bottom, top))
    }

    pub(crate) fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    /// Widen the value range and append a sample.
    pub(crate) fn observe(&mut self, timestamp: f64, value: f64) {
        self.min_value = self.min_value.min(value);
        self.max_value = self.max_value.max(value);
        self.samples.push(Sample { timestamp, value });
    }

    /// Compact the samples in place against the current time scale.
    ///
    /// A sample is committed if it is the first, or if its projected x is
    /// more than `threshold` pixels from the last committed sample. The
    /// newest sample is always kept as a provisional tail, exempt from
    /// spacing. Later samples are still measured against the last committed
    /// x, so a stale tail is dropped on the next pass once a newer one
    /// arrives. Returns the number of samples removed.
    pub(crate) fn decimate(&mut self, x: &PowScale, threshold: f64) -> usize {
        let n = self.samples.len();
        if n < 2 {
            return 0;
        }

        let mut write = 1;
        let mut committed_x = x.project(self.samples[0].timestamp);
        for read in 1..n {
            let sample = self.samples[read];
            let px = x.project(sample.timestamp);
            if (px - committed_x).abs() > threshold {
                committed_x = px;
            } else if read != n - 1 {
                continue;
            }
            self.samples[write] = sample;
            write += 1;
        }
        self.samples.truncate(write);
        n - write
    }

    /// Project the retained samples.
    pub(crate) fn project(&self, x: &PowScale, top: f64, bottom: f64) -> Vec<Point> {
        let y = self.y_scale(top, bottom);
        self.samples
            .iter()
            .map(|s| Point {
                x: x.project(s.timestamp),
                y: y.project(s.value),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(max_ts: f64) -> PowScale {
        PowScale::new(2.0).with_domain(0.0, max_ts).with_range(0.0, 100.0)
    }

    #[test]
    fn observe_widens_range() {
        let mut s = Series::new("q", 0, 5.0);
        s.observe(0.0, 5.0);
        s.observe(1.0, 2.0);
        s.observe(2.0, 9.0);
        assert_eq!(s.value_range(), (2.0, 9.0));
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn decimate_keeps_spaced_samples() {
        let mut s = Series::new("q", 0, 1.0);
        for t in 0..=10 {
            s.observe(t as f64 * 10.0, 1.0);
        }
        // 0..100 onto 0..100 squared: x = t^2 / 100, gaps grow with t
        let dropped = s.decimate(&scale(100.0), 5.0);
        assert!(dropped > 0);

        let xs: Vec<f64> = s.samples().iter().map(|p| scale(100.0).project(p.timestamp)).collect();
        for pair in xs[1..].windows(2) {
            assert!(pair[1] - pair[0] > 5.0);
        }
    }

    #[test]
    fn newest_sample_is_a_provisional_tail() {
        let mut s = Series::new("q", 0, 0.0);
        s.observe(0.0, 0.0);
        s.observe(90.0, 1.0);
        s.observe(100.0, 2.0);
        s.decimate(&scale(100.0), 1.0);
        assert_eq!(s.len(), 3);

        // 100.5 lands within the threshold of 100 but is kept as the tail
        s.observe(100.5, 3.0);
        s.decimate(&scale(100.5), 1.5);
        let ts: Vec<f64> = s.samples().iter().map(|p| p.timestamp).collect();
        assert_eq!(ts, vec![0.0, 90.0, 100.0, 100.5]);

        // once 101 arrives, 100.5 is measured against 100 and dropped
        s.observe(101.0, 4.0);
        s.decimate(&scale(101.0), 1.5);
        let ts: Vec<f64> = s.samples().iter().map(|p| p.timestamp).collect();
        assert_eq!(ts, vec![0.0, 90.0, 100.0, 101.0]);
    }

    #[test]
    fn dense_tail_keeps_committing_points() {
        let mut s = Series::new("q", 0, 0.0);
        let x = |t: f64| PowScale::new(2.0).with_domain(0.0, t).with_range(0.0, 400.0);
        for i in 0..=2_000 {
            let t = i as f64;
            s.observe(t, (t * 0.05).sin());
            s.decimate(&x(t), 2.0);
        }
        let scale = x(2_000.0);
        let xs: Vec<f64> = s.samples().iter().map(|p| scale.project(p.timestamp)).collect();
        let max_gap = xs.windows(2).map(|w| w[1] - w[0]).fold(0.0, f64::max);
        assert!(s.len() >= 50, "only {} samples retained", s.len());
        assert!(max_gap <= 20.0, "largest gap {} px", max_gap);
    }

    #[test]
    fn first_sample_is_never_replaced() {
        let mut s = Series::new("q", 0, 1.0);
        s.observe(1.0, 1.0);
        s.observe(1.0, 1.0);
        s.observe(1.0, 1.0);
        s.decimate(&scale(1.0), 2.0);
        assert_eq!(s.len(), 2);
        assert_eq!(s.samples()[0], Sample { timestamp: 1.0, value: 1.0 });
    }

    #[test]
    fn single_sample_is_untouched() {
        let mut s = Series::new("q", 0, 1.0);
        s.observe(3.0, 1.0);
        assert_eq!(s.decimate(&scale(3.0), 50.0), 0);
        assert_eq!(s.len(), 1);
    }
}
