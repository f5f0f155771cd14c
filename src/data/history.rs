//! Recent raw values for sparklines and the arrival rate.
//!
//! The chart keeps a decimated, whole-run view; history keeps the last few
//! raw readings per series so the table can show a short-term trend.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use qualitywatch_types::Observation;

/// Maximum number of readings kept per series, and of arrival instants.
const MAX_HISTORY_SIZE: usize = 60;

/// Tracks recent values for trending and sparklines.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Recent raw values per series (series name -> readings).
    pub series_values: HashMap<String, VecDeque<f64>>,
    /// Arrival instants of accepted observations.
    pub arrivals: VecDeque<Instant>,
    /// Observations recorded since creation or the last clear.
    pub total: u64,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation that arrived now.
    pub fn record(&mut self, obs: &Observation) {
        self.record_at(obs, Instant::now());
    }

    /// Record an observation with an explicit arrival instant.
    pub fn record_at(&mut self, obs: &Observation, arrived: Instant) {
        for (name, value) in obs.iter() {
            let values = self.series_values.entry(name.to_string()).or_default();
            values.push_back(value);
            if values.len() > MAX_HISTORY_SIZE {
                values.pop_front();
            }
        }

        self.arrivals.push_back(arrived);
        if self.arrivals.len() > MAX_HISTORY_SIZE {
            self.arrivals.pop_front();
        }
        self.total += 1;
    }

    /// Recent values of a series, oldest first.
    pub fn values(&self, series: &str) -> Option<&VecDeque<f64>> {
        self.series_values.get(series)
    }

    /// Sparkline data for a series (normalized to 0-7 for 8 bar levels).
    ///
    /// Returns an empty Vec if there's not enough history. A flat series
    /// sits in the middle band.
    pub fn sparkline(&self, series: &str) -> Vec<u8> {
        let Some(values) = self.series_values.get(series) else {
            return Vec::new();
        };
        if values.len() < 2 {
            return Vec::new();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;

        values
            .iter()
            .map(|&v| {
                if range == 0.0 {
                    return 3;
                }
                let normalized = ((v - min) / range * 7.0).round() as u8;
                normalized.min(7)
            })
            .collect()
    }

    /// Observations per second over the retained arrival window.
    ///
    /// Returns None if there's not enough history to calculate a rate.
    pub fn rate(&self) -> Option<f64> {
        if self.arrivals.len() < 2 {
            return None;
        }
        let first = self.arrivals.front()?;
        let last = self.arrivals.back()?;
        let elapsed = last.duration_since(*first).as_secs_f64();

        if elapsed > 0.0 {
            Some((self.arrivals.len() - 1) as f64 / elapsed)
        } else {
            None
        }
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn obs(ts: f64, loss: f64) -> Observation {
        Observation::builder().timestamp(ts).measure("loss", loss).build()
    }

    #[test]
    fn keeps_last_sixty_values() {
        let mut history = History::new();
        for i in 0..100 {
            history.record(&obs(i as f64, i as f64));
        }

        let values = history.values("loss").unwrap();
        assert_eq!(values.len(), MAX_HISTORY_SIZE);
        assert_eq!(values.front(), Some(&40.0));
        assert_eq!(history.total, 100);
    }

    #[test]
    fn sparkline_spans_all_levels() {
        let mut history = History::new();
        for v in [0.0, 1.0, 7.0] {
            history.record(&obs(v, v));
        }
        assert_eq!(history.sparkline("loss"), vec![0, 1, 7]);
    }

    #[test]
    fn flat_sparkline_is_mid_band() {
        let mut history = History::new();
        history.record(&obs(0.0, 2.0));
        history.record(&obs(1.0, 2.0));
        assert_eq!(history.sparkline("loss"), vec![3, 3]);
    }

    #[test]
    fn sparkline_needs_two_values() {
        let mut history = History::new();
        assert!(history.sparkline("loss").is_empty());
        history.record(&obs(0.0, 1.0));
        assert!(history.sparkline("loss").is_empty());
    }

    #[test]
    fn rate_from_arrivals() {
        let mut history = History::new();
        let start = Instant::now();
        for i in 0..5 {
            history.record_at(&obs(i as f64, 1.0), start + Duration::from_millis(250 * i));
        }
        let rate = history.rate().unwrap();
        assert!((rate - 4.0).abs() < 1e-9);
    }

    #[test]
    fn rate_needs_elapsed_time() {
        let mut history = History::new();
        let now = Instant::now();
        history.record_at(&obs(0.0, 1.0), now);
        assert!(history.rate().is_none());
        history.record_at(&obs(1.0, 1.0), now);
        assert!(history.rate().is_none());
    }

    #[test]
    fn clear_forgets() {
        let mut history = History::new();
        history.record(&obs(0.0, 1.0));
        history.clear();
        assert!(history.values("loss").is_none());
        assert_eq!(history.total, 0);
    }
}
