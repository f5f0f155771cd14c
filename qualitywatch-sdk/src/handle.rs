//! Source handle for recording quality measures.

use std::sync::Arc;

use tracing::debug;

use crate::state::SourceState;

/// A handle for recording the quality measures of one source.
///
/// A source is typically one progressive computation (an embedding, a
/// clustering run, a training loop). Obtain a handle by calling
/// `Reporter::register()`; each measure becomes the series
/// `"{source}.{measure}"` on the viewer.
///
/// # Example
///
/// ```rust
/// use qualitywatch_sdk::Reporter;
///
/// let reporter = Reporter::new();
/// let handle = reporter.register("tsne");
///
/// handle.record("kl_divergence", 1.92);
/// handle.record("gradient_norm", 0.004);
///
/// let obs = reporter.collect().unwrap();
/// assert_eq!(obs.get("tsne.kl_divergence"), Some(1.92));
/// ```
#[derive(Debug, Clone)]
pub struct SourceHandle {
    pub(crate) state: Arc<SourceState>,
    pub(crate) name: String,
}

impl SourceHandle {
    /// Record the latest value of a measure.
    ///
    /// Only the most recent value is kept until the next emission.
    /// Non-finite values (NaN, infinities) are ignored.
    pub fn record(&self, measure: &str, value: f64) {
        if !value.is_finite() {
            debug!(source = %self.name, measure, value, "ignoring non-finite measure");
            return;
        }
        self.state.record(measure, value);
    }

    /// Record several measures at once.
    pub fn record_all<'a, I>(&self, measures: I)
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        for (measure, value) in measures {
            self.record(measure, value);
        }
    }

    /// Drop every measure recorded so far.
    ///
    /// The source stays registered but contributes nothing to observations
    /// until it records again.
    pub fn clear(&self) {
        self.state.clear();
    }

    /// Get the source name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use crate::Reporter;

    #[test]
    fn record_and_collect() {
        let reporter = Reporter::new();
        let handle = reporter.register("kmeans");

        handle.record("inertia", 512.0);
        handle.record("moved", 14.0);

        let obs = reporter.collect().unwrap();
        assert_eq!(obs.get("kmeans.inertia"), Some(512.0));
        assert_eq!(obs.get("kmeans.moved"), Some(14.0));
    }

    #[test]
    fn latest_value_wins() {
        let reporter = Reporter::new();
        let handle = reporter.register("tsne");

        handle.record("kl", 3.0);
        handle.record("kl", 2.0);

        let obs = reporter.collect().unwrap();
        assert_eq!(obs.get("tsne.kl"), Some(2.0));
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let reporter = Reporter::new();
        let handle = reporter.register("tsne");

        handle.record("kl", f64::NAN);
        handle.record("grad", f64::INFINITY);
        assert!(reporter.collect().is_none());

        handle.record("kl", 1.0);
        handle.record("kl", f64::NEG_INFINITY);
        assert_eq!(reporter.collect().unwrap().get("tsne.kl"), Some(1.0));
    }

    #[test]
    fn record_all_records_each_pair() {
        let reporter = Reporter::new();
        let handle = reporter.register("umap");

        handle.record_all([("loss", 0.5), ("epoch", 3.0)]);

        let obs = reporter.collect().unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs.get("umap.epoch"), Some(3.0));
    }

    #[test]
    fn clear_removes_source_from_observations() {
        let reporter = Reporter::new();
        let a = reporter.register("a");
        let b = reporter.register("b");

        a.record("m", 1.0);
        b.record("m", 2.0);
        a.clear();

        let obs = reporter.collect().unwrap();
        assert_eq!(obs.len(), 1);
        assert_eq!(obs.get("b.m"), Some(2.0));
    }

    #[test]
    fn handle_name() {
        let reporter = Reporter::new();
        let handle = reporter.register("my-source");
        assert_eq!(handle.name(), "my-source");
    }

    #[test]
    fn cloned_handles_share_state() {
        let reporter = Reporter::new();
        let h1 = reporter.register("src");
        let h2 = h1.clone();

        h1.record("m", 1.0);
        h2.record("m", 4.0);

        assert_eq!(reporter.collect().unwrap().get("src.m"), Some(4.0));
    }
}
