//! The main Reporter type for collecting and emitting observations.

use std::sync::Arc;
use std::time::Duration;

use qualitywatch_types::Observation;

use crate::handle::SourceHandle;
use crate::output::Output;
use crate::state::GlobalState;

/// Default time between two emitted observations.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(3);

/// The main entry point for reporting quality measures.
///
/// A Reporter keeps the latest measure of every registered source and
/// periodically emits them as one observation to the configured outputs.
/// Observation timestamps are seconds since the reporter was built.
///
/// # Example
///
/// ```rust,no_run
/// use qualitywatch_sdk::{Output, Reporter};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let reporter = Reporter::builder()
///         .output(Output::file("quality.jsonl"))
///         .period(Duration::from_secs(1))
///         .build();
///
///     let handle = reporter.register("tsne");
///
///     // Start background emission
///     let emission = reporter.start();
///
///     for step in 0..100 {
///         handle.record("kl_divergence", 5.0 / (step as f64 + 1.0));
///         tokio::time::sleep(Duration::from_millis(100)).await;
///     }
///
///     emission.stop();
/// }
/// ```
#[derive(Debug)]
pub struct Reporter {
    state: Arc<GlobalState>,
    outputs: Arc<Vec<Output>>,
    period: Duration,
}

impl Reporter {
    /// Create a new reporter with default settings.
    ///
    /// By default, no outputs are configured and the period is 3 seconds.
    pub fn new() -> Self {
        Self {
            state: Arc::new(GlobalState::default()),
            outputs: Arc::new(Vec::new()),
            period: DEFAULT_PERIOD,
        }
    }

    /// Create a builder for configuring the reporter.
    pub fn builder() -> ReporterBuilder {
        ReporterBuilder::new()
    }

    /// Register a source and get a handle for recording its measures.
    ///
    /// If a source with this name already exists, returns a handle to
    /// the existing source.
    pub fn register(&self, name: &str) -> SourceHandle {
        SourceHandle {
            state: self.state.register_source(name),
            name: name.to_string(),
        }
    }

    /// Unregister a source and remove it from internal state.
    ///
    /// Returns `true` if the source was found and removed. Existing handles
    /// keep working but their measures are no longer emitted unless the
    /// source is registered again.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qualitywatch_sdk::Reporter;
    ///
    /// let reporter = Reporter::new();
    /// let handle = reporter.register("warmup");
    /// handle.record("loss", 0.9);
    ///
    /// assert!(reporter.unregister("warmup"));
    /// assert!(reporter.collect().is_none());
    /// ```
    pub fn unregister(&self, name: &str) -> bool {
        self.state.unregister_source(name)
    }

    /// Collect the latest measures into an observation.
    ///
    /// Returns `None` when nothing has been recorded.
    pub fn collect(&self) -> Option<Observation> {
        self.state.collect()
    }

    /// The emission period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start background emission of observations.
    ///
    /// This spawns a tokio task that collects and emits an observation to
    /// all configured outputs every period. Periods with nothing recorded
    /// emit nothing.
    ///
    /// Returns a handle that can be used to stop the emission.
    #[cfg(feature = "tokio")]
    pub fn start(&self) -> EmissionHandle {
        use tokio::sync::watch;

        let (stop_tx, stop_rx) = watch::channel(false);
        let state = self.state.clone();
        let outputs = self.outputs.clone();
        let period = self.period;

        tracing::info!(
            period_ms = period.as_millis() as u64,
            outputs = outputs.len(),
            "starting quality emission"
        );

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(period);
            let mut stop_rx = stop_rx;

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        if let Some(observation) = state.collect() {
                            emit_all(&outputs, &observation).await;
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::info!("quality emission stopped");
        });

        EmissionHandle { stop_tx }
    }

    /// Emit an observation to all outputs immediately.
    ///
    /// Returns the emitted observation, or `None` if nothing was recorded.
    #[cfg(feature = "tokio")]
    pub async fn emit_now(&self) -> Option<Observation> {
        let observation = self.state.collect()?;
        emit_all(&self.outputs, &observation).await;
        Some(observation)
    }
}

#[cfg(feature = "tokio")]
async fn emit_all(outputs: &[Output], observation: &Observation) {
    for output in outputs {
        match output.emit(observation).await {
            Ok(()) => tracing::debug!(
                output = %output.describe(),
                timestamp = observation.timestamp,
                measures = observation.len(),
                "emitted observation"
            ),
            Err(e) => tracing::warn!(output = %output.describe(), error = %e, "emit failed"),
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a Reporter.
#[derive(Debug, Default)]
pub struct ReporterBuilder {
    outputs: Vec<Output>,
    period: Option<Duration>,
}

impl ReporterBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an output destination.
    ///
    /// Multiple outputs can be added; observations are emitted to all of them.
    pub fn output(mut self, output: Output) -> Self {
        self.outputs.push(output);
        self
    }

    /// Set the emission period.
    ///
    /// Defaults to 3 seconds if not specified.
    pub fn period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }

    /// Build the reporter.
    pub fn build(self) -> Reporter {
        Reporter {
            state: Arc::new(GlobalState::default()),
            outputs: Arc::new(self.outputs),
            period: self.period.unwrap_or(DEFAULT_PERIOD),
        }
    }
}

/// Handle for controlling background emission.
///
/// Call `stop()` or drop this handle to stop emission.
#[cfg(feature = "tokio")]
#[derive(Debug)]
pub struct EmissionHandle {
    stop_tx: tokio::sync::watch::Sender<bool>,
}

#[cfg(feature = "tokio")]
impl EmissionHandle {
    /// Stop background emission.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_new() {
        let reporter = Reporter::new();
        let handle = reporter.register("test-source");
        assert_eq!(handle.name(), "test-source");
    }

    #[test]
    fn default_period_is_three_seconds() {
        let reporter = Reporter::new();
        assert_eq!(reporter.period(), Duration::from_secs(3));
        assert!(reporter.outputs.is_empty());
    }

    #[test]
    fn test_builder() {
        let reporter = Reporter::builder()
            .output(Output::file("quality.jsonl"))
            .output(Output::tcp("localhost:9090"))
            .period(Duration::from_millis(500))
            .build();

        assert_eq!(reporter.period(), Duration::from_millis(500));
        assert_eq!(reporter.outputs.len(), 2);
    }

    #[test]
    fn register_same_source_twice_shares_measures() {
        let reporter = Reporter::new();

        let h1 = reporter.register("tsne");
        let h2 = reporter.register("tsne");

        h1.record("kl", 2.0);
        h2.record("grad", 0.5);

        let obs = reporter.collect().unwrap();
        assert_eq!(obs.len(), 2);
    }

    #[test]
    fn collect_includes_schema_version() {
        let reporter = Reporter::new();
        reporter.register("s").record("m", 1.0);
        assert!(reporter.collect().unwrap().version.is_compatible());
    }

    #[test]
    fn unregister_nonexistent_source() {
        let reporter = Reporter::new();
        let handle = reporter.register("a");
        handle.record("m", 1.0);

        assert!(!reporter.unregister("b"));
        assert_eq!(reporter.collect().unwrap().len(), 1);
    }

    #[test]
    fn reregister_starts_fresh() {
        let reporter = Reporter::new();

        let old = reporter.register("worker");
        old.record("loss", 0.5);
        assert!(reporter.unregister("worker"));

        // The old handle still records, but into detached state
        old.record("loss", 0.4);
        assert!(reporter.collect().is_none());

        let new = reporter.register("worker");
        new.record("loss", 0.3);
        assert_eq!(reporter.collect().unwrap().get("worker.loss"), Some(0.3));
    }

    #[test]
    fn unregister_multiple_times_is_safe() {
        let reporter = Reporter::new();
        reporter.register("source");

        assert!(reporter.unregister("source"));
        assert!(!reporter.unregister("source"));
    }

    #[tokio::test]
    async fn emit_now_sends_to_outputs() {
        let (output, mut rx) = Output::channel(4);
        let reporter = Reporter::builder().output(output).build();

        assert!(reporter.emit_now().await.is_none());

        reporter.register("kmeans").record("inertia", 10.0);
        let sent = reporter.emit_now().await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), sent);
    }

    #[tokio::test(start_paused = true)]
    async fn background_emission_follows_period() {
        let (output, mut rx) = Output::channel(16);
        let reporter = Reporter::builder()
            .output(output)
            .period(Duration::from_millis(100))
            .build();
        reporter.register("tsne").record("kl", 1.0);

        let emission = reporter.start();
        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.get("tsne.kl"), Some(1.0));
        assert!(second.timestamp >= first.timestamp);

        emission.stop();
        tokio::time::sleep(Duration::from_millis(250)).await;
        while rx.try_recv().is_ok() {}

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_periods_emit_nothing() {
        let (output, mut rx) = Output::channel(16);
        let reporter = Reporter::builder()
            .output(output)
            .period(Duration::from_millis(100))
            .build();

        let emission = reporter.start();
        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!(rx.try_recv().is_err());
        emission.stop();
    }
}
