//! Internal state management for sources and their latest measures.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use qualitywatch_types::Observation;

/// Latest value of each measure recorded by one source.
#[derive(Debug, Default)]
pub struct SourceState {
    measures: RwLock<BTreeMap<String, f64>>,
}

impl SourceState {
    /// Store `value` as the latest reading of `measure`.
    pub fn record(&self, measure: &str, value: f64) {
        let mut measures = self.measures.write();
        match measures.get_mut(measure) {
            Some(slot) => *slot = value,
            None => {
                measures.insert(measure.to_string(), value);
            }
        }
    }

    /// Drop every pending measure.
    pub fn clear(&self) {
        self.measures.write().clear();
    }

    /// Number of measures with a pending value.
    pub fn len(&self) -> usize {
        self.measures.read().len()
    }

    /// Copy the current measures out.
    pub fn collect(&self) -> BTreeMap<String, f64> {
        self.measures.read().clone()
    }
}

/// State shared by the reporter and every handle.
#[derive(Debug)]
pub struct GlobalState {
    pub sources: RwLock<BTreeMap<String, Arc<SourceState>>>,
    /// Zero point of observation timestamps.
    pub started: Instant,
}

impl Default for GlobalState {
    fn default() -> Self {
        Self {
            sources: RwLock::new(BTreeMap::new()),
            started: Instant::now(),
        }
    }
}

impl GlobalState {
    /// Register a new source or get the existing one.
    pub fn register_source(&self, name: &str) -> Arc<SourceState> {
        // Fast path
        {
            let sources = self.sources.read();
            if let Some(state) = sources.get(name) {
                return state.clone();
            }
        }

        // Slow path
        let mut sources = self.sources.write();
        sources
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(SourceState::default()))
            .clone()
    }

    /// Remove a source. Returns `true` if it was registered.
    pub fn unregister_source(&self, name: &str) -> bool {
        self.sources.write().remove(name).is_some()
    }

    /// Seconds elapsed since this state was created.
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Build an observation from every source's latest measures.
    ///
    /// Series are named `"{source}.{measure}"`. Returns `None` when no
    /// source has anything recorded.
    pub fn collect(&self) -> Option<Observation> {
        let sources = self.sources.read();

        let mut builder = Observation::builder().timestamp(self.elapsed());
        let mut any = false;
        for (source, state) in sources.iter() {
            for (measure, value) in state.collect() {
                builder = builder.measure(format!("{}.{}", source, measure), value);
                any = true;
            }
        }

        any.then(|| builder.build())
    }
}
