//! Observation - a timestamped batch of quality measures.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::SchemaVersion;

/// A set of named scalar measures taken at one instant.
///
/// Producers emit one observation per reporting period. Each key names a
/// series; a viewer plots every series as its own line.
///
/// # Example
///
/// ```rust
/// use qualitywatch_types::Observation;
///
/// let obs = Observation::builder()
///     .timestamp(12.5)
///     .measure("kmeans.inertia", 0.82)
///     .measure("kmeans.moved", 14.0)
///     .build();
///
/// assert_eq!(obs.len(), 2);
/// assert_eq!(obs.get("kmeans.moved"), Some(14.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct Observation {
    /// Schema version for forward compatibility.
    ///
    /// Optional on the wire: bare `{"timestamp": .., "measures": ..}`
    /// lines are read as the current version.
    #[cfg_attr(feature = "serde", serde(default))]
    #[cfg_attr(feature = "minicbor", n(0))]
    pub version: SchemaVersion,

    /// Seconds on the producer's clock.
    #[cfg_attr(feature = "minicbor", n(1))]
    pub timestamp: f64,

    /// Measure values keyed by series name.
    #[cfg_attr(feature = "serde", serde(default))]
    #[cfg_attr(feature = "minicbor", n(2))]
    pub measures: BTreeMap<String, f64>,
}

impl Observation {
    /// Create an empty observation at the given timestamp.
    pub fn new(timestamp: f64) -> Self {
        Self {
            version: SchemaVersion::current(),
            timestamp,
            measures: BTreeMap::new(),
        }
    }

    /// Create a builder for constructing observations.
    pub fn builder() -> ObservationBuilder {
        ObservationBuilder::new()
    }

    /// Number of measures carried.
    pub fn len(&self) -> usize {
        self.measures.len()
    }

    /// True when no measure is carried.
    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    /// Value of a single measure.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.measures.get(name).copied()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.measures.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// True if the timestamp and every value are finite numbers.
    ///
    /// Charts assume finite input; viewers drop observations failing this.
    pub fn is_finite(&self) -> bool {
        self.timestamp.is_finite() && self.measures.values().all(|v| v.is_finite())
    }
}

/// Builder for [`Observation`].
#[derive(Debug, Default)]
pub struct ObservationBuilder {
    timestamp: f64,
    measures: BTreeMap<String, f64>,
}

impl ObservationBuilder {
    /// Create a new builder with timestamp zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timestamp (seconds).
    pub fn timestamp(mut self, ts: f64) -> Self {
        self.timestamp = ts;
        self
    }

    /// Add or replace one measure.
    pub fn measure(mut self, name: impl Into<String>, value: f64) -> Self {
        self.measures.insert(name.into(), value);
        self
    }

    /// Add several measures at once.
    pub fn measures<I, K>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        self.measures.extend(iter.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Build the observation.
    pub fn build(self) -> Observation {
        Observation {
            version: SchemaVersion::current(),
            timestamp: self.timestamp,
            measures: self.measures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_replaces_duplicate_measure() {
        let obs = Observation::builder()
            .timestamp(1.0)
            .measure("loss", 0.5)
            .measure("loss", 0.25)
            .build();

        assert_eq!(obs.len(), 1);
        assert_eq!(obs.get("loss"), Some(0.25));
    }

    #[test]
    fn measures_extends_from_iterator() {
        let obs = Observation::builder()
            .measures([("a", 1.0), ("b", 2.0)])
            .build();

        let names: Vec<&str> = obs.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn non_finite_values_are_detected() {
        assert!(Observation::builder().measure("x", 1.0).build().is_finite());
        assert!(!Observation::builder().measure("x", f64::NAN).build().is_finite());
        assert!(!Observation::builder()
            .timestamp(f64::INFINITY)
            .measure("x", 1.0)
            .build()
            .is_finite());
    }

    #[test]
    fn empty_observation() {
        let obs = Observation::new(3.0);
        assert!(obs.is_empty());
        assert_eq!(obs.timestamp, 3.0);
        assert!(obs.version.is_compatible());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_without_version_uses_current() {
        let obs: Observation =
            serde_json::from_str(r#"{"timestamp": 2.5, "measures": {"loss": 0.1}}"#).unwrap();
        assert_eq!(obs.version, SchemaVersion::current());
        assert_eq!(obs.get("loss"), Some(0.1));
    }

    #[cfg(feature = "minicbor")]
    #[test]
    fn cbor_preserves_measures() {
        let obs = Observation::builder().timestamp(4.0).measure("q", 0.75).build();
        let bytes = minicbor::to_vec(&obs).unwrap();
        let decoded: Observation = minicbor::decode(&bytes).unwrap();
        assert_eq!(decoded, obs);
    }
}
