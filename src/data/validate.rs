//! Rejection of observations the chart cannot take.

use qualitywatch_types::Observation;
use thiserror::Error;
use tracing::warn;

/// Why an observation was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObservationError {
    /// Timestamp is NaN or infinite.
    #[error("Non-finite timestamp {0}")]
    NonFiniteTimestamp(f64),

    /// A measure value is NaN or infinite.
    #[error("Non-finite value {value} for series '{series}'")]
    NonFiniteValue { series: String, value: f64 },

    /// Timestamp is earlier than one already accepted.
    #[error("Timestamp {timestamp} is before the last accepted {last}")]
    OutOfOrder { timestamp: f64, last: f64 },
}

/// Check a single observation on its own.
pub fn validate(obs: &Observation) -> Result<(), ObservationError> {
    if !obs.timestamp.is_finite() {
        return Err(ObservationError::NonFiniteTimestamp(obs.timestamp));
    }
    if let Some((series, value)) = obs.iter().find(|(_, v)| !v.is_finite()) {
        return Err(ObservationError::NonFiniteValue {
            series: series.to_string(),
            value,
        });
    }
    Ok(())
}

/// Stateful gate in front of a chart.
///
/// On top of [`validate`], it requires timestamps to be non-decreasing
/// across observations and counts everything it turns away.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    last_timestamp: Option<f64>,
    rejected: u64,
    last_error: Option<ObservationError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept or reject `obs`. Accepted observations advance the clock.
    pub fn check(&mut self, obs: &Observation) -> Result<(), ObservationError> {
        let result = validate(obs).and_then(|()| match self.last_timestamp {
            Some(last) if obs.timestamp < last => Err(ObservationError::OutOfOrder {
                timestamp: obs.timestamp,
                last,
            }),
            _ => Ok(()),
        });

        match &result {
            Ok(()) => self.last_timestamp = Some(obs.timestamp),
            Err(e) => {
                warn!(error = %e, "rejected observation");
                self.rejected += 1;
                self.last_error = Some(e.clone());
            }
        }
        result
    }

    /// Number of observations rejected so far.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn last_error(&self) -> Option<&ObservationError> {
        self.last_error.as_ref()
    }

    /// Forget the clock and the counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(ts: f64, value: f64) -> Observation {
        Observation::builder().timestamp(ts).measure("loss", value).build()
    }

    #[test]
    fn finite_observation_passes() {
        assert_eq!(validate(&obs(1.0, 0.5)), Ok(()));
    }

    #[test]
    fn non_finite_timestamp_is_rejected() {
        assert_eq!(
            validate(&obs(f64::INFINITY, 0.5)),
            Err(ObservationError::NonFiniteTimestamp(f64::INFINITY))
        );
    }

    #[test]
    fn non_finite_value_names_the_series() {
        let err = validate(&obs(1.0, f64::NAN)).unwrap_err();
        match err {
            ObservationError::NonFiniteValue { series, value } => {
                assert_eq!(series, "loss");
                assert!(value.is_nan());
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn validator_rejects_going_back_in_time() {
        let mut v = Validator::new();
        assert!(v.check(&obs(2.0, 1.0)).is_ok());
        assert!(v.check(&obs(2.0, 1.0)).is_ok());
        assert_eq!(
            v.check(&obs(1.0, 1.0)),
            Err(ObservationError::OutOfOrder { timestamp: 1.0, last: 2.0 })
        );
        assert!(v.check(&obs(3.0, 1.0)).is_ok());
        assert_eq!(v.rejected(), 1);
    }

    #[test]
    fn rejected_observation_does_not_move_clock() {
        let mut v = Validator::new();
        v.check(&obs(5.0, 1.0)).unwrap();
        assert!(v.check(&obs(9.0, f64::NAN)).is_err());
        assert!(v.check(&obs(6.0, 1.0)).is_ok());
        assert!(matches!(v.last_error(), Some(ObservationError::NonFiniteValue { .. })));
    }

    #[test]
    fn reset_clears_state() {
        let mut v = Validator::new();
        v.check(&obs(5.0, 1.0)).unwrap();
        let _ = v.check(&obs(1.0, 1.0));
        v.reset();
        assert_eq!(v.rejected(), 0);
        assert!(v.check(&obs(1.0, 1.0)).is_ok());
    }
}
