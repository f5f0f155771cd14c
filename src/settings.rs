//! Layered settings: defaults, an optional TOML file, then environment.
//!
//! Environment variables use the `QUALITYWATCH_` prefix with `__` between
//! nested keys, e.g. `QUALITYWATCH_CHART__DECIMATE_THRESHOLD=3`. Command
//! line flags are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use qualitywatch_chart::{Margins, DEFAULT_DECIMATE_THRESHOLD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::duration::parse_duration;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "QUALITYWATCH";

/// Errors from loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file or environment could not be read or deserialized.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but makes no sense.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Chart geometry and decimation.
///
/// `width` and `height` size the virtual canvas used by export mode; the
/// interactive view sizes its canvas from the terminal instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: f64,
    pub height: f64,
    pub decimate_threshold: f64,
    pub margins: Margins,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 200.0,
            decimate_threshold: DEFAULT_DECIMATE_THRESHOLD,
            margins: Margins::default(),
        }
    }
}

/// Viewer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chart: ChartSettings,
    /// How often sources are polled, as a duration string.
    pub refresh: String,
    pub log_file: PathBuf,
    /// Filter used when `QUALITYWATCH_LOG` is unset.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chart: ChartSettings::default(),
            refresh: "250ms".to_string(),
            log_file: PathBuf::from("qualitywatch.log"),
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(path, None)
    }

    /// Like [`load`](Self::load) with an explicit environment map.
    pub(crate) fn load_from(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the chart or the poll loop cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let chart = &self.chart;
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, v)))
            }
        };
        positive("chart.width", chart.width)?;
        positive("chart.height", chart.height)?;
        positive("chart.decimate_threshold", chart.decimate_threshold)?;

        let m = chart.margins;
        if [m.top, m.right, m.bottom, m.left].iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::Invalid("chart.margins must be non-negative".to_string()));
        }
        if m.left + m.right >= chart.width || m.top + m.bottom >= chart.height {
            return Err(ConfigError::Invalid("chart.margins leave no plot area".to_string()));
        }

        self.refresh_interval()?;
        Ok(())
    }

    /// Parsed `refresh`.
    pub fn refresh_interval(&self) -> Result<Duration, ConfigError> {
        let d = parse_duration(&self.refresh)
            .map_err(|e| ConfigError::Invalid(format!("refresh: {}", e)))?;
        if d.is_zero() {
            return Err(ConfigError::Invalid("refresh must be non-zero".to_string()));
        }
        Ok(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::load_from(None, env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.refresh_interval().unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
refresh = "1s"

[chart]
width = 1200.0
decimate_threshold = 4.0
"#
        )
        .unwrap();

        let settings = Settings::load_from(Some(file.path()), env(&[])).unwrap();
        assert_eq!(settings.chart.width, 1200.0);
        assert_eq!(settings.chart.height, 200.0);
        assert_eq!(settings.chart.decimate_threshold, 4.0);
        assert_eq!(settings.refresh_interval().unwrap(), Duration::from_secs(1));
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[chart]\nheight = 300.0").unwrap();

        let settings = Settings::load_from(
            Some(file.path()),
            env(&[
                ("QUALITYWATCH_CHART__HEIGHT", "120"),
                ("QUALITYWATCH_LOG_FILTER", "debug"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.chart.height, 120.0);
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Settings::load_from(Some(Path::new("/nonexistent/qw.toml")), env(&[]));
        assert!(matches!(err, Err(ConfigError::Load(_))));
    }

    #[test]
    fn rejects_non_positive_threshold() {
        let mut settings = Settings::default();
        settings.chart.decimate_threshold = 0.0;
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_margins_wider_than_canvas() {
        let mut settings = Settings::default();
        settings.chart.margins.left = 500.0;
        settings.chart.margins.right = 400.0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("no plot area"));
    }

    #[test]
    fn rejects_bad_refresh() {
        let mut settings = Settings::default();
        settings.refresh = "soon".to_string();
        assert!(settings.validate().is_err());
        settings.refresh = "0ms".to_string();
        assert!(settings.validate().is_err());
    }
}
