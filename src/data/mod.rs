//! Data processing between the sources and the chart.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "3s", "250ms")
//! - [`export`]: Serializable snapshot of a chart ([`ChartExport`])
//! - [`history`]: Recent raw values for sparklines and the arrival rate
//! - [`validate`]: Rejection of malformed observations ([`ObservationError`])
//!
//! ## Data Flow
//!
//! ```text
//! Observation (from a DataSource)
//!        │
//!        ▼
//! Validator::check()  ──▶ rejected (counted, logged)
//!        │
//!        ├──▶ StripChart::add() (decimated polylines)
//!        │
//!        └──▶ History::record() (for sparklines)
//! ```

pub mod duration;
pub mod export;
pub mod history;
pub mod validate;

pub use export::{ChartExport, SeriesExport};
pub use history::History;
pub use validate::{ObservationError, Validator};
