//! # qualitywatch-chart
//!
//! A strip-chart accumulator for streams of named quality measures.
//!
//! Feed it `(timestamp, {series: value})` observations and it keeps, per
//! series, a polyline that fits a fixed-size canvas:
//!
//! - time is mapped with a quadratic power scale shared by all series, so
//!   the most recent part of the run gets the most horizontal room;
//! - each series has its own linear value scale, so measures of very
//!   different magnitudes stay readable side by side;
//! - samples that would land within `decimate_threshold` pixels of the
//!   previous committed sample are dropped from storage, bounding memory by
//!   the canvas width rather than by the length of the run; the newest
//!   sample is always kept.
//!
//! The crate does no drawing. Renderers read [`StripChart::project`] /
//! [`StripChart::polyline`] and [`StripChart::x_ticks`] and draw them on
//! whatever surface they have.
//!
//! ## Example
//!
//! ```rust
//! use qualitywatch_chart::StripChart;
//!
//! let mut chart = StripChart::new(120.0, 40.0);
//! for step in 0..500 {
//!     let t = step as f64 * 0.1;
//!     chart.add(t, [("loss", 1.0 / (1.0 + t))]);
//! }
//!
//! let loss = chart.get("loss").unwrap();
//! assert!(loss.len() < 500);
//! assert_eq!(loss.palette_index(), 0);
//! ```
//!
//! ## Threading
//!
//! A chart is plain data mutated through `&mut self`; share it between
//! threads behind a lock.

mod chart;
pub mod palette;
pub mod scale;
mod series;
pub mod ticks;

pub use chart::{AddOutcome, Margins, PlotArea, StripChart, DEFAULT_DECIMATE_THRESHOLD, TIME_EXPONENT};
pub use palette::Rgb;
pub use scale::{LinearScale, PowScale, Scale};
pub use series::{Point, Sample, Series};
pub use ticks::Tick;
