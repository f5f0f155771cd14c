// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # qualitywatch
//!
//! A terminal strip chart for watching the quality measures of a
//! progressive computation converge.
//!
//! A computation reports named measures (loss, error, accuracy, ...) as
//! [`Observation`]s. This crate receives them from a source (a tailed
//! JSON-lines file, a TCP stream or an in-process channel), validates them,
//! feeds them into a [`StripChart`] and draws the result with ratatui.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│  chart   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(decimate)│    │(canvas) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | StreamSource | ChannelSource  │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view switching and user controls
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with implementations
//!   for file tailing, TCP streams, and channel-based input
//! - **[`data`]**: Validation, per-series history for sparklines, chart export
//! - **[`ui`]**: Terminal rendering using ratatui - Braille chart, series table,
//!   and theme support
//! - **[`settings`]** / **[`logging`]**: Layered configuration and tracing setup
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Tail a JSON-lines file written by a reporter
//! qualitywatch --file quality.jsonl
//!
//! # Read observations from a TCP connection
//! qualitywatch --connect localhost:9090
//! ```
//!
//! ### As a library with file source
//!
//! ```
//! use qualitywatch::{App, FileSource};
//! use qualitywatch_chart::StripChart;
//!
//! let source = Box::new(FileSource::new("quality.jsonl"));
//! let app = App::new(source, StripChart::new(160.0, 80.0));
//! ```
//!
//! ### As a library with stream source (TCP, etc.)
//!
//! ```no_run
//! use std::io::Cursor;
//! use qualitywatch::{App, StreamSource};
//! use qualitywatch_chart::StripChart;
//!
//! # tokio_test::block_on(async {
//! // Example with a cursor (in practice, use TcpStream)
//! let data = b"{\"timestamp\":0.5,\"measures\":{\"q.loss\":0.3}}\n";
//! let stream = Cursor::new(data.to_vec());
//! let source = StreamSource::spawn(stream, "example");
//! let app = App::new(Box::new(source), StripChart::new(160.0, 80.0));
//! # });
//! ```
//!
//! ### As a library with channel source
//!
//! ```
//! use qualitywatch::{App, ChannelSource, Observation};
//! use qualitywatch_chart::StripChart;
//!
//! let (tx, source) = ChannelSource::create("in-process", 64);
//! let mut app = App::new(Box::new(source), StripChart::new(160.0, 80.0));
//!
//! tx.try_send(Observation::builder().timestamp(0.5).measure("q.loss", 0.3).build()).unwrap();
//! assert_eq!(app.reload_data(), 1);
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod logging;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use data::{ChartExport, History, ObservationError, SeriesExport, Validator};
pub use qualitywatch_chart::StripChart;
pub use qualitywatch_types::Observation;
pub use settings::{ConfigError, Settings};
pub use source::{ChannelSource, DataSource, FileSource, StreamSource};
