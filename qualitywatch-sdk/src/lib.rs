//! # qualitywatch-sdk
//!
//! Instrumentation SDK for emitting progressive quality measures to
//! qualitywatch.
//!
//! Long-running computations (embeddings, clustering, training loops)
//! record quality measures as they progress. A [`Reporter`] keeps the latest
//! value of each measure and periodically emits one observation, stamped
//! with seconds since the reporter started, to files, TCP or a channel.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qualitywatch_sdk::{Output, Reporter};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Emit an observation every three seconds
//!     let reporter = Reporter::builder()
//!         .output(Output::file("quality.jsonl"))
//!         .period(Duration::from_secs(3))
//!         .build();
//!
//!     // Register a source and get a handle for recording measures
//!     let tsne = reporter.register("tsne");
//!
//!     // Start background emission (non-blocking)
//!     let emission = reporter.start();
//!
//!     // Record measures as the computation progresses
//!     tsne.record("kl_divergence", 1.92);
//!     tsne.record("gradient_norm", 0.004);
//!
//!     // ... your computation runs ...
//!     emission.stop();
//! }
//! ```
//!
//! ## Features
//!
//! - **Simple API**: `register()` a source, `record()` its measures
//! - **Multiple outputs**: JSON-lines file, TCP, or channel
//! - **Background emission**: Periodic observations on a tokio task
//! - **Thread-safe**: Use from any thread or async task

mod error;
mod handle;
mod output;
mod reporter;
mod state;

pub use error::ReporterError;
pub use handle::SourceHandle;
pub use output::Output;
pub use reporter::{Reporter, ReporterBuilder, DEFAULT_PERIOD};

#[cfg(feature = "tokio")]
pub use reporter::EmissionHandle;

// Re-export types for convenience
pub use qualitywatch_types::{Observation, SchemaVersion};
