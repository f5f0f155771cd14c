//! Error types for emitting observations.

use thiserror::Error;

/// Errors that can occur when an observation is written to an output.
#[derive(Debug, Error)]
pub enum ReporterError {
    /// The observation could not be encoded as JSON.
    #[error("Failed to serialize observation: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing to a file output failed.
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A TCP output could not be reached.
    #[error("Connection to {addr} failed: {source}")]
    Connection {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The receiving side of a channel output was dropped.
    #[error("Channel receiver dropped")]
    ChannelClosed,
}
