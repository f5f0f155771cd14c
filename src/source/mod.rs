//! Data source abstraction for receiving observations.
//!
//! Every source yields [`Observation`]s in arrival order. Files are tailed,
//! streams are read on a background task and channels are drained; all of
//! them are polled from the UI loop without blocking.

mod channel;
mod file;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use stream::StreamSource;

use std::fmt::Debug;

use qualitywatch_types::Observation;

/// Trait for receiving observations from various sources.
///
/// # Example
///
/// ```
/// use qualitywatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("quality.jsonl");
/// for obs in source.poll() {
///     println!("t={} with {} measures", obs.timestamp, obs.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Drain every observation that arrived since the last poll.
    ///
    /// Returns an empty vector when nothing is new. Must not block.
    fn poll(&mut self) -> Vec<Observation>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// The last error the source ran into, if any.
    ///
    /// Sources keep running after an error; a malformed line is skipped.
    fn error(&self) -> Option<&str>;

    /// Whether the source started over since the last call, e.g. a tailed
    /// file was truncated by a restarted producer. Clears the flag.
    ///
    /// Observations after a restart begin a new run; their timestamps need
    /// not follow the old ones.
    fn take_restart(&mut self) -> bool {
        false
    }
}

/// Parse one line of newline-delimited JSON.
///
/// Blank lines yield `None`.
pub(crate) fn parse_line(line: &str) -> Option<Result<Observation, serde_json::Error>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str(line))
}

/// Parse one raw line without requiring it to be valid UTF-8.
///
/// Invalid bytes surface as a JSON error rather than a read failure.
pub(crate) fn parse_bytes(line: &[u8]) -> Option<Result<Observation, serde_json::Error>> {
    let start = line.iter().position(|b| !b.is_ascii_whitespace())?;
    let end = line.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(start, |i| i + 1);
    Some(serde_json::from_slice(&line[start..end]))
}
