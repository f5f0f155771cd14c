//! File-based data source.
//!
//! Tails a JSON-lines file of observations.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use qualitywatch_types::Observation;
use tracing::{debug, info, warn};

use super::{parse_line, DataSource};

/// A data source that tails a file of newline-delimited observations.
///
/// This is the mode used with the SDK's file output: the producer appends
/// one JSON object per line and this source picks up complete lines as
/// they appear. A trailing partial line is left for the next poll. If the
/// file shrinks (truncated or replaced), reading restarts from the top.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    /// Byte offset just past the last complete line consumed.
    offset: u64,
    /// Set when the file shrank and reading started over.
    restarted: bool,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            offset: 0,
            restarted: false,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset of the next unread line.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read everything appended since the last poll, up to the last newline.
    fn read_new(&mut self) -> std::io::Result<String> {
        let mut file = File::open(&self.path)?;
        let len = file.metadata()?.len();
        if len < self.offset {
            info!(path = %self.path.display(), "file shrank, reading from the start");
            self.offset = 0;
            self.restarted = true;
        }
        if len == self.offset {
            return Ok(String::new());
        }

        file.seek(SeekFrom::Start(self.offset))?;
        let mut buf = Vec::with_capacity((len - self.offset) as usize);
        file.take(len - self.offset).read_to_end(&mut buf)?;

        let complete = match buf.iter().rposition(|b| *b == b'\n') {
            Some(pos) => pos + 1,
            None => return Ok(String::new()),
        };
        buf.truncate(complete);
        self.offset += complete as u64;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Vec<Observation> {
        let text = match self.read_new() {
            Ok(text) => text,
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                return Vec::new();
            }
        };

        let mut observations = Vec::new();
        let mut parse_error = None;
        for (n, line) in text.lines().enumerate() {
            match parse_line(line) {
                Some(Ok(obs)) => observations.push(obs),
                Some(Err(e)) => {
                    warn!(path = %self.path.display(), line = n + 1, error = %e, "skipping malformed line");
                    parse_error = Some(format!("Parse error: {}", e));
                }
                None => {}
            }
        }

        if !observations.is_empty() {
            debug!(count = observations.len(), offset = self.offset, "read observations");
        }
        if parse_error.is_some() || !observations.is_empty() {
            self.last_error = parse_error;
        }
        observations
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn take_restart(&mut self) -> bool {
        std::mem::take(&mut self.restarted)
    }
}
