//! Stream-based data source.
//!
//! Receives observations from an async byte stream, such as a TCP
//! connection to a producer's output.

use std::sync::{Arc, Mutex};

use qualitywatch_types::Observation;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{parse_bytes, DataSource};

/// Observations buffered between the reader task and `poll()`.
const BUFFER: usize = 1024;

/// A data source that receives observations from an async stream.
///
/// This source spawns a background task that reads newline-delimited JSON
/// from the provided async reader and makes observations available via
/// `poll()`.
///
/// # Example with a byte stream
///
/// ```
/// use std::io::Cursor;
/// use qualitywatch::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"{\"timestamp\":0.0,\"measures\":{\"loss\":1.0}}\n";
/// let stream = Cursor::new(data.to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<Observation>,
    description: String,
    shared_error: Arc<Mutex<Option<String>>>,
    last_error: Option<String>,
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// The reader should provide newline-delimited JSON observations.
    /// Malformed lines are skipped and reported through `error()`.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(BUFFER);
        let shared_error = Arc::new(Mutex::new(None));
        let error_handle = shared_error.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = Vec::new();

            loop {
                line.clear();
                match reader.read_until(b'\n', &mut line).await {
                    Ok(0) => {
                        debug!("stream reached EOF");
                        set_error(&error_handle, "Connection closed".to_string());
                        break;
                    }
                    Ok(_) => match parse_bytes(&line) {
                        Some(Ok(obs)) => {
                            if tx.send(obs).await.is_err() {
                                // Receiver dropped
                                break;
                            }
                        }
                        Some(Err(e)) => {
                            warn!(error = %e, "skipping malformed observation");
                            set_error(&error_handle, format!("Parse error: {}", e));
                        }
                        None => {}
                    },
                    Err(e) => {
                        warn!(error = %e, "stream read failed");
                        set_error(&error_handle, format!("Read error: {}", e));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("stream: {}", description),
            shared_error,
            last_error: None,
        }
    }

    /// Create a StreamSource from a channel of raw JSON messages.
    ///
    /// Each message holds exactly one observation. This is useful when the
    /// bytes come from a transport that already frames messages.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let (tx, obs_rx) = mpsc::channel(BUFFER);
        let shared_error = Arc::new(Mutex::new(None));
        let error_handle = shared_error.clone();

        tokio::spawn(async move {
            while let Some(bytes) = rx.recv().await {
                match serde_json::from_slice::<Observation>(&bytes) {
                    Ok(obs) => {
                        if tx.send(obs).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "skipping malformed observation");
                        set_error(&error_handle, format!("Parse error: {}", e));
                    }
                }
            }
        });

        Self {
            receiver: obs_rx,
            description: format!("stream: {}", description),
            shared_error,
            last_error: None,
        }
    }
}

fn set_error(slot: &Mutex<Option<String>>, message: String) {
    if let Ok(mut guard) = slot.lock() {
        *guard = Some(message);
    }
}

impl DataSource for StreamSource {
    fn poll(&mut self) -> Vec<Observation> {
        let mut observations = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(obs) => observations.push(obs),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    if self.last_error.is_none() {
                        self.last_error = Some("Stream disconnected".to_string());
                    }
                    break;
                }
            }
        }

        if let Ok(mut shared) = self.shared_error.lock() {
            if let Some(err) = shared.take() {
                self.last_error = Some(err);
            }
        }
        observations
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
