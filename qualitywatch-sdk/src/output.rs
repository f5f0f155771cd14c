//! Output backends for emitting observations.

use std::path::PathBuf;

use qualitywatch_types::Observation;

#[cfg(feature = "tokio")]
use crate::error::ReporterError;

/// Output destination for observations.
///
/// Configure where the reporter should emit observations.
#[derive(Debug)]
pub enum Output {
    /// Append observations to a file as JSON lines.
    ///
    /// The file is created if missing and never truncated, so the viewer
    /// can tail it.
    File(PathBuf),

    /// Send observations to a TCP server.
    ///
    /// Each observation is sent as a newline-delimited JSON message.
    Tcp(String),

    /// Send observations through a channel.
    ///
    /// Use `Output::channel()` to create this variant and get the receiver.
    #[cfg(feature = "tokio")]
    Channel(tokio::sync::mpsc::Sender<Observation>),
}

impl Output {
    /// Create a file output.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qualitywatch_sdk::Output;
    ///
    /// let output = Output::file("quality.jsonl");
    /// ```
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Output::File(path.into())
    }

    /// Create a TCP output.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qualitywatch_sdk::Output;
    ///
    /// let output = Output::tcp("localhost:9090");
    /// ```
    pub fn tcp(addr: impl Into<String>) -> Self {
        Output::Tcp(addr.into())
    }

    /// Create a channel output and return both the output and receiver.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qualitywatch_sdk::Output;
    ///
    /// let (output, mut rx) = Output::channel(16);
    ///
    /// // Later, receive observations
    /// // while let Some(obs) = rx.recv().await {
    /// //     println!("{} measures at t={}", obs.len(), obs.timestamp);
    /// // }
    /// ```
    #[cfg(feature = "tokio")]
    pub fn channel(buffer: usize) -> (Self, tokio::sync::mpsc::Receiver<Observation>) {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer);
        (Output::Channel(tx), rx)
    }

    /// Short description for log messages.
    pub fn describe(&self) -> String {
        match self {
            Output::File(path) => format!("file:{}", path.display()),
            Output::Tcp(addr) => format!("tcp:{}", addr),
            #[cfg(feature = "tokio")]
            Output::Channel(_) => "channel".to_string(),
        }
    }

    /// Emit an observation to this output.
    #[cfg(feature = "tokio")]
    pub(crate) async fn emit(&self, observation: &Observation) -> Result<(), ReporterError> {
        match self {
            Output::File(path) => {
                use tokio::io::AsyncWriteExt;

                let mut line = serde_json::to_string(observation)?;
                line.push('\n');

                let io_err = |source: std::io::Error| ReporterError::Io {
                    path: path.display().to_string(),
                    source,
                };
                let mut file = tokio::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .await
                    .map_err(io_err)?;
                file.write_all(line.as_bytes()).await.map_err(io_err)?;
                file.flush().await.map_err(io_err)?;
            }
            Output::Tcp(addr) => {
                use tokio::io::AsyncWriteExt;
                use tokio::net::TcpStream;

                let conn_err = |source: std::io::Error| ReporterError::Connection {
                    addr: addr.clone(),
                    source,
                };
                let mut stream = TcpStream::connect(addr).await.map_err(conn_err)?;
                let mut line = serde_json::to_string(observation)?;
                line.push('\n');
                stream.write_all(line.as_bytes()).await.map_err(conn_err)?;
            }
            Output::Channel(tx) => {
                use tokio::sync::mpsc::error::TrySendError;

                // Best effort: a full channel drops this observation
                match tx.try_send(observation.clone()) {
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Closed(_)) => return Err(ReporterError::ChannelClosed),
                }
            }
        }
        Ok(())
    }
}
