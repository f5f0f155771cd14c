//! Channel-based data source.
//!
//! Receives observations pushed from the same process, typically by the
//! SDK's channel output.

use qualitywatch_types::Observation;
use tokio::sync::mpsc;

use super::DataSource;

/// A data source that receives observations via an mpsc channel.
///
/// # Example
///
/// ```
/// use qualitywatch::{ChannelSource, DataSource};
/// use qualitywatch_types::Observation;
///
/// let (tx, mut source) = ChannelSource::create("in-process", 16);
/// tx.try_send(Observation::builder().timestamp(1.0).measure("loss", 0.3).build()).unwrap();
///
/// assert_eq!(source.poll().len(), 1);
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<Observation>,
    description: String,
    disconnected: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of an mpsc channel
    /// * `source_description` - Where observations come from, for display
    pub fn new(receiver: mpsc::Receiver<Observation>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            disconnected: false,
        }
    }

    /// Create a channel pair for sending observations to a ChannelSource.
    pub fn create(source_description: &str, buffer: usize) -> (mpsc::Sender<Observation>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self::new(rx, source_description))
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Vec<Observation> {
        let mut observations = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(obs) => observations.push(obs),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    break;
                }
            }
        }
        observations
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.disconnected.then_some("Channel closed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(ts: f64) -> Observation {
        Observation::builder().timestamp(ts).measure("m", ts).build()
    }

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test", 8);

        assert!(source.poll().is_empty());

        tx.try_send(obs(0.0)).unwrap();
        tx.try_send(obs(1.0)).unwrap();

        let batch = source.poll();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].timestamp, 1.0);
        assert!(source.poll().is_empty());
        assert!(source.error().is_none());
    }

    #[test]
    fn dropped_sender_is_reported() {
        let (tx, mut source) = ChannelSource::create("test", 8);
        tx.try_send(obs(0.0)).unwrap();
        drop(tx);

        assert_eq!(source.poll().len(), 1);
        assert_eq!(source.error(), Some("Channel closed"));
        assert_eq!(source.description(), "channel: test");
    }
}
