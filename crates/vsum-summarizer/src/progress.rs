//! Delivery of pipeline progress events.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use vsum_models::StreamEvent;

/// Default buffer of the event channel feeding a streaming response.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Receiver of progress events emitted by a pipeline.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn emit(&self, event: StreamEvent);

    /// Emit a `progress` event.
    async fn progress(&self, message: &str, progress: u32) {
        self.emit(StreamEvent::progress(message, progress)).await;
    }
}

/// [`ProgressSink`] writing into a bounded channel.
#[derive(Clone)]
pub struct ChannelProgressSink {
    tx: mpsc::Sender<StreamEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<StreamEvent>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl ProgressSink for ChannelProgressSink {
    async fn emit(&self, event: StreamEvent) {
        if self.tx.send(event).await.is_err() {
            debug!("Progress receiver dropped; client disconnected");
        }
    }
}

/// Create a sink and the receiver its events arrive on.
pub fn progress_channel(capacity: usize) -> (ChannelProgressSink, mpsc::Receiver<StreamEvent>) {
    let (tx, rx) = mpsc::channel(capacity);
    (ChannelProgressSink::new(tx), rx)
}
