use crate::domains::mobility::{DiagnosticsSink, TickRecord};
use tokio::sync::mpsc;

/// Pushes records onto a bounded channel, typically drained by a
/// `TrackingActor`. Non-blocking: records are dropped when the channel is
/// full or closed.
pub struct ChannelSink {
    sender: mpsc::Sender<TickRecord>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::Sender<TickRecord>) -> Self {
        Self { sender }
    }
}

impl DiagnosticsSink for ChannelSink {
    fn record(&self, record: &TickRecord) {
        if let Err(e) = self.sender.try_send(*record) {
            tracing::warn!("Dropped tick record for agent {}: {}", record.agent_id, e);
        }
    }
}
