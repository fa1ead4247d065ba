use crate::domains::logger::{DomainLogger, LogLevel};
use std::sync::Arc;
use tokio::sync::mpsc;

struct LogMessage {
    level: LogLevel,
    msg: String,
}

struct BufferedLogger {
    sender: mpsc::Sender<LogMessage>,
}

impl DomainLogger for BufferedLogger {
    fn log(&self, level: LogLevel, msg: &str) {
        // Non-blocking: drop on full
        let _ = self.sender.try_send(LogMessage { level, msg: msg.to_string() });
    }
}

/// Non-blocking buffered logger. Messages are forwarded to `bridge` from a
/// background task; `capacity` bounds the channel. Must be called inside a
/// tokio runtime.
pub fn init_buffered_logger(bridge: Arc<dyn DomainLogger>, capacity: usize) -> Arc<dyn DomainLogger> {
    let (tx, mut rx) = mpsc::channel::<LogMessage>(capacity);

    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            bridge.log(message.level, &message.msg);
        }
    });

    Arc::new(BufferedLogger { sender: tx })
}
