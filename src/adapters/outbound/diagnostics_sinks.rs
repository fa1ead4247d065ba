use crate::domains::logger::DynLogger;
use crate::domains::mobility::{DiagnosticsSink, DynSink, TickRecord};
use std::sync::{Arc, Mutex};

/// Human-readable tick lines through a domain logger.
pub struct LoggerSink {
    logger: DynLogger,
}

impl LoggerSink {
    pub fn new(logger: DynLogger) -> Self {
        Self { logger }
    }

    pub fn format_record(record: &TickRecord) -> String {
        let p = record.position;
        let m = record.motion;
        format!(
            "t={:.3}s node {} position ({:.4}, {:.4}, {:.4}) velocity ({:.4}, {:.4}, {:.4})",
            record.time_seconds, record.agent_id, p.x, p.y, p.z, m.speed, m.heading, m.pitch
        )
    }
}

impl DiagnosticsSink for LoggerSink {
    fn record(&self, record: &TickRecord) {
        self.logger.info(&Self::format_record(record));
    }
}

/// Keeps every record in memory, in arrival order.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<TickRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<TickRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn records_for(&self, agent_id: u32) -> Vec<TickRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.agent_id == agent_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&self, record: &TickRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(*record);
        }
    }
}

/// Discards records.
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&self, _record: &TickRecord) {}
}

/// Forwards each record to every attached sink.
pub struct FanoutSink {
    sinks: Vec<DynSink>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<DynSink>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: DynSink) {
        self.sinks.push(sink);
    }

    pub fn into_dyn(self) -> DynSink {
        Arc::new(self)
    }
}

impl DiagnosticsSink for FanoutSink {
    fn record(&self, record: &TickRecord) {
        for sink in &self.sinks {
            sink.record(record);
        }
    }
}
