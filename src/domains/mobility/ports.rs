use std::sync::Arc;

use super::events::TickRecord;

/// Receives one record per agent per tick, after the state mutation.
/// Non-fallible from the domain's point of view; adapters deal with their
/// own I/O failures.
pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, record: &TickRecord);
}

pub type DynSink = Arc<dyn DiagnosticsSink>;
