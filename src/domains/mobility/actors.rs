use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use super::events::TickRecord;
use super::projections::{AgentTrackingProjection, TrackingProjectionStore};
use crate::domains::logger::DynLogger;

/// Actor that consumes tick records from a channel and keeps the tracking
/// projections current.
pub struct TrackingActor {
    projection_store: Arc<RwLock<TrackingProjectionStore>>,
    record_receiver: mpsc::Receiver<TickRecord>,
    logger: Option<DynLogger>,
}

impl TrackingActor {
    pub fn new(record_receiver: mpsc::Receiver<TickRecord>) -> Self {
        Self {
            projection_store: Arc::new(RwLock::new(TrackingProjectionStore::new())),
            record_receiver,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: DynLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Shared handle for querying projections while the actor runs.
    pub fn projection_store(&self) -> Arc<RwLock<TrackingProjectionStore>> {
        self.projection_store.clone()
    }

    /// Drain records until every sender is dropped.
    pub async fn run(&mut self) {
        while let Some(record) = self.record_receiver.recv().await {
            self.handle_record(&record).await;
        }
        tracing::debug!("Tracking actor stopped: all record senders dropped");
    }

    async fn handle_record(&self, record: &TickRecord) {
        let mut store = self.projection_store.write().await;
        store.apply_record(record);

        if !record.position.is_finite() {
            let msg = format!(
                "Agent {} left finite space at tick {}",
                record.agent_id, record.tick
            );
            match &self.logger {
                Some(logger) => logger.warn(&msg),
                None => tracing::warn!("{}", msg),
            }
        }
    }

    pub async fn get_agent(&self, agent_id: u32) -> Option<AgentTrackingProjection> {
        let store = self.projection_store.read().await;
        store.agents.get(&agent_id).cloned()
    }
}
