use std::time::Duration;

use super::aggregate::GaussMarkovMobilityModel;
use super::events::TickRecord;
use super::ports::DynSink;
use crate::domains::scheduler::Tickable;

/// A simulated agent: its identifier, its exclusively owned mobility model
/// and the sink its tick records go to.
pub struct MobilityNode {
    id: u32,
    model: GaussMarkovMobilityModel,
    sink: DynSink,
}

impl MobilityNode {
    pub fn new(id: u32, model: GaussMarkovMobilityModel, sink: DynSink) -> Self {
        Self { id, model, sink }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn model(&self) -> &GaussMarkovMobilityModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut GaussMarkovMobilityModel {
        &mut self.model
    }

    /// Run the recurrence once and emit exactly one record.
    pub fn tick(&mut self, now: Duration) -> TickRecord {
        let outcome = self.model.update();
        let record = TickRecord {
            agent_id: self.id,
            tick: self.model.ticks(),
            time_seconds: now.as_secs_f64(),
            position: self.model.position(),
            motion: outcome.motion,
        };
        self.sink.record(&record);
        record
    }
}

impl Tickable for MobilityNode {
    fn on_tick(&mut self, now: Duration) {
        self.tick(now);
    }
}
