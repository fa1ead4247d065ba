use serde::{Deserialize, Serialize};

use super::aggregate::{MotionSample, Vector3};
use crate::common::TelemetryRecord;

/// Per-tick diagnostics record: the agent, where it ended up and the motion
/// sample that moved it there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub agent_id: u32,
    pub tick: u64,
    pub time_seconds: f64,
    pub position: Vector3,
    pub motion: MotionSample,
}

impl TelemetryRecord for TickRecord {
    fn record_type(&self) -> &'static str {
        "MobilityTick"
    }

    fn agent_id(&self) -> u32 {
        self.agent_id
    }
}
