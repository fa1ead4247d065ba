// Mobility projections - observational read models built from tick records
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::aggregate::{MotionSample, Vector3};
use super::events::TickRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTrackingProjection {
    pub agent_id: u32,
    pub current_position: Vector3,
    pub current_motion: MotionSample,
    pub ticks: u64,
    /// Sum of straight-line distances between consecutive reported positions.
    pub path_length: f64,
    pub last_sim_time_seconds: f64,
    pub last_updated: DateTime<Utc>,
}

impl AgentTrackingProjection {
    pub fn new(record: &TickRecord) -> Self {
        Self {
            agent_id: record.agent_id,
            current_position: record.position,
            current_motion: record.motion,
            ticks: 1,
            path_length: 0.0,
            last_sim_time_seconds: record.time_seconds,
            last_updated: Utc::now(),
        }
    }

    pub fn apply_record(&mut self, record: &TickRecord) {
        self.path_length += (record.position - self.current_position).length();
        self.current_position = record.position;
        self.current_motion = record.motion;
        self.ticks += 1;
        self.last_sim_time_seconds = record.time_seconds;
        self.last_updated = Utc::now();
    }
}

/// In-memory projection store keyed by agent id
#[derive(Debug, Default)]
pub struct TrackingProjectionStore {
    pub agents: HashMap<u32, AgentTrackingProjection>,
}

impl TrackingProjectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_record(&mut self, record: &TickRecord) {
        match self.agents.get_mut(&record.agent_id) {
            Some(projection) => projection.apply_record(record),
            None => {
                self.agents
                    .insert(record.agent_id, AgentTrackingProjection::new(record));
            }
        }
    }

    pub fn total_ticks(&self) -> u64 {
        self.agents.values().map(|p| p.ticks).sum()
    }
}
