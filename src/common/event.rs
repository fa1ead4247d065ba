use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A record emitted by the simulation for external observers.
pub trait TelemetryRecord: Send + Sync + Clone {
    fn record_type(&self) -> &'static str;
    fn agent_id(&self) -> u32;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEnvelope {
    pub record_id: Uuid,
    pub agent_id: u32,
    pub record_type: String,
    pub source: String,
    pub payload: serde_json::Value,
    pub emitted_at: DateTime<Utc>,
}

impl TelemetryEnvelope {
    pub fn new<R: TelemetryRecord + Serialize>(
        record: &R,
        source: &str,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            record_id: Uuid::new_v4(),
            agent_id: record.agent_id(),
            record_type: record.record_type().to_string(),
            source: source.to_string(),
            payload: serde_json::to_value(record)?,
            emitted_at: Utc::now(),
        })
    }

    /// Decode the payload back into the concrete record type.
    pub fn decode<R: for<'de> Deserialize<'de>>(&self) -> Result<R, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}
