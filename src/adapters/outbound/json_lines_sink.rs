use crate::common::{ApplicationResult, TelemetryEnvelope};
use crate::domains::mobility::{DiagnosticsSink, TickRecord};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Writes tick records as JSON Lines telemetry envelopes (one JSON object
/// per line). I/O failures are logged and the record dropped.
pub struct JsonLinesSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    source: String,
}

impl JsonLinesSink {
    /// Create (or truncate) the telemetry file, creating parent directories.
    pub fn create<P: AsRef<Path>>(path: P, source: &str) -> ApplicationResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
            source: source.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flush(&self) -> ApplicationResult<()> {
        if let Ok(mut writer) = self.writer.lock() {
            writer.flush()?;
        }
        Ok(())
    }

    fn write_record(&self, record: &TickRecord) -> Result<(), String> {
        let envelope = TelemetryEnvelope::new(record, &self.source)
            .map_err(|e| format!("Failed to create telemetry envelope: {}", e))?;
        let line = serde_json::to_string(&envelope)
            .map_err(|e| format!("Failed to serialize envelope: {}", e))?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| "Telemetry writer poisoned".to_string())?;
        writeln!(writer, "{}", line)
            .map_err(|e| format!("Failed to write to {}: {}", self.path.display(), e))
    }
}

impl DiagnosticsSink for JsonLinesSink {
    fn record(&self, record: &TickRecord) {
        if let Err(e) = self.write_record(record) {
            tracing::warn!("{}", e);
        }
    }
}

impl Drop for JsonLinesSink {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Read back every envelope in a JSON Lines telemetry file.
pub fn read_envelopes<P: AsRef<Path>>(path: P) -> ApplicationResult<Vec<TelemetryEnvelope>> {
    let content = std::fs::read_to_string(path)?;
    let mut envelopes = Vec::new();
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        let envelope: TelemetryEnvelope = serde_json::from_str(line)
            .map_err(crate::common::DomainError::from)?;
        envelopes.push(envelope);
    }
    Ok(envelopes)
}
