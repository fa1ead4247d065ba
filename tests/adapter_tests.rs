use std::sync::{Arc, Mutex};
use swarm_mobility::adapters::outbound::*;
use swarm_mobility::domains::logger::{DomainLogger, LogLevel};
use swarm_mobility::domains::mobility::*;
use tempfile::tempdir;

fn record(agent_id: u32, tick: u64) -> TickRecord {
    TickRecord {
        agent_id,
        tick,
        time_seconds: 0.5 * tick as f64,
        position: Vector3::new(1.5 * tick as f64, 0.0, 0.0),
        motion: MotionSample::new(1.5, 0.0, 0.0),
    }
}

#[test]
fn test_json_lines_sink_writes_one_envelope_per_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("telemetry").join("ticks.jsonl");

    let sink = JsonLinesSink::create(&path, "test-run").unwrap();
    for tick in 1..=3 {
        sink.record(&record(7, tick));
    }
    sink.flush().unwrap();

    let envelopes = read_envelopes(&path).unwrap();
    assert_eq!(envelopes.len(), 3);
    for (i, envelope) in envelopes.iter().enumerate() {
        assert_eq!(envelope.agent_id, 7);
        assert_eq!(envelope.record_type, "MobilityTick");
        assert_eq!(envelope.source, "test-run");
        let decoded: TickRecord = envelope.decode().unwrap();
        assert_eq!(decoded, record(7, i as u64 + 1));
    }
    assert_ne!(envelopes[0].record_id, envelopes[1].record_id);
}

#[test]
fn test_json_lines_sink_truncates_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ticks.jsonl");
    std::fs::write(&path, "stale\n").unwrap();

    let sink = JsonLinesSink::create(&path, "test-run").unwrap();
    sink.record(&record(1, 1));
    drop(sink);

    let envelopes = read_envelopes(&path).unwrap();
    assert_eq!(envelopes.len(), 1);
}

struct Capture {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl DomainLogger for Capture {
    fn log(&self, level: LogLevel, msg: &str) {
        self.lines.lock().unwrap().push((level, msg.to_string()));
    }
}

#[test]
fn test_logger_sink_formats_agent_position_and_motion() {
    let capture = Arc::new(Capture { lines: Mutex::new(Vec::new()) });
    let sink = LoggerSink::new(capture.clone());

    sink.record(&record(3, 2));

    let lines = capture.lines.lock().unwrap();
    assert_eq!(lines.len(), 1);
    let (level, line) = &lines[0];
    assert_eq!(*level, LogLevel::Info);
    assert!(line.contains("node 3"));
    assert!(line.contains("position (3.0000, 0.0000, 0.0000)"));
    assert!(line.contains("velocity (1.5000, 0.0000, 0.0000)"));
}

#[test]
fn test_fanout_sink_reaches_every_target() {
    let a = Arc::new(MemorySink::new());
    let b = Arc::new(MemorySink::new());
    let sinks: Vec<DynSink> = vec![a.clone() as DynSink, b.clone() as DynSink, Arc::new(NullSink) as DynSink];
    let fanout = FanoutSink::new(sinks).into_dyn();

    fanout.record(&record(1, 1));
    fanout.record(&record(2, 1));

    assert_eq!(a.len(), 2);
    assert_eq!(b.records(), a.records());
}

#[tokio::test]
async fn test_channel_sink_drops_when_full() {
    let (tx, mut rx) = tokio::sync::mpsc::channel(2);
    let sink = ChannelSink::new(tx);

    for tick in 1..=5 {
        sink.record(&record(1, tick));
    }

    assert_eq!(rx.recv().await.unwrap().tick, 1);
    assert_eq!(rx.recv().await.unwrap().tick, 2);
    assert!(rx.try_recv().is_err());
}
