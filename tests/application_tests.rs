use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use swarm_mobility::adapters::outbound::{init_noop_logger, MemorySink, NullSink};
use swarm_mobility::application::SwarmSimulation;
use swarm_mobility::domains::mobility::*;
use swarm_mobility::domains::scheduler::{EventScheduler, Tickable};
use swarm_mobility::{Config, DomainError};

#[derive(Default)]
struct Recorder {
    label: &'static str,
    log: Rc<RefCell<Vec<(&'static str, Duration)>>>,
}

impl Tickable for Recorder {
    fn on_tick(&mut self, now: Duration) {
        self.log.borrow_mut().push((self.label, now));
    }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn test_recurring_timer_fires_every_interval() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let target = Rc::new(RefCell::new(Recorder { label: "a", log: log.clone() }));

    let mut scheduler = EventScheduler::new();
    scheduler.schedule_recurring(ms(500), &target).unwrap();

    let fired = scheduler.run_until(ms(2000));
    assert_eq!(fired, 4);
    let times: Vec<Duration> = log.borrow().iter().map(|(_, t)| *t).collect();
    assert_eq!(times, vec![ms(500), ms(1000), ms(1500), ms(2000)]);
    assert_eq!(scheduler.now(), ms(2000));
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn test_ticks_interleave_in_time_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let fast = Rc::new(RefCell::new(Recorder { label: "fast", log: log.clone() }));
    let slow = Rc::new(RefCell::new(Recorder { label: "slow", log: log.clone() }));

    let mut scheduler = EventScheduler::new();
    scheduler.schedule_recurring(ms(300), &fast).unwrap();
    scheduler.schedule_recurring(ms(500), &slow).unwrap();
    scheduler.run_until(ms(1000));

    let labels: Vec<&str> = log.borrow().iter().map(|(l, _)| *l).collect();
    assert_eq!(labels, vec!["fast", "slow", "fast", "fast", "slow"]);

    let times: Vec<Duration> = log.borrow().iter().map(|(_, t)| *t).collect();
    let mut sorted = times.clone();
    sorted.sort();
    assert_eq!(times, sorted);
}

#[test]
fn test_simultaneous_timers_keep_insertion_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::new(RefCell::new(Recorder { label: "first", log: log.clone() }));
    let second = Rc::new(RefCell::new(Recorder { label: "second", log: log.clone() }));

    let mut scheduler = EventScheduler::new();
    scheduler.schedule_recurring(ms(500), &first).unwrap();
    scheduler.schedule_recurring(ms(500), &second).unwrap();
    scheduler.run_until(ms(1500));

    let labels: Vec<&str> = log.borrow().iter().map(|(l, _)| *l).collect();
    assert_eq!(labels, vec!["first", "second", "first", "second", "first", "second"]);
}

#[test]
fn test_dropped_target_is_never_ticked() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let target = Rc::new(RefCell::new(Recorder { label: "gone", log: log.clone() }));

    let mut scheduler = EventScheduler::new();
    scheduler.schedule_recurring(ms(500), &target).unwrap();
    scheduler.run_until(ms(500));
    assert_eq!(log.borrow().len(), 1);

    drop(target);
    let fired = scheduler.run_until(ms(5000));
    assert_eq!(fired, 0);
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn test_cancelled_timer_stops_firing() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let target = Rc::new(RefCell::new(Recorder { label: "x", log: log.clone() }));

    let mut scheduler = EventScheduler::new();
    let id = scheduler.schedule_recurring(ms(100), &target).unwrap();
    scheduler.run_until(ms(300));
    scheduler.cancel(id);
    scheduler.run_until(ms(1000));
    assert_eq!(log.borrow().len(), 3);
}

#[test]
fn test_cancel_only_applies_to_queued_timers() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let target = Rc::new(RefCell::new(Recorder { label: "x", log: log.clone() }));

    let mut scheduler = EventScheduler::new();
    let id = scheduler.schedule_recurring(ms(100), &target).unwrap();
    scheduler.run_until(ms(100));

    drop(target);
    scheduler.run_until(ms(500));
    assert_eq!(scheduler.pending(), 0);
    assert!(!scheduler.cancel(id));

    let other = Rc::new(RefCell::new(Recorder { label: "y", log: log.clone() }));
    let live = scheduler.schedule_recurring(ms(100), &other).unwrap();
    assert!(scheduler.cancel(live));
    assert!(!scheduler.cancel(live));
    assert_eq!(scheduler.run_until(ms(1000)), 0);
}

#[test]
fn test_timer_is_dropped_when_next_fire_overflows() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let target = Rc::new(RefCell::new(Recorder { label: "huge", log: log.clone() }));

    let mut scheduler = EventScheduler::new();
    let interval = Duration::MAX / 2 + Duration::from_secs(1);
    scheduler.schedule_recurring(interval, &target).unwrap();

    let fired = scheduler.run_until(Duration::MAX);
    assert_eq!(fired, 1);
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(scheduler.pending(), 0);

    let result = scheduler.schedule_recurring(ms(1), &target);
    assert!(matches!(result, Err(DomainError::InvalidParameter { .. })));
}

#[test]
fn test_zero_interval_is_rejected() {
    let target = Rc::new(RefCell::new(Recorder::default()));
    let mut scheduler = EventScheduler::new();
    let result = scheduler.schedule_recurring(Duration::ZERO, &target);
    assert!(matches!(result, Err(DomainError::InvalidParameter { .. })));
}

fn seeded_config(agents: u32, seed: u64) -> Config {
    let mut config = Config::default();
    config.scenario.agent_count = agents;
    config.scenario.duration_seconds = 5.0;
    config.mobility.seed = Some(seed);
    config
}

#[test]
fn test_swarm_emits_one_record_per_agent_per_tick() {
    let sink = Arc::new(MemorySink::new());
    let mut simulation =
        SwarmSimulation::from_config(&seeded_config(20, 1), sink.clone(), init_noop_logger()).unwrap();

    let summary = simulation.run();

    // 5 s at 0.5 s steps
    assert_eq!(summary.agents, 20);
    assert_eq!(summary.ticks, 200);
    assert_eq!(summary.simulated_seconds, 5.0);
    assert_eq!(sink.len(), 200);

    for id in 0..20 {
        let records = sink.records_for(id);
        assert_eq!(records.len(), 10);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.tick, i as u64 + 1);
            assert!((record.time_seconds - 0.5 * (i as f64 + 1.0)).abs() < 1e-12);
        }
    }
}

#[test]
fn test_records_match_node_state_after_tick() {
    let sink = Arc::new(MemorySink::new());
    let mut simulation =
        SwarmSimulation::from_config(&seeded_config(3, 8), sink.clone(), init_noop_logger()).unwrap();
    simulation.run();

    for (id, position) in simulation.positions() {
        let last = *sink.records_for(id).last().unwrap();
        assert_eq!(last.position, position);
        let node = simulation.node(id).unwrap();
        assert_eq!(last.motion, node.borrow().model().velocity_components());
    }
}

#[test]
fn test_swarm_runs_are_reproducible_with_seed() {
    let run = || {
        let sink = Arc::new(MemorySink::new());
        let mut simulation =
            SwarmSimulation::from_config(&seeded_config(5, 77), sink.clone(), init_noop_logger()).unwrap();
        simulation.run();
        sink.records()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_initial_positions_come_from_allocator() {
    let config = seeded_config(10, 3);
    let simulation =
        SwarmSimulation::from_config(&config, Arc::new(NullSink), init_noop_logger()).unwrap();

    let area = config.scenario.initial_area;
    for (_, position) in simulation.positions() {
        assert!(area.contains(&position));
    }
    assert_eq!(simulation.now(), Duration::ZERO);
}

#[test]
fn test_removed_node_stops_ticking() {
    let sink = Arc::new(MemorySink::new());
    let mut simulation =
        SwarmSimulation::from_config(&seeded_config(2, 4), sink.clone(), init_noop_logger()).unwrap();

    simulation.run_until(Duration::from_secs(1));
    simulation.remove_node(0).unwrap();
    simulation.run_until(Duration::from_secs(3));

    assert_eq!(sink.records_for(0).len(), 2);
    assert_eq!(sink.records_for(1).len(), 6);
    assert!(simulation.node(0).is_none());
    assert!(matches!(simulation.remove_node(0), Err(DomainError::AgentNotFound { id: 0 })));
}

#[test]
fn test_deterministic_node_reproduces_reference_trajectory() {
    let sink = Arc::new(MemorySink::new());
    let params = MobilityParams::default();
    let mut simulation = SwarmSimulation::new(
        params.clone(),
        None,
        Duration::from_secs(1),
        sink.clone(),
        init_noop_logger(),
    );
    let model = GaussMarkovMobilityModel::new(params, PerturbationSources::constant(10.0, 0.0, 0.0));
    simulation.install_model(42, model, None).unwrap();

    let summary = simulation.run();
    assert_eq!(summary.ticks, 2);

    let records = sink.records_for(42);
    assert!((records[0].position.x - 1.5).abs() < 1e-9);
    assert!((records[1].position.x - 4.275).abs() < 1e-9);
    assert!((records[1].motion.speed - 2.775).abs() < 1e-9);
}

#[test]
fn test_duplicate_agent_id_is_rejected() {
    let params = MobilityParams::default();
    let mut simulation = SwarmSimulation::new(
        params,
        Some(1),
        Duration::from_secs(1),
        Arc::new(MemorySink::new()),
        init_noop_logger(),
    );
    simulation.install_node(1, None).unwrap();
    assert!(simulation.install_node(1, None).is_err());
}

#[test]
fn test_overflowing_initial_area_is_an_error() {
    let mut config = seeded_config(2, 1);
    config.scenario.initial_area.min_x = -1e308;
    config.scenario.initial_area.max_x = 1e308;
    let result = SwarmSimulation::from_config(&config, Arc::new(NullSink), init_noop_logger());
    assert!(result.is_err());
}

#[test]
fn test_invalid_time_step_fails_construction() {
    let mut config = seeded_config(1, 1);
    config.mobility.time_step_seconds = 0.0;
    let result = SwarmSimulation::from_config(&config, Arc::new(MemorySink::new()), init_noop_logger());
    assert!(result.is_err());

    config.mobility.time_step_seconds = -1.0;
    let result = SwarmSimulation::from_config(&config, Arc::new(MemorySink::new()), init_noop_logger());
    assert!(result.is_err());
}
