// Swarm simulation service - wires configuration, agents and the scheduler
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::{ApplicationResult, DomainError, DomainResult};
use crate::config::Config;
use crate::domains::logger::DynLogger;
use crate::domains::mobility::{
    Bounds, DynSink, GaussMarkovMobilityModel, MobilityNode, MobilityParams,
    RandomBoxPositionAllocator, Vector3,
};
use crate::domains::scheduler::{EventScheduler, TimerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub agents: usize,
    pub ticks: u64,
    pub simulated_seconds: f64,
    /// Agents whose position is no longer finite.
    pub non_finite_agents: usize,
    /// Agents currently outside the declared (unenforced) bounds.
    pub agents_outside_bounds: usize,
}

struct InstalledNode {
    node: Rc<RefCell<MobilityNode>>,
    timer: TimerId,
}

/// A swarm of agents driven by one discrete-event scheduler. Each node is
/// owned here; the scheduler only holds weak references.
pub struct SwarmSimulation {
    params: MobilityParams,
    seed: Option<u64>,
    duration: Duration,
    scheduler: EventScheduler,
    nodes: Vec<InstalledNode>,
    sink: DynSink,
    logger: DynLogger,
}

impl SwarmSimulation {
    pub fn new(params: MobilityParams, seed: Option<u64>, duration: Duration, sink: DynSink, logger: DynLogger) -> Self {
        Self {
            params,
            seed,
            duration,
            scheduler: EventScheduler::new(),
            nodes: Vec::new(),
            sink,
            logger,
        }
    }

    /// Build the scenario described by `config`: `agent_count` nodes with
    /// initial positions drawn from the scenario's initial area.
    pub fn from_config(config: &Config, sink: DynSink, logger: DynLogger) -> ApplicationResult<Self> {
        let params = config.mobility.to_params()?;
        let duration = config.scenario.duration()?;
        let seed = config.mobility.seed;

        let mut simulation = Self::new(params, seed, duration, sink, logger);
        let mut allocator = RandomBoxPositionAllocator::from_bounds(&config.scenario.initial_area, seed)?;
        for id in 0..config.scenario.agent_count {
            simulation.install_node(id, Some(allocator.next_position()))?;
        }

        tracing::info!(
            "Swarm of {} agents ready, time step {:?}, running for {:?}",
            simulation.nodes.len(),
            simulation.params.time_step,
            simulation.duration
        );
        Ok(simulation)
    }

    /// Create a node with streams derived from the swarm seed, initialize it
    /// and arm its recurring timer.
    pub fn install_node(&mut self, id: u32, initial_position: Option<Vector3>) -> DomainResult<()> {
        let model = GaussMarkovMobilityModel::from_params(self.params.clone(), id, self.seed)?;
        self.install_model(id, model, initial_position)
    }

    /// Install a node around a caller-built model (e.g. with deterministic
    /// perturbation sources).
    pub fn install_model(
        &mut self,
        id: u32,
        mut model: GaussMarkovMobilityModel,
        initial_position: Option<Vector3>,
    ) -> DomainResult<()> {
        if self.nodes.iter().any(|n| n.node.borrow().id() == id) {
            return Err(DomainError::invalid_parameter(
                "agent_id",
                format!("agent {} is already installed", id),
            ));
        }

        model.initialize();
        if let Some(position) = initial_position {
            model.set_position(position);
        }
        let time_step = model.time_step();

        let node = Rc::new(RefCell::new(MobilityNode::new(id, model, self.sink.clone())));
        let timer = self.scheduler.schedule_recurring(time_step, &node)?;
        self.nodes.push(InstalledNode { node, timer });

        self.logger.debug(&format!("Installed mobility model on node {}", id));
        Ok(())
    }

    /// Remove an agent from the swarm; its pending timer is discarded.
    pub fn remove_node(&mut self, id: u32) -> DomainResult<()> {
        let idx = self
            .nodes
            .iter()
            .position(|n| n.node.borrow().id() == id)
            .ok_or(DomainError::AgentNotFound { id })?;
        let removed = self.nodes.remove(idx);
        self.scheduler.cancel(removed.timer);
        self.logger.info(&format!("Removed node {}", id));
        Ok(())
    }

    pub fn node(&self, id: u32) -> Option<Rc<RefCell<MobilityNode>>> {
        self.nodes
            .iter()
            .find(|n| n.node.borrow().id() == id)
            .map(|n| n.node.clone())
    }

    pub fn positions(&self) -> Vec<(u32, Vector3)> {
        self.nodes
            .iter()
            .map(|n| {
                let node = n.node.borrow();
                (node.id(), node.model().position())
            })
            .collect()
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn run_until(&mut self, end: Duration) -> u64 {
        self.scheduler.run_until(end)
    }

    /// Run for the configured duration, counted from the current clock.
    pub fn run(&mut self) -> SimulationSummary {
        let end = self.scheduler.now() + self.duration;
        let ticks = self.run_until(end);
        let summary = self.summary(ticks);

        self.logger.info(&format!(
            "Simulation finished at {:.3}s: {} ticks across {} agents",
            summary.simulated_seconds, summary.ticks, summary.agents
        ));
        if summary.non_finite_agents > 0 {
            self.logger.warn(&format!(
                "{} agents have non-finite positions",
                summary.non_finite_agents
            ));
        }
        summary
    }

    fn summary(&self, ticks: u64) -> SimulationSummary {
        let bounds: &Bounds = &self.params.bounds;
        let positions = self.positions();
        SimulationSummary {
            agents: positions.len(),
            ticks,
            simulated_seconds: self.scheduler.now().as_secs_f64(),
            non_finite_agents: positions.iter().filter(|(_, p)| !p.is_finite()).count(),
            agents_outside_bounds: positions.iter().filter(|(_, p)| !bounds.contains(p)).count(),
        }
    }
}
