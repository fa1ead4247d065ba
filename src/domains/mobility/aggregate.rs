use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};
use std::time::Duration;

use super::engine::{StepOutcome, UpdateEngine};
use super::params::MobilityParams;
use super::random::PerturbationSources;
use crate::common::DomainResult;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn scale(&self, factor: f64) -> Vector3 {
        Vector3::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Instantaneous velocity in spherical form. Angles are radians and are
/// never wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionSample {
    pub speed: f64,
    pub heading: f64,
    pub pitch: f64,
}

impl MotionSample {
    pub const ZERO: MotionSample = MotionSample { speed: 0.0, heading: 0.0, pitch: 0.0 };

    pub fn new(speed: f64, heading: f64, pitch: f64) -> Self {
        Self { speed, heading, pitch }
    }

    /// Components in (speed, heading, pitch) order.
    pub fn components(&self) -> [f64; 3] {
        [self.speed, self.heading, self.pitch]
    }

    pub fn from_components(components: [f64; 3]) -> Self {
        Self::new(components[0], components[1], components[2])
    }
}

/// Position and motion of a single agent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcessState {
    pub position: Vector3,
    pub motion: MotionSample,
}

impl ProcessState {
    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    pub fn velocity_components(&self) -> MotionSample {
        self.motion
    }

    pub fn reset(&mut self) {
        self.position = Vector3::ZERO;
        self.motion = MotionSample::ZERO;
    }
}

/// Gauss-Markov mobility model for one agent. Owns its parameters, its
/// process state and its perturbation sources; scheduling lives elsewhere.
pub struct GaussMarkovMobilityModel {
    params: MobilityParams,
    engine: UpdateEngine,
    state: ProcessState,
    perturbation: PerturbationSources,
    ticks: u64,
}

impl GaussMarkovMobilityModel {
    pub fn new(params: MobilityParams, perturbation: PerturbationSources) -> Self {
        Self {
            engine: UpdateEngine::new(params.alpha, params.decay),
            params,
            state: ProcessState::default(),
            perturbation,
            ticks: 0,
        }
    }

    /// Build the perturbation streams from the configured random variables.
    pub fn from_params(params: MobilityParams, agent_id: u32, seed: Option<u64>) -> DomainResult<Self> {
        let perturbation = PerturbationSources::from_params(&params, agent_id, seed)?;
        Ok(Self::new(params, perturbation))
    }

    /// Entry into the simulation: position and motion start at zero.
    pub fn initialize(&mut self) {
        self.state.reset();
        self.ticks = 0;
    }

    pub fn update(&mut self) -> StepOutcome {
        let outcome = self.engine.step(&mut self.state, &mut self.perturbation);
        self.ticks += 1;
        outcome
    }

    pub fn position(&self) -> Vector3 {
        self.state.position()
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.state.set_position(position);
    }

    pub fn velocity_components(&self) -> MotionSample {
        self.state.velocity_components()
    }

    /// Displacement per second implied by the current motion sample.
    pub fn cartesian_velocity(&self) -> Vector3 {
        let step = self.params.time_step.as_secs_f64();
        UpdateEngine::displacement(&self.state.motion).scale(1.0 / step)
    }

    pub fn state(&self) -> &ProcessState {
        &self.state
    }

    pub fn params(&self) -> &MobilityParams {
        &self.params
    }

    pub fn time_step(&self) -> Duration {
        self.params.time_step
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
