use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::aggregate::Vector3;
use super::random::RandomVariable;
use crate::common::{DomainError, DomainResult};

/// Per-dimension decay constants (lambda) for speed, heading and pitch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayFactors {
    pub speed: f64,
    pub heading: f64,
    pub pitch: f64,
}

impl DecayFactors {
    pub fn new(speed: f64, heading: f64, pitch: f64) -> Self {
        Self { speed, heading, pitch }
    }

    pub fn components(&self) -> [f64; 3] {
        [self.speed, self.heading, self.pitch]
    }
}

impl Default for DecayFactors {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// Axis-aligned box. Declared by the model but never enforced on position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Bounds {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64, min_z: f64, max_z: f64) -> Self {
        Self { min_x, max_x, min_y, max_y, min_z, max_z }
    }

    pub fn contains(&self, position: &Vector3) -> bool {
        position.x >= self.min_x && position.x <= self.max_x &&
        position.y >= self.min_y && position.y <= self.max_y &&
        position.z >= self.min_z && position.z <= self.max_z
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(0.0, 500.0, 0.0, 500.0, 0.0, 300.0)
    }
}

pub const DEFAULT_ALPHA: f64 = 0.85;
pub const DEFAULT_TIME_STEP: Duration = Duration::from_millis(500);

/// Tunables of one agent's mobility model. Immutable once the model is built.
#[derive(Debug, Clone, PartialEq)]
pub struct MobilityParams {
    pub alpha: f64,
    pub decay: DecayFactors,
    pub time_step: Duration,
    pub bounds: Bounds,
    // Mean sources are carried as configuration only; the recurrence never
    // draws from them.
    pub mean_velocity: RandomVariable,
    pub mean_direction: RandomVariable,
    pub mean_pitch: RandomVariable,
    pub normal_velocity: RandomVariable,
    pub normal_direction: RandomVariable,
    pub normal_pitch: RandomVariable,
}

impl MobilityParams {
    pub fn builder() -> MobilityParamsBuilder {
        MobilityParamsBuilder::default()
    }
}

impl Default for MobilityParams {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            decay: DecayFactors::default(),
            time_step: DEFAULT_TIME_STEP,
            bounds: Bounds::default(),
            mean_velocity: RandomVariable::Uniform { min: 10.0, max: 20.0 },
            mean_direction: RandomVariable::Uniform { min: 0.0, max: 6.283185307 },
            mean_pitch: RandomVariable::Uniform { min: -0.1, max: 0.1 },
            normal_velocity: RandomVariable::Normal { mean: 0.0, variance: 1.0 },
            normal_direction: RandomVariable::Normal { mean: 0.0, variance: 0.1 },
            normal_pitch: RandomVariable::Normal { mean: 0.0, variance: 0.02 },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MobilityParamsBuilder {
    params: MobilityParams,
}

impl MobilityParamsBuilder {
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.params.alpha = alpha;
        self
    }

    pub fn decay_factors(mut self, speed: f64, heading: f64, pitch: f64) -> Self {
        self.params.decay = DecayFactors::new(speed, heading, pitch);
        self
    }

    pub fn time_step(mut self, time_step: Duration) -> Self {
        self.params.time_step = time_step;
        self
    }

    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.params.bounds = bounds;
        self
    }

    pub fn mean_sources(
        mut self,
        velocity: RandomVariable,
        direction: RandomVariable,
        pitch: RandomVariable,
    ) -> Self {
        self.params.mean_velocity = velocity;
        self.params.mean_direction = direction;
        self.params.mean_pitch = pitch;
        self
    }

    pub fn perturbation_sources(
        mut self,
        velocity: RandomVariable,
        direction: RandomVariable,
        pitch: RandomVariable,
    ) -> Self {
        self.params.normal_velocity = velocity;
        self.params.normal_direction = direction;
        self.params.normal_pitch = pitch;
        self
    }

    /// Only the time step is checked: a zero step would re-arm the timer at
    /// the same instant forever.
    pub fn build(self) -> DomainResult<MobilityParams> {
        if self.params.time_step.is_zero() {
            return Err(DomainError::invalid_parameter(
                "time_step",
                "must be greater than zero",
            ));
        }
        Ok(self.params)
    }
}
