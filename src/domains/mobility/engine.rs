use serde::{Deserialize, Serialize};

use super::aggregate::{MotionSample, ProcessState, Vector3};
use super::params::DecayFactors;
use super::random::PerturbationSources;

/// What a single step computed, kept for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub previous: MotionSample,
    /// Correlation coefficients in (speed, heading, pitch) order.
    pub coefficients: [f64; 3],
    /// Raw perturbation draws in (speed, heading, pitch) order.
    pub perturbation: [f64; 3],
    pub motion: MotionSample,
    pub displacement: Vector3,
}

/// The first-order autoregressive recurrence driving an agent's motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateEngine {
    alpha: f64,
    decay: DecayFactors,
}

impl UpdateEngine {
    pub fn new(alpha: f64, decay: DecayFactors) -> Self {
        Self { alpha, decay }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn decay(&self) -> DecayFactors {
        self.decay
    }

    /// `alpha * exp(-(1/lambda) * |previous - current|)`
    pub fn correlation_coefficient(alpha: f64, lambda: f64, previous: f64, current: f64) -> f64 {
        alpha * (-1.0 / lambda * (previous - current).abs()).exp()
    }

    pub fn blend(coefficient: f64, previous: f64, perturbation: f64) -> f64 {
        coefficient * previous + (1.0 - coefficient) * perturbation
    }

    /// One step of spherical-to-Cartesian displacement.
    pub fn displacement(motion: &MotionSample) -> Vector3 {
        let MotionSample { speed, heading, pitch } = *motion;
        Vector3::new(
            speed * heading.cos() * pitch.cos(),
            speed * heading.sin() * pitch.cos(),
            speed * pitch.sin(),
        )
    }

    /// Advance `state` by one tick. Non-finite draws propagate unchecked.
    pub fn step(&self, state: &mut ProcessState, sources: &mut PerturbationSources) -> StepOutcome {
        let previous = state.motion.components();
        // Both reads happen before any mutation, so the difference term is
        // always zero and every coefficient equals alpha.
        let current = state.motion.components();
        let lambdas = self.decay.components();

        let coefficients: [f64; 3] = std::array::from_fn(|i| {
            Self::correlation_coefficient(self.alpha, lambdas[i], previous[i], current[i])
        });

        let perturbation = sources.draw();

        let next: [f64; 3] =
            std::array::from_fn(|i| Self::blend(coefficients[i], previous[i], perturbation[i]));

        let motion = MotionSample::from_components(next);
        state.motion = motion;

        let displacement = Self::displacement(&motion);
        state.position += displacement;

        StepOutcome {
            previous: MotionSample::from_components(previous),
            coefficients,
            perturbation,
            motion,
            displacement,
        }
    }
}
