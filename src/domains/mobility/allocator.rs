use super::aggregate::Vector3;
use super::params::Bounds;
use super::random::{derive_stream_seed, RandomSource, RandomStream, RandomVariable};
use crate::common::DomainResult;

/// Stream ids reserved for the allocator so they never collide with an
/// agent's perturbation streams.
const ALLOCATOR_AGENT: u32 = u32::MAX;

/// Draws initial positions uniformly from a box, one axis stream each.
pub struct RandomBoxPositionAllocator {
    x: RandomStream,
    y: RandomStream,
    z: RandomStream,
}

impl RandomBoxPositionAllocator {
    pub fn new(x: RandomVariable, y: RandomVariable, z: RandomVariable, seed: Option<u64>) -> DomainResult<Self> {
        Ok(Self {
            x: x.stream(derive_stream_seed(seed, ALLOCATOR_AGENT, 0))?,
            y: y.stream(derive_stream_seed(seed, ALLOCATOR_AGENT, 1))?,
            z: z.stream(derive_stream_seed(seed, ALLOCATOR_AGENT, 2))?,
        })
    }

    pub fn from_bounds(bounds: &Bounds, seed: Option<u64>) -> DomainResult<Self> {
        Self::new(
            RandomVariable::Uniform { min: bounds.min_x, max: bounds.max_x },
            RandomVariable::Uniform { min: bounds.min_y, max: bounds.max_y },
            RandomVariable::Uniform { min: bounds.min_z, max: bounds.max_z },
            seed,
        )
    }

    pub fn next_position(&mut self) -> Vector3 {
        Vector3::new(self.x.draw(), self.y.draw(), self.z.draw())
    }
}
