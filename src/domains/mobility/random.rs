use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::params::MobilityParams;
use crate::common::{DomainError, DomainResult};

/// Source of real-valued samples consumed by the update recurrence.
pub trait RandomSource: Send {
    fn draw(&mut self) -> f64;
}

impl<F> RandomSource for F
where
    F: FnMut() -> f64 + Send,
{
    fn draw(&mut self) -> f64 {
        self()
    }
}

/// Declarative description of a random variable.
///
/// The textual form follows the attribute strings used by network simulators,
/// e.g. `Uniform[Min=10|Max=20]` or `ns3::NormalRandomVariable[Mean=0|Variance=1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RandomVariable {
    Constant { value: f64 },
    /// Half-open interval `[min, max)`.
    Uniform { min: f64, max: f64 },
    Normal { mean: f64, variance: f64 },
}

impl RandomVariable {
    /// Open a seeded sample stream for this variable.
    pub fn stream(&self, seed: u64) -> DomainResult<RandomStream> {
        let sampler = match *self {
            RandomVariable::Constant { value } => Sampler::Constant(value),
            RandomVariable::Uniform { min, max } => {
                if !(min.is_finite() && max.is_finite()) || min > max {
                    return Err(self.invalid("uniform bounds must be finite with min <= max"));
                }
                if !(max - min).is_finite() {
                    return Err(self.invalid("uniform range width overflows"));
                }
                if min == max {
                    Sampler::Constant(min)
                } else {
                    Sampler::Uniform(Uniform::new(min, max))
                }
            }
            RandomVariable::Normal { mean, variance } => {
                let normal = Normal::new(mean, variance.sqrt())
                    .map_err(|e| self.invalid(format!("bad normal parameters: {}", e)))?;
                Sampler::Normal(normal)
            }
        };

        Ok(RandomStream {
            sampler,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn invalid(&self, reason: impl Into<String>) -> DomainError {
        DomainError::RandomVariableParse {
            input: self.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RandomVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RandomVariable::Constant { value } => write!(f, "Constant[Constant={}]", value),
            RandomVariable::Uniform { min, max } => write!(f, "Uniform[Min={}|Max={}]", min, max),
            RandomVariable::Normal { mean, variance } => {
                write!(f, "Normal[Mean={}|Variance={}]", mean, variance)
            }
        }
    }
}

impl FromStr for RandomVariable {
    type Err = DomainError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let fail = |reason: String| DomainError::RandomVariableParse {
            input: input.to_string(),
            reason,
        };

        let trimmed = input.trim();
        let (head, body) = match trimmed.split_once('[') {
            Some((head, rest)) => {
                let body = rest
                    .strip_suffix(']')
                    .ok_or_else(|| fail("missing closing ']'".to_string()))?;
                (head, body)
            }
            None => (trimmed, ""),
        };

        let name = head.trim();
        let name = name.strip_prefix("ns3::").unwrap_or(name);
        let name = name.strip_suffix("RandomVariable").unwrap_or(name);

        let mut attributes = Vec::new();
        for pair in body.split('|').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| fail(format!("expected Key=Value, got '{}'", pair)))?;
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| fail(format!("'{}' is not a number", value.trim())))?;
            attributes.push((key.trim().to_string(), value));
        }

        let take = |attributes: &mut Vec<(String, f64)>, key: &str, default: f64| {
            match attributes.iter().position(|(k, _)| k == key) {
                Some(idx) => attributes.remove(idx).1,
                None => default,
            }
        };

        let variable = match name {
            "Constant" => RandomVariable::Constant {
                value: take(&mut attributes, "Constant", 0.0),
            },
            "Uniform" => RandomVariable::Uniform {
                min: take(&mut attributes, "Min", 0.0),
                max: take(&mut attributes, "Max", 1.0),
            },
            "Normal" => RandomVariable::Normal {
                mean: take(&mut attributes, "Mean", 0.0),
                variance: take(&mut attributes, "Variance", 1.0),
            },
            other => return Err(fail(format!("unknown random variable '{}'", other))),
        };

        if let Some((key, _)) = attributes.first() {
            return Err(fail(format!("unknown attribute '{}'", key)));
        }

        match variable {
            RandomVariable::Uniform { min, max } if min > max => {
                Err(fail("Min must not exceed Max".to_string()))
            }
            RandomVariable::Normal { variance, .. } if variance < 0.0 => {
                Err(fail("Variance must not be negative".to_string()))
            }
            v => Ok(v),
        }
    }
}

impl TryFrom<String> for RandomVariable {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RandomVariable> for String {
    fn from(value: RandomVariable) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone)]
enum Sampler {
    Constant(f64),
    Uniform(Uniform<f64>),
    Normal(Normal<f64>),
}

/// Seeded stream of samples drawn from a [`RandomVariable`].
#[derive(Debug, Clone)]
pub struct RandomStream {
    sampler: Sampler,
    rng: StdRng,
}

impl RandomSource for RandomStream {
    fn draw(&mut self) -> f64 {
        match &self.sampler {
            Sampler::Constant(value) => *value,
            Sampler::Uniform(uniform) => uniform.sample(&mut self.rng),
            Sampler::Normal(normal) => normal.sample(&mut self.rng),
        }
    }
}

/// Always returns the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSource(pub f64);

impl RandomSource for ConstantSource {
    fn draw(&mut self) -> f64 {
        self.0
    }
}

/// Replays a fixed list of values, wrapping around at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for SequenceSource {
    fn draw(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}

pub const SPEED_STREAM: u32 = 0;
pub const HEADING_STREAM: u32 = 1;
pub const PITCH_STREAM: u32 = 2;

/// Stream seed for one (agent, stream) pair. Without a global seed the
/// result comes from entropy.
pub fn derive_stream_seed(seed: Option<u64>, agent_id: u32, stream: u32) -> u64 {
    match seed {
        Some(seed) => {
            let key = ((agent_id as u64) << 32) | stream as u64;
            splitmix64(seed ^ splitmix64(key))
        }
        None => rand::random(),
    }
}

fn splitmix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// The three independent per-tick perturbation sources.
pub struct PerturbationSources {
    pub speed: Box<dyn RandomSource>,
    pub heading: Box<dyn RandomSource>,
    pub pitch: Box<dyn RandomSource>,
}

impl PerturbationSources {
    pub fn new(
        speed: impl RandomSource + 'static,
        heading: impl RandomSource + 'static,
        pitch: impl RandomSource + 'static,
    ) -> Self {
        Self {
            speed: Box::new(speed),
            heading: Box::new(heading),
            pitch: Box::new(pitch),
        }
    }

    pub fn constant(speed: f64, heading: f64, pitch: f64) -> Self {
        Self::new(ConstantSource(speed), ConstantSource(heading), ConstantSource(pitch))
    }

    pub fn from_params(params: &MobilityParams, agent_id: u32, seed: Option<u64>) -> DomainResult<Self> {
        Ok(Self::new(
            params.normal_velocity.stream(derive_stream_seed(seed, agent_id, SPEED_STREAM))?,
            params.normal_direction.stream(derive_stream_seed(seed, agent_id, HEADING_STREAM))?,
            params.normal_pitch.stream(derive_stream_seed(seed, agent_id, PITCH_STREAM))?,
        ))
    }

    /// One draw per source, in (speed, heading, pitch) order.
    pub fn draw(&mut self) -> [f64; 3] {
        [self.speed.draw(), self.heading.draw(), self.pitch.draw()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attribute_strings() {
        let v: RandomVariable = "ns3::UniformRandomVariable[Min=10|Max=20]".parse().unwrap();
        assert_eq!(v, RandomVariable::Uniform { min: 10.0, max: 20.0 });

        let v: RandomVariable = "Normal[Mean=0.0|Variance=0.02]".parse().unwrap();
        assert_eq!(v, RandomVariable::Normal { mean: 0.0, variance: 0.02 });

        let v: RandomVariable = "Constant[Constant=3]".parse().unwrap();
        assert_eq!(v, RandomVariable::Constant { value: 3.0 });
    }

    #[test]
    fn missing_attributes_take_defaults() {
        let v: RandomVariable = "Normal".parse().unwrap();
        assert_eq!(v, RandomVariable::Normal { mean: 0.0, variance: 1.0 });

        let v: RandomVariable = "Uniform[Max=4]".parse().unwrap();
        assert_eq!(v, RandomVariable::Uniform { min: 0.0, max: 4.0 });
    }

    #[test]
    fn rejects_malformed_input() {
        assert!("Gamma[Alpha=1]".parse::<RandomVariable>().is_err());
        assert!("Uniform[Min=1|Max=0]".parse::<RandomVariable>().is_err());
        assert!("Normal[Mean=0|Variance=-1]".parse::<RandomVariable>().is_err());
        assert!("Normal[Mean=zero]".parse::<RandomVariable>().is_err());
        assert!("Normal[Mean=0".parse::<RandomVariable>().is_err());
        assert!("Uniform[Min=0|Scale=2]".parse::<RandomVariable>().is_err());
    }

    #[test]
    fn display_parses_back() {
        let v = RandomVariable::Normal { mean: 1.5, variance: 0.1 };
        assert_eq!(v.to_string().parse::<RandomVariable>().unwrap(), v);
    }

    #[test]
    fn seeded_streams_repeat() {
        let v = RandomVariable::Normal { mean: 0.0, variance: 1.0 };
        let mut a = v.stream(7).unwrap();
        let mut b = v.stream(7).unwrap();
        for _ in 0..16 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn uniform_stream_stays_in_range() {
        let mut s = RandomVariable::Uniform { min: -0.1, max: 0.1 }.stream(3).unwrap();
        for _ in 0..1000 {
            let x = s.draw();
            assert!((-0.1..0.1).contains(&x));
        }
    }

    #[test]
    fn degenerate_uniform_is_constant() {
        let mut s = RandomVariable::Uniform { min: 2.0, max: 2.0 }.stream(1).unwrap();
        assert_eq!(s.draw(), 2.0);
    }

    #[test]
    fn overflowing_uniform_range_is_rejected() {
        let result = RandomVariable::Uniform { min: -1e308, max: 1e308 }.stream(1);
        assert!(matches!(result, Err(DomainError::RandomVariableParse { .. })));

        let result = RandomVariable::Uniform { min: f64::MAX / 2.0, max: f64::MAX }.stream(1);
        assert!(result.is_ok());
    }

    #[test]
    fn stream_seeds_differ_per_agent_and_stream() {
        let a = derive_stream_seed(Some(42), 0, SPEED_STREAM);
        let b = derive_stream_seed(Some(42), 0, HEADING_STREAM);
        let c = derive_stream_seed(Some(42), 1, SPEED_STREAM);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, derive_stream_seed(Some(42), 0, SPEED_STREAM));
    }

    #[test]
    fn sequence_source_wraps() {
        let mut s = SequenceSource::new(vec![1.0, 2.0]);
        assert_eq!([s.draw(), s.draw(), s.draw()], [1.0, 2.0, 1.0]);
        assert_eq!(SequenceSource::new(Vec::new()).draw(), 0.0);
    }
}
