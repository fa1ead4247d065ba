use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use anyhow::{Context, Result};

use crate::common::{DomainError, DomainResult};
use crate::domains::mobility::{Bounds, DecayFactors, MobilityParams, RandomVariable};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mobility: MobilityConfig,
    pub scenario: ScenarioConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MobilityConfig {
    pub alpha: f64,
    pub decay: DecayFactors,
    pub time_step_seconds: f64,
    pub bounds: Bounds,
    pub mean_velocity: RandomVariable,
    pub mean_direction: RandomVariable,
    pub mean_pitch: RandomVariable,
    pub normal_velocity: RandomVariable,
    pub normal_direction: RandomVariable,
    pub normal_pitch: RandomVariable,
    /// Global seed for every random stream; entropy when absent.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub agent_count: u32,
    pub duration_seconds: f64,
    /// Box the initial positions are drawn from.
    pub initial_area: Bounds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_file: Option<String>,
    pub console: bool,
    /// JSON Lines telemetry output, one envelope per tick record.
    pub telemetry_file: Option<String>,
    /// Emit a human-readable line per tick through the domain logger.
    pub echo_ticks: bool,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Like `from_file`, but a missing file yields the default configuration.
    /// Unreadable or malformed files are still errors.
    pub async fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Self::from_toml(&content)
                .with_context(|| format!("parsing {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("{} not found, using default configuration", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

impl MobilityConfig {
    pub fn to_params(&self) -> DomainResult<MobilityParams> {
        let time_step = seconds("time_step_seconds", self.time_step_seconds)?;
        MobilityParams::builder()
            .alpha(self.alpha)
            .decay_factors(self.decay.speed, self.decay.heading, self.decay.pitch)
            .time_step(time_step)
            .bounds(self.bounds)
            .mean_sources(
                self.mean_velocity.clone(),
                self.mean_direction.clone(),
                self.mean_pitch.clone(),
            )
            .perturbation_sources(
                self.normal_velocity.clone(),
                self.normal_direction.clone(),
                self.normal_pitch.clone(),
            )
            .build()
    }
}

impl ScenarioConfig {
    pub fn duration(&self) -> DomainResult<Duration> {
        seconds("duration_seconds", self.duration_seconds)
    }
}

fn seconds(name: &str, value: f64) -> DomainResult<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| DomainError::invalid_parameter(name, e.to_string()))
}

impl Default for MobilityConfig {
    fn default() -> Self {
        let params = MobilityParams::default();
        Self {
            alpha: params.alpha,
            decay: params.decay,
            time_step_seconds: params.time_step.as_secs_f64(),
            bounds: params.bounds,
            mean_velocity: params.mean_velocity,
            mean_direction: params.mean_direction,
            mean_pitch: params.mean_pitch,
            normal_velocity: params.normal_velocity,
            normal_direction: params.normal_direction,
            normal_pitch: params.normal_pitch,
            seed: None,
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            agent_count: 20,
            duration_seconds: 10.0,
            initial_area: Bounds::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            console: true,
            telemetry_file: None,
            echo_ticks: true,
        }
    }
}
