use std::error::Error;
use std::sync::Arc;
use swarm_mobility::adapters::outbound::{init_domain_logger, FanoutSink, JsonLinesSink, LoggerSink};
use swarm_mobility::application::SwarmSimulation;
use swarm_mobility::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "SWARM_MOBILITY_CONFIG";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting swarm mobility simulation");

    // Load configuration
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::from_file_or_default(&path).await?;
    info!("Configuration ready ({})", path);

    let logger = init_domain_logger(&config.logging);

    let mut sinks = FanoutSink::new(Vec::new());
    if config.logging.echo_ticks {
        sinks.push(Arc::new(LoggerSink::new(logger.clone())));
    }
    let telemetry = match config.logging.telemetry_file.as_deref() {
        Some(file) => {
            let sink = Arc::new(JsonLinesSink::create(file, "swarm-mobility")?);
            sinks.push(sink.clone());
            info!("Writing tick telemetry to {}", file);
            Some(sink)
        }
        None => None,
    };

    let mut simulation = SwarmSimulation::from_config(&config, sinks.into_dyn(), logger)?;
    let summary = simulation.run();

    if let Some(sink) = telemetry {
        sink.flush()?;
    }

    info!(
        "Done: {} agents, {} ticks, {:.1}s simulated, {} outside bounds",
        summary.agents, summary.ticks, summary.simulated_seconds, summary.agents_outside_bounds
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
