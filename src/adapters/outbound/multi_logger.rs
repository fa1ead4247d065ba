use crate::config::LoggingConfig;
use crate::domains::logger::{DomainLogger, LogLevel};
use std::sync::Arc;

/// Forwards every message to all attached loggers, in order.
pub struct MultiLogger {
    targets: Vec<Arc<dyn DomainLogger>>,
}

impl MultiLogger {
    pub fn new(targets: Vec<Arc<dyn DomainLogger>>) -> Self {
        Self { targets }
    }
}

impl DomainLogger for MultiLogger {
    fn log(&self, level: LogLevel, msg: &str) {
        for target in &self.targets {
            target.log(level, msg);
        }
    }
}

/// Build the domain logger described by the logging configuration: file
/// logger (plus console echo when enabled) if a log file is configured,
/// console only otherwise or if the file logger cannot be initialized.
pub fn init_domain_logger(config: &LoggingConfig) -> Arc<dyn DomainLogger> {
    let console = crate::adapters::outbound::init_console_logger();
    let Some(path) = config.log_file.as_deref() else {
        return console;
    };

    match crate::adapters::outbound::file_logger::init_file_logger(path) {
        Ok(file_logger) if config.console => {
            Arc::new(MultiLogger::new(vec![file_logger, console])) as Arc<dyn DomainLogger>
        }
        Ok(file_logger) => file_logger,
        Err(e) => {
            tracing::warn!("{}; logging to console only", e);
            console
        }
    }
}
