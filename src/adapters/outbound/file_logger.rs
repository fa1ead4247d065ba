use crate::common::{ApplicationError, ApplicationResult};
use crate::domains::logger::{DomainLogger, FileLogger};
use std::sync::Arc;

/// Initialize the global fast_log file logger and return a domain logger the
/// application can inject. fast_log can only be initialized once per process.
pub fn init_file_logger(path: &str) -> ApplicationResult<Arc<dyn DomainLogger>> {
    FileLogger::init(path, log::LevelFilter::Info)
        .map_err(|e| ApplicationError::Logger(format!("Failed to initialize fast_log: {}", e)))?;
    Ok(Arc::new(FileLogger))
}
