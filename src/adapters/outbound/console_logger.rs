use crate::domains::logger::{DomainLogger, LogLevel};
use std::sync::Arc;

struct ConsoleBridge {
    min_level: LogLevel,
}

fn rank(level: LogLevel) -> u8 {
    match level {
        LogLevel::Debug => 0,
        LogLevel::Info => 1,
        LogLevel::Warn => 2,
        LogLevel::Error => 3,
    }
}

impl DomainLogger for ConsoleBridge {
    fn log(&self, level: LogLevel, msg: &str) {
        if rank(level) < rank(self.min_level) {
            return;
        }
        match level {
            LogLevel::Info => println!("{}", msg),
            LogLevel::Debug | LogLevel::Warn => println!("{}: {}", level, msg),
            LogLevel::Error => eprintln!("{}: {}", level, msg),
        }
    }
}

/// Initialize a console-backed DomainLogger (stdout, errors on stderr).
pub fn init_console_logger() -> Arc<dyn DomainLogger> {
    init_console_logger_with_level(LogLevel::Info)
}

pub fn init_console_logger_with_level(min_level: LogLevel) -> Arc<dyn DomainLogger> {
    Arc::new(ConsoleBridge { min_level })
}
