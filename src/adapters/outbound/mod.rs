pub mod buffered_logger;
pub mod channel_sink;
pub mod console_logger;
pub mod diagnostics_sinks;
pub mod file_logger;
pub mod json_lines_sink;
pub mod multi_logger;
pub mod noop_logger;

pub use buffered_logger::*;
pub use channel_sink::*;
pub use console_logger::*;
pub use diagnostics_sinks::*;
pub use file_logger::*;
pub use json_lines_sink::*;
pub use multi_logger::*;
pub use noop_logger::*;
