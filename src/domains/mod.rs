pub mod logger;
pub mod mobility;
pub mod scheduler;

pub use logger::*;
pub use mobility::*;
pub use scheduler::*;
