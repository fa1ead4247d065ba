pub mod realtime;
pub mod swarm_service;

pub use realtime::*;
pub use swarm_service::*;
