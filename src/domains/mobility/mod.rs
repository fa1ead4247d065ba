pub mod actors;
pub mod aggregate;
pub mod allocator;
pub mod engine;
pub mod events;
pub mod node;
pub mod params;
pub mod ports;
pub mod projections;
pub mod random;

pub use actors::*;
pub use aggregate::*;
pub use allocator::*;
pub use engine::*;
pub use events::*;
pub use node::*;
pub use params::*;
pub use ports::*;
pub use projections::*;
pub use random::*;
