pub mod agent;
pub mod collector;
pub mod normalize;

pub use agent::{AgentClient, ChartSource, FetchError};
pub use collector::ClusterCollector;
