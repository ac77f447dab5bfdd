mod agent;
mod q_agent;
pub mod q_table;
mod random;
pub mod state_encoding;

pub use agent::Agent;
pub use q_agent::{AgentConfig, QLearningAgent};
pub use q_table::QTable;
pub use random::RandomAgent;
pub use state_encoding::{key_of, StateKey};
