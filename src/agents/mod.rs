pub mod interactive;
pub mod qlearning;
pub mod random;
pub mod registry;

pub use interactive::InteractiveAgent;
pub use qlearning::{QLearningAgent, QLearningConfig};
pub use random::RandomAgent;
pub use registry::{create_agent_from_spec, label_for_spec};
