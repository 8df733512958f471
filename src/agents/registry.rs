use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::agents::{InteractiveAgent, QLearningAgent, QLearningConfig, RandomAgent};
use crate::error::GameError;
use crate::player::Player;

/// Returns a normalized label for an agent spec (the head token before any ':').
pub fn label_for_spec(spec: &str) -> String {
    spec.split(':')
        .next()
        .unwrap_or(spec)
        .trim()
        .to_ascii_lowercase()
}

/// Create an agent from a CLI-style spec.
/// Supported specs:
/// - human[:name]
/// - random[:seed]
/// - qlearning[:seed] (untrained, default hyperparameters)
pub fn create_agent_from_spec(
    spec: &str,
    index: usize,
    seed: u64,
) -> Result<Box<dyn Player>, GameError> {
    let label = label_for_spec(spec);
    let argument = spec.split_once(':').map(|(_, value)| value.trim());
    let agent_seed = argument
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(seed ^ ((index as u64 + 1) * 0x9E37_79B9));
    match label.as_str() {
        "human" => {
            let name = argument
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Human {index}"));
            Ok(Box::new(InteractiveAgent::stdio(name)))
        }
        "random" => Ok(Box::new(RandomAgent::named(
            format!("Random {index}"),
            StdRng::seed_from_u64(agent_seed),
        ))),
        "qlearning" => Ok(Box::new(QLearningAgent::named(
            format!("QLearning {index}"),
            QLearningConfig::default(),
            StdRng::seed_from_u64(agent_seed),
        ))),
        _ => Err(GameError::UnknownAgent(spec.to_string())),
    }
}
