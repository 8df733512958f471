use crate::action::Action;
use crate::error::GameError;
use crate::state::{Observation, StepInfo};

/// One learning sample: what the agent saw, what it did and what followed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub observation: Observation,
    pub action: Action,
    pub next_observation: Observation,
    pub reward: f32,
    pub terminal: bool,
    pub info: StepInfo,
}

/// Interface every 421 agent implements.
pub trait Player {
    /// Human readable name used in logs.
    fn name(&self) -> &str;

    /// Picks which dice to reroll for the current observation.
    fn choose_action(&mut self, observation: &Observation) -> Action;

    /// Feedback for every elected throw. The opening throw of a turn is never reported.
    fn observe_outcome(&mut self, _transition: &Transition) {}

    /// Called once before a new game starts.
    fn reset_episode(&mut self) {}

    fn save_model(&self, _prefix: &str) -> Result<(), GameError> {
        Err(GameError::NotImplemented {
            agent: self.name().to_string(),
            capability: "save_model",
        })
    }

    fn load_model(&mut self, _prefix: &str) -> Result<(), GameError> {
        Err(GameError::NotImplemented {
            agent: self.name().to_string(),
            capability: "load_model",
        })
    }
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn choose_action(&mut self, observation: &Observation) -> Action {
        (**self).choose_action(observation)
    }

    fn observe_outcome(&mut self, transition: &Transition) {
        (**self).observe_outcome(transition)
    }

    fn reset_episode(&mut self) {
        (**self).reset_episode()
    }

    fn save_model(&self, prefix: &str) -> Result<(), GameError> {
        (**self).save_model(prefix)
    }

    fn load_model(&mut self, prefix: &str) -> Result<(), GameError> {
        (**self).load_model(prefix)
    }
}
