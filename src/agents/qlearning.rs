use std::collections::HashMap;

use rand::Rng;

use crate::action::Action;
use crate::player::{Player, Transition};
use crate::state::Observation;

/// Action values for one observation, indexed by [`Action::index`].
pub type QRow = [f32; Action::COUNT];

/// Hyperparameters for [`QLearningAgent`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QLearningConfig {
    pub learning_rate: f32,
    pub initial_epsilon: f32,
    /// Subtracted from epsilon by every [`QLearningAgent::decay_epsilon`] call.
    pub epsilon_decay: f32,
    pub final_epsilon: f32,
    pub discount_factor: f32,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            initial_epsilon: 1.0,
            epsilon_decay: 1.0e-3,
            final_epsilon: 0.1,
            discount_factor: 0.95,
        }
    }
}

impl QLearningConfig {
    /// Linear decay that reaches `final_epsilon` halfway through `episodes`.
    pub fn with_schedule(mut self, episodes: usize) -> Self {
        let span = (episodes / 2).max(1) as f32;
        self.epsilon_decay = (self.initial_epsilon - self.final_epsilon).max(0.0) / span;
        self
    }
}

/// Tabular Q-learning agent with epsilon-greedy exploration.
pub struct QLearningAgent<R: Rng> {
    name: String,
    config: QLearningConfig,
    epsilon: f32,
    q_values: HashMap<Observation, QRow>,
    training_error: Vec<f32>,
    rng: R,
}

impl<R: Rng> QLearningAgent<R> {
    pub fn new(config: QLearningConfig, rng: R) -> Self {
        Self::named("QLearningPlayer", config, rng)
    }

    pub fn named(name: impl Into<String>, config: QLearningConfig, rng: R) -> Self {
        Self {
            name: name.into(),
            config,
            epsilon: config.initial_epsilon,
            q_values: HashMap::new(),
            training_error: Vec::new(),
            rng,
        }
    }

    pub fn config(&self) -> QLearningConfig {
        self.config
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f32) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    /// Lowers epsilon linearly, never below `final_epsilon`.
    pub fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon - self.config.epsilon_decay).max(self.config.final_epsilon);
    }

    pub fn q_values(&self) -> &HashMap<Observation, QRow> {
        &self.q_values
    }

    pub fn set_q_values(&mut self, q_values: HashMap<Observation, QRow>) {
        self.q_values = q_values;
    }

    /// Stored values for `observation`, zeros when it was never updated.
    pub fn q_row(&self, observation: &Observation) -> QRow {
        self.q_values
            .get(observation)
            .copied()
            .unwrap_or([0.0; Action::COUNT])
    }

    /// Every temporal difference seen so far, oldest first.
    pub fn training_error(&self) -> &[f32] {
        &self.training_error
    }

    /// Highest valued action; the lowest index wins ties.
    pub fn greedy_action(&self, observation: &Observation) -> Action {
        let row = self.q_row(observation);
        let mut best = 0;
        for (index, value) in row.iter().enumerate().skip(1) {
            if *value > row[best] {
                best = index;
            }
        }
        Action::from_index(best).unwrap_or(Action::PASS)
    }
}

impl<R: Rng> Player for QLearningAgent<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_action(&mut self, observation: &Observation) -> Action {
        if self.rng.gen_range(0.0..1.0) < self.epsilon {
            let index = self.rng.gen_range(0..Action::COUNT);
            return Action::from_index(index).unwrap_or(Action::PASS);
        }
        self.greedy_action(observation)
    }

    fn observe_outcome(&mut self, transition: &Transition) {
        let future = if transition.terminal {
            0.0
        } else {
            self.q_row(&transition.next_observation)
                .into_iter()
                .fold(f32::NEG_INFINITY, f32::max)
        };
        let index = transition.action.index();
        let row = self
            .q_values
            .entry(transition.observation)
            .or_insert([0.0; Action::COUNT]);
        let temporal_difference =
            transition.reward + self.config.discount_factor * future - row[index];
        row[index] += self.config.learning_rate * temporal_difference;
        self.training_error.push(temporal_difference);
    }
}
