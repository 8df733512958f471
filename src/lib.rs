//! Two-player 421 dice game engine shaped as a reinforcement learning environment, plus agents.

pub mod action;
pub mod agents;
pub mod combination;
pub mod dice;
pub mod error;
pub mod game;
pub mod log;
pub mod player;
pub mod reward;
pub mod state;
pub mod training;
pub mod visualize;

pub use crate::action::{Action, PlayerId};
pub use crate::agents::{
    InteractiveAgent, QLearningAgent, QLearningConfig, RandomAgent, create_agent_from_spec,
    label_for_spec,
};
pub use crate::combination::Combination;
pub use crate::dice::{DiceSet, Die};
pub use crate::error::GameError;
pub use crate::game::{GameBuilder, GameConfig, GameEnvironment};
pub use crate::log::{ConsoleLog, GameEvent, GameLog, LogLevel, MemoryLog, NdjsonLog, NullLog, TeeLog};
pub use crate::player::{Player, Transition};
pub use crate::reward::RewardBreakdown;
pub use crate::state::{GameOutcome, GameStatus, Observation, Seat, StepInfo, StepOutcome};
pub use crate::training::{
    EpisodeMetrics, MatchSummary, TrainingConfig, TrainingReport, evaluate, train,
};
pub use crate::visualize::{RenderMode, describe_action, render_observation};
