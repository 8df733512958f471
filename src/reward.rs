//! Reward shaping for a single throw, seen from the acting player.
//!
//! The total is the sum of independently triggered factors:
//!   -1    new combination is worse than the player's previous one or the opponent's
//!   +0.5  new combination ties the opponent's
//!   +1    new combination improves on the player's previous one
//!   +2    new combination beats the opponent's
//!   +N    the throw wins the round from the second seat (N = combination points)
//!   +100  that round win also brings the score lead to the winning gap

use serde::{Deserialize, Serialize};

pub const LOSS_REWARD: f32 = -1.0;
pub const DRAW_REWARD: f32 = 0.5;
pub const IMPROVEMENT_REWARD: f32 = 1.0;
pub const BEATING_REWARD: f32 = 2.0 * IMPROVEMENT_REWARD;
pub const WIN_GAME_REWARD: f32 = 100.0;

/// Which reward factors fired for one throw.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub losing: bool,
    pub equalizing: bool,
    pub improvement: bool,
    pub beating: bool,
    pub round_winning: bool,
    pub game_winning: bool,
    /// Points of the new combination, paid out when `round_winning` holds.
    pub points: u8,
}

impl RewardBreakdown {
    pub fn total(&self) -> f32 {
        let mut reward = 0.0;
        if self.losing {
            reward += LOSS_REWARD;
        }
        if self.equalizing {
            reward += DRAW_REWARD;
        }
        if self.improvement {
            reward += IMPROVEMENT_REWARD;
        }
        if self.beating {
            reward += BEATING_REWARD;
        }
        if self.round_winning {
            reward += f32::from(self.points);
        }
        if self.game_winning {
            reward += WIN_GAME_REWARD;
        }
        reward
    }
}
