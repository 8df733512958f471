use serde::{Deserialize, Serialize};

use crate::action::{DICE_COUNT, PlayerId};
use crate::combination::Combination;

/// Role within a round: who throws first and who answers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub fn index(self) -> u8 {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }
}

/// Where the environment stands in its game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameStatus {
    NotStarted,
    RoundInProgress { seat: Seat },
    RoundResolved { winner: Option<PlayerId> },
    GameOver { winner: Option<PlayerId> },
}

/// Everything the acting player may see before choosing which dice to reroll.
///
/// "Player" fields belong to the acting player, "opponent" fields to the other one.
/// Combinations read `[0, 0, 0]` until their owner has thrown this round.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Observation {
    pub player_comb: [u8; DICE_COUNT],
    pub opp_comb: [u8; DICE_COUNT],
    pub round_nb: u32,
    pub max_throws: u8,
    pub current_throws: u8,
    pub state_round: u8,
    pub player_score: u32,
    pub opp_score: u32,
}

impl Observation {
    pub fn player_combination(&self) -> Option<Combination> {
        played(self.player_comb)
    }

    pub fn opponent_combination(&self) -> Option<Combination> {
        played(self.opp_comb)
    }

    /// Throws still available after the current one.
    pub fn throws_left(&self) -> u8 {
        self.max_throws.saturating_sub(self.current_throws + 1)
    }
}

fn played(values: [u8; DICE_COUNT]) -> Option<Combination> {
    (values != [0; DICE_COUNT]).then(|| Combination::new(values))
}

/// Extra step details. Always empty; kept for the environment step signature.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepInfo {}

/// Result of applying one action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f32,
    /// The throw decided the round in the acting player's favour.
    pub terminal: bool,
    pub info: StepInfo,
}

/// Externally observable result of a full game.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameOutcome {
    /// `None` when the round cap ended the game.
    pub winner: Option<PlayerId>,
    pub final_scores: [u32; 2],
    pub round_count: u32,
    /// Score snapshots, starting at `(0, 0)` and extended after every round.
    pub score_history: Vec<(u32, u32)>,
}
