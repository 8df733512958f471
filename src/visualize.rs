use std::fmt::Write;
use std::str::FromStr;

use crate::action::{Action, DICE_COUNT};
use crate::combination::Combination;
use crate::error::GameError;
use crate::state::Observation;

/// Supported targets for [`crate::GameEnvironment::render`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Console,
}

impl FromStr for RenderMode {
    type Err = GameError;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "console" => Ok(RenderMode::Console),
            other => Err(GameError::UnsupportedMode(other.to_string())),
        }
    }
}

/// Multi-line summary of what the acting player sees.
pub fn render_observation(observation: &Observation) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Round {}  |  {} seat  |  throw {}/{}",
        observation.round_nb,
        if observation.state_round == 0 {
            "first"
        } else {
            "second"
        },
        observation.current_throws + 1,
        observation.max_throws
    );
    let _ = writeln!(
        out,
        "Score: you {}  -  opponent {}",
        observation.player_score, observation.opp_score
    );
    let _ = writeln!(
        out,
        "Your dice:     {}{}",
        format_faces(observation.player_comb),
        points_suffix(observation.player_combination())
    );
    let _ = writeln!(
        out,
        "Opponent dice: {}{}",
        format_faces(observation.opp_comb),
        points_suffix(observation.opponent_combination())
    );
    let _ = write!(out, "Throws left after this one: {}", observation.throws_left());
    out
}

fn points_suffix(combination: Option<Combination>) -> String {
    combination
        .map(|c| format!("  ({} pts)", c.points()))
        .unwrap_or_default()
}

/// Human wording for a reroll mask, e.g. "reroll dice 1 and 3".
pub fn describe_action(action: &Action) -> String {
    if action.is_pass() {
        return String::from("pass (keep all dice)");
    }
    if *action == Action::THROW_ALL {
        return String::from("reroll all dice");
    }
    let positions: Vec<String> = action
        .mask()
        .iter()
        .enumerate()
        .filter(|(_, reroll)| **reroll)
        .map(|(idx, _)| (idx + 1).to_string())
        .collect();
    if action.rerolled() == 1 {
        format!("reroll die {}", positions[0])
    } else {
        format!("reroll dice {}", positions.join(" and "))
    }
}

pub fn format_faces(faces: [u8; DICE_COUNT]) -> String {
    if faces == [0; DICE_COUNT] {
        return String::from("[- - -]");
    }
    format!("[{} {} {}]", faces[0], faces[1], faces[2])
}
