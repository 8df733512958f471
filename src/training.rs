use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::agents::QLearningAgent;
use crate::game::GameEnvironment;
use crate::log::GameLog;
use crate::player::Player;

/// Settings for [`train`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainingConfig {
    pub episodes: usize,
    /// Forward game events to the environment's log sink.
    pub render: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            render: false,
        }
    }
}

/// What one training game produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeMetrics {
    pub episode: usize,
    /// Seat of the winner: 0 is the learner, 1 the opponent.
    pub winner: Option<PlayerId>,
    pub final_scores: [u32; 2],
    pub rounds: u32,
    /// Epsilon in force while the episode was played.
    pub epsilon: f32,
    /// Number of Q updates performed during the episode.
    pub updates: usize,
    /// Mean temporal difference of those updates, 0 when there were none.
    pub mean_td_error: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub episodes: Vec<EpisodeMetrics>,
}

impl TrainingReport {
    pub fn learner_wins(&self) -> usize {
        self.count_winner(Some(0))
    }

    pub fn opponent_wins(&self) -> usize {
        self.count_winner(Some(1))
    }

    /// Games stopped by the round cap.
    pub fn undecided(&self) -> usize {
        self.count_winner(None)
    }

    /// Learner win rate over each trailing window of `window` episodes.
    pub fn rolling_win_rate(&self, window: usize) -> Vec<f64> {
        let window = window.max(1);
        let mut rates = Vec::with_capacity(self.episodes.len());
        let mut wins = 0usize;
        for (idx, episode) in self.episodes.iter().enumerate() {
            if episode.winner == Some(0) {
                wins += 1;
            }
            if idx >= window && self.episodes[idx - window].winner == Some(0) {
                wins -= 1;
            }
            let span = (idx + 1).min(window);
            rates.push(wins as f64 / span as f64);
        }
        rates
    }

    fn count_winner(&self, winner: Option<PlayerId>) -> usize {
        self.episodes
            .iter()
            .filter(|episode| episode.winner == winner)
            .count()
    }
}

/// Trains `learner` (seat 0) against `opponent` (seat 1), which never learns.
///
/// Epsilon is decayed once after every episode.
pub fn train<L, R>(
    env: &mut GameEnvironment<L>,
    learner: &mut QLearningAgent<R>,
    opponent: &mut dyn Player,
    config: TrainingConfig,
) -> TrainingReport
where
    L: GameLog,
    R: Rng,
{
    let mut report = TrainingReport {
        episodes: Vec::with_capacity(config.episodes),
    };
    for episode in 0..config.episodes {
        let epsilon = learner.epsilon();
        let errors_before = learner.training_error().len();
        let outcome = env.run(learner, opponent, config.render, true, false);
        let new_errors = &learner.training_error()[errors_before..];
        let mean_td_error = if new_errors.is_empty() {
            0.0
        } else {
            new_errors.iter().sum::<f32>() / new_errors.len() as f32
        };
        report.episodes.push(EpisodeMetrics {
            episode,
            winner: outcome.winner,
            final_scores: outcome.final_scores,
            rounds: outcome.round_count,
            epsilon,
            updates: new_errors.len(),
            mean_td_error,
        });
        learner.decay_epsilon();
    }
    report
}

/// Tally of a head-to-head series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub games: usize,
    /// Wins for the first and second agent passed to [`evaluate`].
    pub wins: [usize; 2],
    pub undecided: usize,
    pub total_rounds: u64,
}

impl MatchSummary {
    pub fn win_rate(&self, agent: usize) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins[agent] as f64 / self.games as f64
        }
    }

    pub fn mean_rounds(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_rounds as f64 / self.games as f64
        }
    }
}

/// Plays `games` non-learning games, swapping which agent is player 0 every game.
pub fn evaluate<L: GameLog>(
    env: &mut GameEnvironment<L>,
    first: &mut dyn Player,
    second: &mut dyn Player,
    games: usize,
) -> MatchSummary {
    let mut summary = MatchSummary::default();
    for game in 0..games {
        let swapped = game % 2 == 1;
        let outcome = if swapped {
            env.run(second, first, false, false, false)
        } else {
            env.run(first, second, false, false, false)
        };
        summary.games += 1;
        summary.total_rounds += u64::from(outcome.round_count);
        match outcome.winner {
            Some(seat) => {
                let agent = if swapped { 1 - seat } else { seat };
                summary.wins[agent] += 1;
            }
            None => summary.undecided += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(winner: Option<PlayerId>) -> EpisodeMetrics {
        EpisodeMetrics {
            episode: 0,
            winner,
            final_scores: [0, 0],
            rounds: 1,
            epsilon: 0.0,
            updates: 0,
            mean_td_error: 0.0,
        }
    }

    #[test]
    fn rolling_rate_uses_trailing_window() {
        let report = TrainingReport {
            episodes: vec![
                episode(Some(0)),
                episode(Some(1)),
                episode(Some(0)),
                episode(None),
            ],
        };
        assert_eq!(report.rolling_win_rate(2), vec![1.0, 0.5, 0.5, 0.5]);
        assert_eq!(report.learner_wins(), 2);
        assert_eq!(report.opponent_wins(), 1);
        assert_eq!(report.undecided(), 1);
    }

    #[test]
    fn empty_summary_has_zero_rates() {
        let summary = MatchSummary::default();
        assert_eq!(summary.win_rate(0), 0.0);
        assert_eq!(summary.mean_rounds(), 0.0);
    }
}
