use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::action::{Action, DICE_COUNT, PlayerId};
use crate::combination::Combination;
use crate::dice::DiceSet;
use crate::error::GameError;
use crate::log::{GameEvent, GameLog, NullLog};
use crate::player::{Player, Transition};
use crate::reward::RewardBreakdown;
use crate::state::{GameOutcome, GameStatus, Observation, Seat, StepInfo, StepOutcome};
use crate::visualize::RenderMode;

pub const DEFAULT_MAX_ROUNDS: u32 = 100;
pub const DEFAULT_WINNING_GAP: u32 = 21;
pub const DEFAULT_MAX_THROWS: u8 = 3;

/// Rules and randomness needed to bootstrap an environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Seed for dice and first-seat draws. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Decided rounds after which the game stops without a winner.
    pub max_rounds: u32,
    /// Score lead that ends the game.
    pub winning_gap: u32,
    /// Throws per turn before any pass shortens the round.
    pub max_throws: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_rounds: DEFAULT_MAX_ROUNDS,
            winning_gap: DEFAULT_WINNING_GAP,
            max_throws: DEFAULT_MAX_THROWS,
        }
    }
}

impl GameConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.max_rounds == 0 {
            return Err(GameError::InvalidConfiguration("max rounds must be positive"));
        }
        if self.winning_gap == 0 {
            return Err(GameError::InvalidConfiguration("winning gap must be positive"));
        }
        if self.max_throws == 0 {
            return Err(GameError::InvalidConfiguration("max throws must be positive"));
        }
        Ok(())
    }
}

/// Builder for [`GameEnvironment`], mostly useful to inject a log sink.
pub struct GameBuilder<L: GameLog = NullLog> {
    config: GameConfig,
    log: L,
}

impl GameBuilder<NullLog> {
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            log: NullLog,
        }
    }
}

impl Default for GameBuilder<NullLog> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: GameLog> GameBuilder<L> {
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.config.max_rounds = max_rounds;
        self
    }

    pub fn with_winning_gap(mut self, winning_gap: u32) -> Self {
        self.config.winning_gap = winning_gap;
        self
    }

    pub fn with_max_throws(mut self, max_throws: u8) -> Self {
        self.config.max_throws = max_throws;
        self
    }

    pub fn with_log<M: GameLog>(self, log: M) -> GameBuilder<M> {
        GameBuilder {
            config: self.config,
            log,
        }
    }

    pub fn build(self) -> Result<GameEnvironment<L>, GameError> {
        GameEnvironment::with_log(self.config, self.log)
    }
}

/// State that lives for a single round.
#[derive(Clone, Debug)]
struct RoundState {
    current_player: PlayerId,
    combinations: [Option<Combination>; 2],
    max_throws: u8,
    current_throw: u8,
    seat: Seat,
}

impl RoundState {
    fn new(leader: PlayerId, max_throws: u8) -> Self {
        Self {
            current_player: leader,
            combinations: [None, None],
            max_throws,
            current_throw: 0,
            seat: Seat::First,
        }
    }
}

/// State that lives for a whole game.
#[derive(Clone, Debug)]
struct GameState {
    scores: [u32; 2],
    round_number: u32,
    winner_round: Option<PlayerId>,
    winner_game: Option<PlayerId>,
    score_history: Vec<(u32, u32)>,
}

impl GameState {
    fn new() -> Self {
        Self {
            scores: [0, 0],
            round_number: 0,
            winner_round: None,
            winner_game: None,
            score_history: vec![(0, 0)],
        }
    }
}

/// Two-player 421 environment: dice, scoring, rewards and the round loop.
pub struct GameEnvironment<L: GameLog = NullLog> {
    config: GameConfig,
    rng: StdRng,
    dice: [DiceSet; 2],
    round: RoundState,
    game: GameState,
    status: GameStatus,
    names: [String; 2],
    log: L,
    emit_events: bool,
}

impl GameEnvironment<NullLog> {
    pub fn builder() -> GameBuilder<NullLog> {
        GameBuilder::new()
    }

    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_log(config, NullLog)
    }
}

impl<L: GameLog> GameEnvironment<L> {
    pub fn with_log(config: GameConfig, log: L) -> Result<Self, GameError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            rng,
            dice: [DiceSet::new(), DiceSet::new()],
            round: RoundState::new(0, config.max_throws),
            game: GameState::new(),
            status: GameStatus::NotStarted,
            names: [String::from("Player 0"), String::from("Player 1")],
            log,
            emit_events: true,
        })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn scores(&self) -> [u32; 2] {
        self.game.scores
    }

    pub fn round_number(&self) -> u32 {
        self.game.round_number
    }

    pub fn current_player(&self) -> PlayerId {
        self.round.current_player
    }

    pub fn seat(&self) -> Seat {
        self.round.seat
    }

    pub fn max_throws(&self) -> u8 {
        self.round.max_throws
    }

    pub fn current_throw(&self) -> u8 {
        self.round.current_throw
    }

    pub fn combinations(&self) -> [Option<Combination>; 2] {
        self.round.combinations
    }

    /// Digit codes of this round's combinations, 0 for a player who has not thrown.
    pub fn combination_values(&self) -> [u16; 2] {
        self.round
            .combinations
            .map(|combination| combination.map_or(0, |c| c.digit_code()))
    }

    pub fn winner_round(&self) -> Option<PlayerId> {
        self.game.winner_round
    }

    /// Winner of a finished game; `None` while running or after a round-cap finish.
    pub fn winner(&self) -> Option<PlayerId> {
        self.game.winner_game
    }

    pub fn score_history(&self) -> &[(u32, u32)] {
        &self.game.score_history
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut L {
        &mut self.log
    }

    /// Clears all game-level state ahead of a new game.
    pub fn reset(&mut self) {
        self.dice = [DiceSet::new(), DiceSet::new()];
        self.round = RoundState::new(0, self.config.max_throws);
        self.game = GameState::new();
        self.status = GameStatus::NotStarted;
    }

    /// Starts a round: the previous round winner leads, otherwise a random player does.
    pub fn reset_round(&mut self) {
        let leader = match self.game.winner_round {
            Some(winner) => winner,
            None => self.rng.gen_range(0..2),
        };
        self.dice = [DiceSet::new(), DiceSet::new()];
        self.round = RoundState::new(leader, self.config.max_throws);
        self.status = GameStatus::RoundInProgress { seat: Seat::First };
    }

    /// True once the score gap or the round cap has been reached.
    pub fn is_game_over(&self) -> bool {
        self.game.scores[0].abs_diff(self.game.scores[1]) >= self.config.winning_gap
            || self.game.round_number >= self.config.max_rounds
    }

    /// Observation from the acting player's point of view.
    pub fn observation(&self) -> Observation {
        let current = self.round.current_player;
        let opponent = 1 - current;
        Observation {
            player_comb: faces(self.round.combinations[current]),
            opp_comb: faces(self.round.combinations[opponent]),
            round_nb: self.game.round_number,
            max_throws: self.round.max_throws,
            current_throws: self.round.current_throw,
            state_round: self.round.seat.index(),
            player_score: self.game.scores[current],
            opp_score: self.game.scores[opponent],
        }
    }

    /// Throws the dice for the acting player and scores the result.
    pub fn step(&mut self, action: Action) -> StepOutcome {
        let current = self.round.current_player;
        let combination = self.dice[current].reroll(action, &mut self.rng);
        let previous = self.round.combinations[current];
        self.emit(GameEvent::NewCombination {
            player: self.names[current].clone(),
            combination: combination.digit_code(),
            previous: previous.map(|c| c.digit_code()),
        });

        let breakdown = self.compute_reward(&combination);
        let reward = breakdown.total();
        self.emit(GameEvent::Reward {
            breakdown,
            total: reward,
        });

        self.round.combinations[current] = Some(combination);
        StepOutcome {
            observation: self.observation(),
            reward,
            terminal: breakdown.round_winning,
            info: StepInfo::default(),
        }
    }

    /// Reward factors for `combination` against the state before it is stored.
    pub fn compute_reward(&self, combination: &Combination) -> RewardBreakdown {
        let current = self.round.current_player;
        let own = self.round.combinations[current];
        let opponent = self.round.combinations[1 - current];
        RewardBreakdown {
            losing: own.is_some_and(|own| *combination < own)
                || opponent.is_some_and(|opp| *combination < opp),
            equalizing: opponent.is_some_and(|opp| *combination == opp),
            improvement: own.is_some_and(|own| *combination > own),
            beating: opponent.is_some_and(|opp| *combination > opp),
            round_winning: self.wins_round(combination),
            game_winning: self.wins_game(combination),
            points: combination.points(),
        }
    }

    /// Whether `combination`, thrown now, would take the round.
    pub fn wins_round(&self, combination: &Combination) -> bool {
        let opponent = self.round.combinations[1 - self.round.current_player];
        self.round.seat == Seat::Second && opponent.is_some_and(|opp| *combination > opp)
    }

    /// Whether `combination`, thrown now, would take the round and push the lead to the winning gap.
    pub fn wins_game(&self, combination: &Combination) -> bool {
        let current = self.round.current_player;
        let lead = i64::from(combination.points()) + i64::from(self.game.scores[current])
            - i64::from(self.game.scores[1 - current]);
        self.wins_round(combination) && lead >= i64::from(self.config.winning_gap)
    }

    /// Compares both combinations, pays the winner and records who won.
    pub fn resolve_round(&mut self) -> Option<PlayerId> {
        debug_assert!(
            self.round.combinations.iter().all(Option::is_some),
            "both players must throw before a round is resolved"
        );
        let winner = match self.round.combinations {
            [Some(first), Some(second)] => match first.cmp(&second) {
                Ordering::Greater => Some((0, first)),
                Ordering::Less => Some((1, second)),
                Ordering::Equal => None,
            },
            _ => None,
        };
        if let Some((player, combination)) = winner {
            self.game.scores[player] += u32::from(combination.points());
        }
        let winner = winner.map(|(player, _)| player);
        self.game.winner_round = winner;
        self.status = GameStatus::RoundResolved { winner };
        winner
    }

    /// Plays a full game between `player_a` (player 0) and `player_b` (player 1).
    ///
    /// Events are only emitted when `render` is set. `learn_a`/`learn_b` decide
    /// whether each player receives [`Player::observe_outcome`] callbacks.
    pub fn run(
        &mut self,
        player_a: &mut dyn Player,
        player_b: &mut dyn Player,
        render: bool,
        learn_a: bool,
        learn_b: bool,
    ) -> GameOutcome {
        self.emit_events = render;
        self.names = [player_a.name().to_string(), player_b.name().to_string()];
        self.emit(GameEvent::GameStarted {
            players: self.names.clone(),
        });

        let mut players: [&mut dyn Player; 2] = [player_a, player_b];
        let learn = [learn_a, learn_b];
        for player in players.iter_mut() {
            player.reset_episode();
        }
        self.reset();

        while !self.is_game_over() {
            self.emit(GameEvent::RoundStarted {
                round: self.game.round_number,
            });
            self.reset_round();

            let first = self.round.current_player;
            self.play_turn(&mut *players[first], learn[first]);

            self.begin_second_seat();
            let second = self.round.current_player;
            self.play_turn(&mut *players[second], learn[second]);

            let winner = self.resolve_round();
            let scores = self.game.scores;
            self.game.score_history.push((scores[0], scores[1]));
            self.emit(GameEvent::RoundResolved {
                scores,
                winner,
                winner_name: winner.map(|w| self.names[w].clone()),
            });
            // Tied rounds are replayed without advancing the round counter.
            if winner.is_some() {
                self.game.round_number += 1;
            }
        }

        self.finish_game()
    }

    /// Text summary of the current round for `mode`. Only `"console"` is supported.
    pub fn render(&self, mode: &str) -> Result<String, GameError> {
        match mode.parse::<RenderMode>()? {
            RenderMode::Console => {
                let values = self.combination_values();
                Ok(format!(
                    "Round {}\nCombinations: [{}, {}]\nScore: [{}, {}]",
                    self.game.round_number,
                    values[0],
                    values[1],
                    self.game.scores[0],
                    self.game.scores[1]
                ))
            }
        }
    }

    /// Flushes the injected log sink.
    pub fn flush_log(&mut self) -> Result<(), GameError> {
        self.log.flush()
    }

    fn play_turn(&mut self, player: &mut dyn Player, learn: bool) {
        let current = self.round.current_player;
        self.emit(GameEvent::TurnStarted {
            player: self.names[current].clone(),
            max_throws: self.round.max_throws,
        });
        for throw in 0..self.round.max_throws {
            self.round.current_throw = throw;
            self.emit(GameEvent::Throw { throw });
            let observation = self.observation();
            let action = if throw == 0 {
                Action::THROW_ALL
            } else {
                player.choose_action(&observation)
            };
            self.emit(GameEvent::ActionChosen {
                player: self.names[current].clone(),
                action,
            });

            let outcome = self.step(action);
            if throw > 0 && learn {
                player.observe_outcome(&Transition {
                    observation,
                    action,
                    next_observation: outcome.observation,
                    reward: outcome.reward,
                    terminal: outcome.terminal,
                    info: outcome.info,
                });
            }
            self.emit(GameEvent::Combinations {
                values: self.combination_values(),
            });

            if action.is_pass() {
                self.emit(GameEvent::Passed {
                    player: self.names[current].clone(),
                });
                // Passing first limits the answering player to the same number of throws.
                if self.round.seat == Seat::First {
                    self.round.max_throws = throw;
                }
                break;
            }
        }
    }

    fn begin_second_seat(&mut self) {
        self.round.current_player = 1 - self.round.current_player;
        self.round.seat = Seat::Second;
        self.round.current_throw = 0;
        self.status = GameStatus::RoundInProgress { seat: Seat::Second };
    }

    fn finish_game(&mut self) -> GameOutcome {
        let scores = self.game.scores;
        let round_cap_reached = self.game.round_number >= self.config.max_rounds;
        self.game.winner_game = if round_cap_reached {
            None
        } else if scores[0] >= scores[1] {
            Some(0)
        } else {
            Some(1)
        };
        self.status = GameStatus::GameOver {
            winner: self.game.winner_game,
        };
        self.emit(GameEvent::GameFinished {
            scores,
            rounds: self.game.round_number,
            round_cap_reached,
            winner_name: self.game.winner_game.map(|w| self.names[w].clone()),
        });

        GameOutcome {
            winner: self.game.winner_game,
            final_scores: scores,
            round_count: self.game.round_number,
            score_history: self.game.score_history.clone(),
        }
    }

    fn emit(&mut self, event: GameEvent) {
        if self.emit_events {
            self.log.record(&event);
        }
    }
}

fn faces(combination: Option<Combination>) -> [u8; DICE_COUNT] {
    combination.map_or([0; DICE_COUNT], |c| c.values())
}
