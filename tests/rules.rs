use rand::SeedableRng;
use rand::rngs::StdRng;

use dice421::action::Action;
use dice421::game::DEFAULT_WINNING_GAP;
use dice421::{
    GameBuilder, GameConfig, GameEnvironment, GameError, GameStatus, Observation, Player,
    RandomAgent, Transition,
};

fn random_pair(seed: u64) -> (RandomAgent<StdRng>, RandomAgent<StdRng>) {
    (
        RandomAgent::named("Alice", StdRng::seed_from_u64(seed)),
        RandomAgent::named("Bob", StdRng::seed_from_u64(seed + 1)),
    )
}

struct Recorder {
    inner: RandomAgent<StdRng>,
    transitions: Vec<Transition>,
    resets: usize,
}

impl Recorder {
    fn new(seed: u64) -> Self {
        Self {
            inner: RandomAgent::named("Recorder", StdRng::seed_from_u64(seed)),
            transitions: Vec::new(),
            resets: 0,
        }
    }
}

impl Player for Recorder {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn choose_action(&mut self, observation: &Observation) -> Action {
        self.inner.choose_action(observation)
    }

    fn observe_outcome(&mut self, transition: &Transition) {
        self.transitions.push(*transition);
    }

    fn reset_episode(&mut self) {
        self.resets += 1;
    }
}

#[test]
fn seeded_games_are_reproducible() -> Result<(), GameError> {
    let mut first_env = GameEnvironment::new(GameConfig::seeded(7))?;
    let mut second_env = GameEnvironment::new(GameConfig::seeded(7))?;

    let (mut a1, mut b1) = random_pair(11);
    let (mut a2, mut b2) = random_pair(11);
    let first = first_env.run(&mut a1, &mut b1, false, false, false);
    let second = second_env.run(&mut a2, &mut b2, false, false, false);

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn outcome_history_is_consistent() -> Result<(), GameError> {
    let mut env = GameBuilder::new().with_seed(3).build()?;
    for game in 0..20 {
        let (mut a, mut b) = random_pair(100 + game);
        let outcome = env.run(&mut a, &mut b, false, false, false);

        assert_eq!(outcome.score_history.first(), Some(&(0, 0)));
        let last = outcome.score_history.last().copied();
        assert_eq!(last, Some((outcome.final_scores[0], outcome.final_scores[1])));
        assert!(matches!(env.status(), GameStatus::GameOver { .. }));

        // Scores never decrease from one round to the next.
        for pair in outcome.score_history.windows(2) {
            assert!(pair[1].0 >= pair[0].0);
            assert!(pair[1].1 >= pair[0].1);
        }

        match outcome.winner {
            Some(winner) => {
                let [own, other] = if winner == 0 {
                    outcome.final_scores
                } else {
                    [outcome.final_scores[1], outcome.final_scores[0]]
                };
                assert!(own >= other + DEFAULT_WINNING_GAP);
            }
            None => assert_eq!(outcome.round_count, env.config().max_rounds),
        }
    }
    Ok(())
}

#[test]
fn round_cap_ends_without_winner() -> Result<(), GameError> {
    let mut env = GameBuilder::new()
        .with_seed(5)
        .with_max_rounds(3)
        .with_winning_gap(1_000)
        .build()?;
    let (mut a, mut b) = random_pair(9);
    let outcome = env.run(&mut a, &mut b, false, false, false);

    assert_eq!(outcome.winner, None);
    assert_eq!(outcome.round_count, 3);
    assert_eq!(env.winner(), None);
    Ok(())
}

#[test]
fn environment_can_be_reused_across_games() -> Result<(), GameError> {
    let mut env = GameBuilder::new().with_seed(21).build()?;
    let (mut a, mut b) = random_pair(1);
    env.run(&mut a, &mut b, false, false, false);
    let outcome = env.run(&mut a, &mut b, false, false, false);

    assert_eq!(outcome.score_history[0], (0, 0));
    assert!(outcome.round_count >= 1);
    Ok(())
}

#[test]
fn render_supports_console_only() -> Result<(), GameError> {
    let env = GameBuilder::new().with_seed(1).build()?;
    let text = env.render("console")?;
    assert!(text.starts_with("Round 0"));
    assert!(text.contains("Score: [0, 0]"));

    match env.render("human") {
        Err(GameError::UnsupportedMode(mode)) => assert_eq!(mode, "human"),
        other => panic!("expected unsupported mode, got {other:?}"),
    }
    Ok(())
}

#[test]
fn persistence_is_not_implemented_by_default() {
    let mut agent = RandomAgent::new(StdRng::seed_from_u64(0));
    assert!(matches!(
        agent.save_model("model.json"),
        Err(GameError::NotImplemented { .. })
    ));
    assert!(matches!(
        agent.load_model("model.json"),
        Err(GameError::NotImplemented { .. })
    ));
}

#[test]
fn invalid_configuration_is_rejected() {
    assert!(matches!(
        GameBuilder::new().with_max_throws(0).build(),
        Err(GameError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        GameBuilder::new().with_winning_gap(0).build(),
        Err(GameError::InvalidConfiguration(_))
    ));
}

#[test]
fn learning_flags_are_per_player() -> Result<(), GameError> {
    let mut env = GameBuilder::new().with_seed(42).build()?;
    let mut learner = Recorder::new(1);
    let mut watcher = Recorder::new(2);
    let outcome = env.run(&mut learner, &mut watcher, false, true, false);

    assert_eq!(learner.resets, 1);
    assert_eq!(watcher.resets, 1);
    assert!(watcher.transitions.is_empty());
    assert!(outcome.round_count >= 1);
    for transition in &learner.transitions {
        assert!(transition.observation.current_throws >= 1);
        assert_eq!(
            transition.next_observation.current_throws,
            transition.observation.current_throws
        );
    }
    Ok(())
}
