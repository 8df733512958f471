use rand::SeedableRng;
use rand::rngs::StdRng;

use dice421::{
    GameBuilder, GameError, QLearningAgent, QLearningConfig, RandomAgent, TrainingConfig, evaluate,
    train,
};

#[test]
fn training_records_every_episode_and_decays_epsilon() -> Result<(), GameError> {
    let mut env = GameBuilder::new().with_seed(17).build()?;
    let config = QLearningConfig::default().with_schedule(20);
    let mut learner = QLearningAgent::named("Learner", config, StdRng::seed_from_u64(1));
    let mut opponent = RandomAgent::new(StdRng::seed_from_u64(2));

    let report = train(
        &mut env,
        &mut learner,
        &mut opponent,
        TrainingConfig {
            episodes: 20,
            render: false,
        },
    );

    assert_eq!(report.episodes.len(), 20);
    assert_eq!(
        report.learner_wins() + report.opponent_wins() + report.undecided(),
        20
    );
    assert!(learner.epsilon() < config.initial_epsilon);
    assert!(learner.epsilon() >= config.final_epsilon);
    for pair in report.episodes.windows(2) {
        assert!(pair[1].epsilon <= pair[0].epsilon);
    }

    let updates: usize = report.episodes.iter().map(|e| e.updates).sum();
    assert_eq!(updates, learner.training_error().len());
    assert!(!learner.q_values().is_empty());
    Ok(())
}

#[test]
fn evaluation_alternates_seats() -> Result<(), GameError> {
    let mut env = GameBuilder::new().with_seed(99).build()?;
    let mut first = RandomAgent::named("First", StdRng::seed_from_u64(4));
    let mut second = RandomAgent::named("Second", StdRng::seed_from_u64(5));

    let summary = evaluate(&mut env, &mut first, &mut second, 10);
    assert_eq!(summary.games, 10);
    assert_eq!(summary.wins[0] + summary.wins[1] + summary.undecided, 10);
    assert!(summary.mean_rounds() >= 1.0);
    Ok(())
}
