use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser};
use plotters::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use dice421::{
    ConsoleLog, GameBuilder, LogLevel, Player, QLearningAgent, QLearningConfig, TrainingConfig,
    TrainingReport, create_agent_from_spec, evaluate, train,
};

/// Default master seed for deterministic runs.
const DEFAULT_SEED: u64 = 0x0421_5EED_D1CE;

#[derive(Parser, Debug)]
#[command(
    name = "train",
    about = "Train a tabular Q-learning agent at 421 against a fixed opponent",
    version
)]
struct TrainArgs {
    /// Number of training games.
    #[arg(short = 'e', long, default_value_t = 20_000)]
    episodes: usize,
    /// Opponent spec (random[:seed] or qlearning[:seed]); it never learns.
    #[arg(long, default_value = "random")]
    opponent: String,
    /// Step size of the Q update.
    #[arg(long, default_value_t = 0.01)]
    learning_rate: f32,
    /// Exploration probability at the first episode.
    #[arg(long, default_value_t = 1.0)]
    initial_epsilon: f32,
    /// Exploration floor, reached halfway through training.
    #[arg(long, default_value_t = 0.1)]
    final_epsilon: f32,
    /// Discount applied to the bootstrapped next-state value.
    #[arg(long, default_value_t = 0.95)]
    discount: f32,
    /// Greedy games played against the opponent after training.
    #[arg(long, default_value_t = 1_000)]
    eval_games: usize,
    /// Trailing window used for the win-rate summary and chart.
    #[arg(long, default_value_t = 500)]
    window: usize,
    /// Master seed (dice and agent RNGs are derived from it).
    #[arg(short = 's', long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Output chart file (png).
    #[arg(short = 'o', long = "out", default_value = "training.png")]
    out: PathBuf,
    /// Show a textual summary only (no chart).
    #[arg(long = "no-chart", action = ArgAction::SetTrue)]
    no_chart: bool,
    /// Print every game event while training (very verbose).
    #[arg(long, action = ArgAction::SetTrue)]
    render: bool,
}

fn main() {
    let args = TrainArgs::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: TrainArgs) -> Result<(), Box<dyn Error>> {
    validate_args(&args)?;

    let mut env = GameBuilder::new()
        .with_seed(args.seed)
        .with_log(ConsoleLog::new(LogLevel::Info))
        .build()?;
    let config = QLearningConfig {
        learning_rate: args.learning_rate,
        initial_epsilon: args.initial_epsilon,
        final_epsilon: args.final_epsilon,
        discount_factor: args.discount,
        ..QLearningConfig::default()
    }
    .with_schedule(args.episodes);
    let mut learner = QLearningAgent::named(
        "Learner",
        config,
        StdRng::seed_from_u64(args.seed ^ 0x9E37_79B9),
    );
    let mut opponent = create_agent_from_spec(&args.opponent, 1, args.seed)?;

    println!(
        "Training {} against {} for {} episodes...",
        learner.name(),
        opponent.name(),
        args.episodes
    );
    let report = train(
        &mut env,
        &mut learner,
        &mut opponent,
        TrainingConfig {
            episodes: args.episodes,
            render: args.render,
        },
    );
    print_summary(&report, args.window, learner.q_values().len());

    if args.eval_games > 0 {
        learner.set_epsilon(0.0);
        let summary = evaluate(&mut env, &mut learner, &mut opponent, args.eval_games);
        println!(
            "\nGreedy evaluation over {} games: learner {:.2}%  opponent {:.2}%  undecided {}  (avg rounds {:.1})",
            summary.games,
            summary.win_rate(0) * 100.0,
            summary.win_rate(1) * 100.0,
            summary.undecided,
            summary.mean_rounds()
        );
    }

    if !args.no_chart {
        render_win_rate_chart(&args.out, &report.rolling_win_rate(args.window), args.window)?;
        println!("\nChart written to {}", args.out.display());
    }

    env.flush_log()?;
    Ok(())
}

fn validate_args(args: &TrainArgs) -> Result<(), Box<dyn Error>> {
    if args.episodes == 0 {
        return Err("episodes must be positive".into());
    }
    if args.learning_rate <= 0.0 {
        return Err("learning rate must be positive".into());
    }
    if !(0.0..=1.0).contains(&args.initial_epsilon) || !(0.0..=1.0).contains(&args.final_epsilon) {
        return Err("epsilon values must be between 0 and 1".into());
    }
    if args.final_epsilon > args.initial_epsilon {
        return Err("final epsilon cannot exceed initial epsilon".into());
    }
    if !(0.0..=1.0).contains(&args.discount) {
        return Err("discount must be between 0 and 1".into());
    }
    if args.window == 0 {
        return Err("window must be positive".into());
    }
    if dice421::label_for_spec(&args.opponent) == "human" {
        return Err("human opponents are not supported while training".into());
    }
    Ok(())
}

fn print_summary(report: &TrainingReport, window: usize, states: usize) {
    let total = report.episodes.len();
    println!("\nTraining results over {total} games:");
    println!(
        "  learner wins: {}  opponent wins: {}  undecided: {}",
        report.learner_wins(),
        report.opponent_wins(),
        report.undecided()
    );
    if let Some(last) = report.rolling_win_rate(window).last() {
        println!("  win rate over the last {window} games: {:.2}%", last * 100.0);
    }
    let updates: usize = report.episodes.iter().map(|e| e.updates).sum();
    println!("  Q updates: {updates}  distinct states: {states}");
    if let Some(last) = report.episodes.last() {
        println!(
            "  final epsilon: {:.3}  last mean TD error: {:.4}",
            last.epsilon, last.mean_td_error
        );
    }
}

fn render_win_rate_chart(out: &Path, rates: &[f64], window: usize) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(out, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| format!("{e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("421 Q-learning win rate (rolling {window} games)"),
            ("sans-serif", 28).into_font(),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..rates.len().max(1), 0.0f64..100.0)
        .map_err(|e| format!("{e}"))?;

    chart
        .configure_mesh()
        .y_desc("Win rate (%)")
        .x_desc("Episode")
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()
        .map_err(|e| format!("{e}"))?;

    chart
        .draw_series(LineSeries::new(
            rates.iter().enumerate().map(|(idx, rate)| (idx, rate * 100.0)),
            &BLUE,
        ))
        .map_err(|e| format!("{e}"))?;
    chart
        .draw_series(LineSeries::new(
            [(0, 50.0), (rates.len().max(1), 50.0)],
            &RED.mix(0.4),
        ))
        .map_err(|e| format!("{e}"))?;

    root.present().map_err(|e| format!("{e}"))?;
    Ok(())
}
