use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::{ArgAction, Parser};
use plotters::prelude::*;

use dice421::{GameConfig, GameEnvironment, MatchSummary, evaluate};
use dice421::{create_agent_from_spec, label_for_spec};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0x0421_C0FF_EE00;

#[derive(Parser, Debug)]
#[command(
    name = "winrate",
    about = "Play a head-to-head series between two agents and plot their win rates."
)]
struct Args {
    /// Number of games to simulate
    #[arg(short = 'g', long = "games", default_value_t = 1_000)]
    games: usize,

    /// Base RNG seed (dice and agent RNGs are derived deterministically)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Output chart file (png)
    #[arg(short = 'o', long = "out", default_value = "winrates.png")]
    out: PathBuf,

    /// Show a textual summary only (no chart)
    #[arg(long = "no-chart", action = ArgAction::SetTrue)]
    no_chart: bool,

    /// Decided rounds after which a game stops without a winner
    #[arg(long = "max-rounds", default_value_t = dice421::game::DEFAULT_MAX_ROUNDS)]
    max_rounds: u32,

    /// Agent specs, exactly two: e.g. random qlearning
    agents: Vec<String>,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.agents.len() != 2 {
        return Err(format!(
            "expected exactly 2 agent specs, received {}",
            args.agents.len()
        )
        .into());
    }
    // Batch runs would block waiting for input.
    if args.agents.iter().any(|s| label_for_spec(s) == "human") {
        return Err("human players are not supported in winrate runs".into());
    }

    let config = GameConfig {
        max_rounds: args.max_rounds,
        ..GameConfig::seeded(args.seed)
    };
    let mut env = GameEnvironment::new(config)?;
    let mut first = create_agent_from_spec(&args.agents[0], 0, args.seed)?;
    let mut second = create_agent_from_spec(&args.agents[1], 1, args.seed)?;
    let labels = [
        format!("{} ({})", label_for_spec(&args.agents[0]), first.name()),
        format!("{} ({})", label_for_spec(&args.agents[1]), second.name()),
    ];

    let started = Instant::now();
    let summary = evaluate(&mut env, &mut first, &mut second, args.games);
    let elapsed = started.elapsed();

    print_summary(&summary, &labels);
    println!(
        "\nSimulated {} games in {:.3} s ({:.3} ms/game).",
        summary.games,
        elapsed.as_secs_f64(),
        elapsed.as_secs_f64() * 1.0e3 / summary.games.max(1) as f64
    );

    if !args.no_chart {
        let data = [
            (labels[0].clone(), summary.win_rate(0)),
            (labels[1].clone(), summary.win_rate(1)),
        ];
        render_bar_chart(&args.out, &data)?;
        println!("\nChart written to {}", args.out.display());
    }

    Ok(())
}

fn print_summary(summary: &MatchSummary, labels: &[String; 2]) {
    println!("Win rates over {} games (seats alternate):", summary.games);
    for (agent, label) in labels.iter().enumerate() {
        println!(
            "  {label:<28}  {}/{}  ({:.2}%)",
            summary.wins[agent],
            summary.games,
            summary.win_rate(agent) * 100.0
        );
    }
    if summary.undecided > 0 {
        println!(
            "\nNote: {} game(s) hit the round cap without a winner.",
            summary.undecided
        );
    }
    println!("Average decided rounds per game: {:.2}", summary.mean_rounds());
}

fn render_bar_chart(out: &PathBuf, data: &[(String, f64)]) -> Result<(), Box<dyn Error>> {
    let labels: Vec<String> = data.iter().map(|(l, _)| l.clone()).collect();
    let values: Vec<f64> = data.iter().map(|(_, r)| r * 100.0).collect();

    let root = BitMapBackend::new(out, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| format!("{e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("421 Agent Win Rates", ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..labels.len(), 0.0f64..100.0)
        .map_err(|e| format!("{e}"))?;

    chart
        .configure_mesh()
        .y_desc("Win rate (%)")
        .x_desc("Agent")
        .x_labels(labels.len())
        .x_label_formatter(&|idx| labels.get(*idx).cloned().unwrap_or_default())
        .y_label_formatter(&|v| format!("{v:.0}"))
        .light_line_style(&WHITE.mix(0.0))
        .draw()
        .map_err(|e| format!("{e}"))?;

    chart
        .draw_series(
            values
                .iter()
                .enumerate()
                .map(|(i, value)| Rectangle::new([(i, 0.0), (i + 1, *value)], BLUE.filled())),
        )
        .map_err(|e| format!("{e}"))?;

    root.present().map_err(|e| format!("{e}"))?;
    Ok(())
}
