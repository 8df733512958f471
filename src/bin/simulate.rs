use std::env;
use std::error::Error;
use std::process;

use dice421::{
    ConsoleLog, GameBuilder, LogLevel, NdjsonLog, Player, TeeLog,
    create_agent_from_spec,
};

const DEFAULT_SEED: u64 = 0x0421_D1CE_F00D;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let mut render = false;
    let mut debug = false;
    let mut seed = DEFAULT_SEED;
    let mut log_file: Option<String> = None;
    let mut agent_specs: Vec<String> = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--render" => render = true,
            "--debug" => debug = true,
            "--seed" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--seed requires a value".to_string())?;
                seed = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid seed value: {value}"))?;
            }
            "--log-file" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--log-file requires a path".to_string())?;
                log_file = Some(value);
            }
            "--help" => {
                print_usage();
                return Ok(());
            }
            other => agent_specs.push(other.to_string()),
        }
    }

    if agent_specs.is_empty() {
        agent_specs = vec![String::from("human"), String::from("random")];
    }
    if agent_specs.len() != 2 {
        return Err(format!("expected exactly 2 players, received {}", agent_specs.len()).into());
    }
    let has_human = agent_specs
        .iter()
        .any(|spec| dice421::label_for_spec(spec) == "human");

    let console_level = if debug {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    let mut log = TeeLog::new().with(ConsoleLog::new(console_level));
    if let Some(path) = &log_file {
        log = log.with(NdjsonLog::open_append(path, LogLevel::Debug)?);
    }
    let mut game = GameBuilder::new().with_seed(seed).with_log(log).build()?;

    let mut player_a = create_agent_from_spec(&agent_specs[0], 0, seed)?;
    let mut player_b = create_agent_from_spec(&agent_specs[1], 1, seed)?;

    println!(
        "Starting 421: {} vs {}.\n",
        player_a.name(),
        player_b.name()
    );
    // A human needs to follow the round to make decisions.
    let outcome = game.run(
        &mut player_a,
        &mut player_b,
        render || has_human,
        false,
        false,
    );
    game.flush_log()?;

    println!(
        "\nFinal scores: {} {} - {} {} after {} rounds.",
        player_a.name(),
        outcome.final_scores[0],
        outcome.final_scores[1],
        player_b.name(),
        outcome.round_count
    );
    match outcome.winner {
        Some(0) => println!("Winner: {}.", player_a.name()),
        Some(_) => println!("Winner: {}.", player_b.name()),
        None => println!("Maximum number of rounds reached, no winner."),
    }
    Ok(())
}

fn print_usage() {
    println!("Usage: simulate [OPTIONS] [AGENT AGENT]");
    println!("  --render              Print game events while playing");
    println!("  --debug               Include per-throw detail in console output");
    println!("  --seed <u64>          Seed for dice and first-player draws (default: {DEFAULT_SEED:#x})");
    println!("  --log-file <path>     Append every event as NDJSON to <path>");
    println!("  --help                Show this help message");
    println!("Agent entries (exactly 2):");
    println!("  human[:name]          Interactive player reading masks like 101 from stdin");
    println!("  random[:seed]         Random agent with optional per-agent seed");
    println!("  qlearning[:seed]      Untrained Q-learning agent");
    println!("If no agents are provided, defaults to one human and one random agent.");
}
