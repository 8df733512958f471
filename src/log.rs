//! Event sinks for the game environment.
//!
//! The environment emits typed [`GameEvent`]s into whatever [`GameLog`] it was
//! built with. Sinks filter by [`LogLevel`] themselves; the environment only
//! decides whether events are emitted at all.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::action::{Action, PlayerId};
use crate::error::GameError;
use crate::reward::RewardBreakdown;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => f.write_str("DEBUG"),
            LogLevel::Info => f.write_str("INFO"),
        }
    }
}

/// Something that happened during a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted {
        players: [String; 2],
    },
    RoundStarted {
        round: u32,
    },
    TurnStarted {
        player: String,
        max_throws: u8,
    },
    Throw {
        throw: u8,
    },
    ActionChosen {
        player: String,
        action: Action,
    },
    NewCombination {
        player: String,
        combination: u16,
        previous: Option<u16>,
    },
    Reward {
        breakdown: RewardBreakdown,
        total: f32,
    },
    Passed {
        player: String,
    },
    Combinations {
        values: [u16; 2],
    },
    RoundResolved {
        scores: [u32; 2],
        winner: Option<PlayerId>,
        winner_name: Option<String>,
    },
    GameFinished {
        scores: [u32; 2],
        rounds: u32,
        round_cap_reached: bool,
        winner_name: Option<String>,
    },
}

impl GameEvent {
    pub fn level(&self) -> LogLevel {
        match self {
            GameEvent::GameStarted { .. }
            | GameEvent::RoundStarted { .. }
            | GameEvent::TurnStarted { .. }
            | GameEvent::Combinations { .. }
            | GameEvent::RoundResolved { .. }
            | GameEvent::GameFinished { .. } => LogLevel::Info,
            GameEvent::Throw { .. }
            | GameEvent::ActionChosen { .. }
            | GameEvent::NewCombination { .. }
            | GameEvent::Reward { .. }
            | GameEvent::Passed { .. } => LogLevel::Debug,
        }
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::GameStarted { players } => {
                write!(f, "Starting the game: {} vs {}", players[0], players[1])
            }
            GameEvent::RoundStarted { round } => write!(f, "Starting round number {round}"),
            GameEvent::TurnStarted { player, max_throws } => {
                write!(f, "Player {player} has {max_throws} throws")
            }
            GameEvent::Throw { throw } => write!(f, "Throw number {}", throw + 1),
            GameEvent::ActionChosen { player, action } => {
                write!(f, "Player {player}'s action: {action}")
            }
            GameEvent::NewCombination {
                player,
                combination,
                previous,
            } => write!(
                f,
                "Player {player}'s new combination: {combination} vs {:03}",
                previous.unwrap_or(0)
            ),
            GameEvent::Reward { breakdown, total } => {
                write!(f, "Reward for action: {total} ({breakdown:?})")
            }
            GameEvent::Passed { player } => write!(f, "Player {player} passed!"),
            GameEvent::Combinations { values } => {
                write!(f, "Combinations are [{}, {}]", values[0], values[1])
            }
            GameEvent::RoundResolved {
                scores,
                winner_name,
                ..
            } => {
                write!(f, "The current scores are [{}, {}]", scores[0], scores[1])?;
                match winner_name {
                    Some(name) => write!(f, "; the winner of the round is {name}"),
                    None => write!(f, "; the round is tied"),
                }
            }
            GameEvent::GameFinished {
                scores,
                rounds,
                round_cap_reached,
                winner_name,
            } => {
                write!(
                    f,
                    "Game finished after {rounds} rounds with scores [{}, {}]",
                    scores[0], scores[1]
                )?;
                if *round_cap_reached {
                    write!(f, "; maximum number of rounds reached")
                } else if let Some(name) = winner_name {
                    write!(f, "; the winner of the game is {name}")
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Destination for game events.
pub trait GameLog {
    fn record(&mut self, event: &GameEvent);

    fn flush(&mut self) -> Result<(), GameError> {
        Ok(())
    }
}

impl<L: GameLog + ?Sized> GameLog for Box<L> {
    fn record(&mut self, event: &GameEvent) {
        (**self).record(event)
    }

    fn flush(&mut self) -> Result<(), GameError> {
        (**self).flush()
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLog;

impl GameLog for NullLog {
    fn record(&mut self, _event: &GameEvent) {}
}

/// Prints events at or above `min_level` to stdout.
#[derive(Clone, Copy, Debug)]
pub struct ConsoleLog {
    min_level: LogLevel,
}

impl ConsoleLog {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl GameLog for ConsoleLog {
    fn record(&mut self, event: &GameEvent) {
        let level = event.level();
        if level >= self.min_level {
            println!("{level} - {event}");
        }
    }
}

/// Keeps events in memory. Handy for inspecting a run afterwards.
#[derive(Clone, Debug, Default)]
pub struct MemoryLog {
    events: Vec<GameEvent>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl GameLog for MemoryLog {
    fn record(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}

#[derive(Serialize)]
struct NdjsonRecord<'a> {
    ts_ms: u64,
    level: LogLevel,
    #[serde(flatten)]
    event: &'a GameEvent,
}

/// Append-only NDJSON file sink: one JSON object per line.
///
/// `record` cannot fail, so the first write error is held back and returned by `flush`.
pub struct NdjsonLog {
    writer: BufWriter<File>,
    min_level: LogLevel,
    pending_error: Option<GameError>,
}

impl NdjsonLog {
    /// Opens `path` for appending, creating it if needed.
    pub fn open_append(path: impl AsRef<Path>, min_level: LogLevel) -> Result<Self, GameError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            min_level,
            pending_error: None,
        })
    }

    fn write_event(&mut self, event: &GameEvent) -> Result<(), GameError> {
        let record = NdjsonRecord {
            ts_ms: now_ms(),
            level: event.level(),
            event,
        };
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        Ok(())
    }
}

impl GameLog for NdjsonLog {
    fn record(&mut self, event: &GameEvent) {
        if event.level() < self.min_level || self.pending_error.is_some() {
            return;
        }
        if let Err(err) = self.write_event(event) {
            self.pending_error = Some(err);
        }
    }

    fn flush(&mut self) -> Result<(), GameError> {
        if let Some(err) = self.pending_error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Forwards every event to each inner sink.
#[derive(Default)]
pub struct TeeLog {
    sinks: Vec<Box<dyn GameLog>>,
}

impl TeeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl GameLog + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl GameLog for TeeLog {
    fn record(&mut self, event: &GameEvent) {
        for sink in &mut self.sinks {
            sink.record(event);
        }
    }

    fn flush(&mut self) -> Result<(), GameError> {
        let mut first_error = None;
        for sink in &mut self.sinks {
            if let Err(err) = sink.flush() {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
