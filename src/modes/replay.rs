//! Headless driver: scripted events in, JSON snapshots out
//!
//! A script is a sequence of whitespace separated tokens. `tick` sends one
//! tick, `tick*N` sends N, anything else is handed to the engine as a key
//! code (`ArrowUp`, ...), so unknown codes exercise the ignore path. `#`
//! starts a comment that runs to the end of the line.
//!
//! ```text
//! ArrowRight      # start
//! tick*3
//! ArrowDown tick
//! ```

use anyhow::{Context, Result};
use core::fmt;
use serde::Serialize;
use std::io::{BufRead, Read, Write};
use tracing::{debug, info};

use crate::game::{GameEngine, Outcome, Phase, Snapshot};

/// Malformed replay script
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptError {
    BadRepeat { line: usize, token: String },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRepeat { line, token } => {
                write!(f, "line {line}: `{token}` needs a positive repeat count")
            }
        }
    }
}

impl std::error::Error for ScriptError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEvent {
    Tick,
    Key(String),
}

impl fmt::Display for ScriptEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tick => f.write_str("tick"),
            Self::Key(code) => f.write_str(code),
        }
    }
}

/// Expand a script into individual events, `tick*N` unrolled
pub fn parse_script(source: &str) -> Result<Vec<ScriptEvent>, ScriptError> {
    let mut events = Vec::new();

    for (index, raw_line) in source.lines().enumerate() {
        let line = raw_line.split('#').next().unwrap_or_default();

        for token in line.split_whitespace() {
            match token.split_once('*') {
                Some(("tick", count)) => {
                    let count: usize = count
                        .parse()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| ScriptError::BadRepeat {
                            line: index + 1,
                            token: token.to_string(),
                        })?;
                    events.extend(std::iter::repeat_n(ScriptEvent::Tick, count));
                }
                _ if token == "tick" => events.push(ScriptEvent::Tick),
                _ => events.push(ScriptEvent::Key(token.to_string())),
            }
        }
    }

    Ok(events)
}

/// One output line
#[derive(Debug, Serialize)]
struct ReplayRecord<'a> {
    step: usize,
    event: &'a str,
    outcome: Outcome,
    snapshot: Snapshot,
}

/// Totals after a replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub games_finished: u32,
    pub final_phase: Phase,
    pub final_score: u32,
}

pub struct ReplayMode {
    engine: GameEngine,
}

impl ReplayMode {
    pub fn new(engine: GameEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Read a whole script from `input` and write one JSON line per event to `out`
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> Result<ReplaySummary> {
        let mut source = String::new();
        input
            .read_to_string(&mut source)
            .context("Failed to read replay script")?;
        let events = parse_script(&source).context("Failed to parse replay script")?;
        info!(events = events.len(), "replaying script");

        let mut games_finished = 0;
        for (step, event) in events.iter().enumerate() {
            let result = match event {
                ScriptEvent::Tick => self.engine.tick(),
                ScriptEvent::Key(code) => self.engine.keydown(code),
            };
            if result.outcome == Outcome::HitWall {
                games_finished += 1;
            }

            let label = event.to_string();
            let record = ReplayRecord {
                step,
                event: &label,
                outcome: result.outcome,
                snapshot: self.engine.snapshot(),
            };
            serde_json::to_writer(&mut out, &record).context("Failed to encode snapshot")?;
            writeln!(out).context("Failed to write snapshot")?;
            debug!(step, event = %event, "replayed");
        }
        out.flush().context("Failed to flush output")?;

        let summary = ReplaySummary {
            events: events.len(),
            games_finished,
            final_phase: self.engine.phase(),
            final_score: self.engine.context().score,
        };
        info!(?summary, "replay finished");
        Ok(summary)
    }
}
