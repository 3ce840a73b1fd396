//! Core game logic module for Snake
//!
//! A finite-state machine (idle, running, game over) with no I/O, timers or
//! rendering. Drivers feed it ticks and direction presses and read back a
//! [`Snapshot`] after each transition.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, GameEvent};
pub use config::{GameConfig, TickRate};
pub use engine::{GameEngine, Outcome, StepResult};
pub use error::ConfigError;
pub use state::{GameContext, Phase, Position, Snake, Snapshot};
