//! Snake FSM - Snake driven by a deterministic finite-state game engine
//!
//! This library provides:
//! - Core game rules as a state machine (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Session metrics (metrics module)
//! - Drivers: interactive terminal play and headless script replay (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
