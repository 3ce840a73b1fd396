use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::ConfigError;

/// Side length of the square board
pub const DEFAULT_BOARD_SIZE: usize = 10;
/// The initial snake sits on row 0 with its head at x = 2
pub const MIN_BOARD_SIZE: usize = 4;
pub const MAX_BOARD_SIZE: usize = 64;

/// Interval between ticks, in milliseconds
///
/// Owned by the driver, never by the engine. Adjusted linearly in
/// [`TickRate::STEP_MS`] increments and always kept in
/// `[TickRate::MIN_MS, TickRate::MAX_MS]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct TickRate(u64);

impl TickRate {
    pub const MIN_MS: u64 = 100;
    pub const MAX_MS: u64 = 1000;
    pub const DEFAULT_MS: u64 = 400;
    pub const STEP_MS: u64 = 50;

    pub fn new(millis: u64) -> Result<Self, ConfigError> {
        if !(Self::MIN_MS..=Self::MAX_MS).contains(&millis) {
            return Err(ConfigError::TickOutOfRange {
                millis,
                min: Self::MIN_MS,
                max: Self::MAX_MS,
            });
        }
        Ok(Self(millis))
    }

    pub fn millis(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// Shorter interval, clamped at the minimum
    pub fn faster(&self) -> Self {
        Self(self.0.saturating_sub(Self::STEP_MS).max(Self::MIN_MS))
    }

    /// Longer interval, clamped at the maximum
    pub fn slower(&self) -> Self {
        Self((self.0 + Self::STEP_MS).min(Self::MAX_MS))
    }
}

impl Default for TickRate {
    fn default() -> Self {
        Self(Self::DEFAULT_MS)
    }
}

impl TryFrom<u64> for TickRate {
    type Error = ConfigError;

    fn try_from(millis: u64) -> Result<Self, Self::Error> {
        Self::new(millis)
    }
}

impl From<TickRate> for u64 {
    fn from(rate: TickRate) -> Self {
        rate.0
    }
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width and height of the square board
    pub board_size: usize,
    /// Starting tick interval for drivers
    #[serde(default)]
    pub tick_rate: TickRate,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            tick_rate: TickRate::default(),
        }
    }
}

impl GameConfig {
    /// Default board with a custom tick interval
    pub fn with_tick_rate(tick_rate: TickRate) -> Self {
        Self {
            tick_rate,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(ConfigError::BoardTooSmall {
                size: self.board_size,
                min: MIN_BOARD_SIZE,
            });
        }
        if self.board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardTooLarge {
                size: self.board_size,
                max: MAX_BOARD_SIZE,
            });
        }
        Ok(())
    }
}
