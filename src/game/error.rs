use core::fmt;

/// Rejected game configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    BoardTooSmall { size: usize, min: usize },
    BoardTooLarge { size: usize, max: usize },
    TickOutOfRange { millis: u64, min: u64, max: u64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoardTooSmall { size, min } => {
                write!(f, "board size {size} is too small (minimum {min})")
            }
            Self::BoardTooLarge { size, max } => {
                write!(f, "board size {size} is too large (maximum {max})")
            }
            Self::TickOutOfRange { millis, min, max } => {
                write!(f, "tick interval {millis}ms must be in [{min}..={max}]")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
