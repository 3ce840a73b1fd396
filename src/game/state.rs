use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Check that both coordinates lie in `[0, board_size - 1]`
    pub fn is_on_board(&self, board_size: usize) -> bool {
        let max = board_size as i32 - 1;
        (0..=max).contains(&self.x) && (0..=max).contains(&self.y)
    }
}

/// The snake, head at index 0 and tail last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Position>,
}

impl Snake {
    pub const MIN_LEN: usize = 2;

    /// Wrap body segments, head first. `None` if shorter than [`Snake::MIN_LEN`].
    pub fn from_segments(body: Vec<Position>) -> Option<Self> {
        (body.len() >= Self::MIN_LEN).then_some(Self { body })
    }

    /// The fixed two-segment layout every game starts from
    pub fn initial() -> Self {
        Self {
            body: vec![Position::new(2, 0), Position::new(1, 0)],
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// The segment right behind the head
    pub fn neck(&self) -> Position {
        self.body[1]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn segments(&self) -> &[Position] {
        &self.body
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Direction from the neck to the head, derived from geometry alone
    pub fn travel_direction(&self) -> Direction {
        let head = self.head();
        let neck = self.neck();
        if head.x != neck.x {
            if head.x > neck.x {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if head.y > neck.y {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    /// Drop the tail and push a new head one cell along `direction`
    pub fn advance(&mut self, direction: Direction) {
        let new_head = self.head().moved_in_direction(direction);
        self.body.pop();
        self.body.insert(0, new_head);
    }

    /// Push `head` in front without removing the tail
    pub fn grow_into(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false for a snake built through this type
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Which events have an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Running,
    GameOver,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::GameOver => "game over",
        }
    }
}

/// Mutable state the engine carries between events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameContext {
    pub score: u32,
    pub board_size: usize,
    pub snake_direction: Direction,
    pub snake: Snake,
    /// `None` until the first drop
    pub food: Option<Position>,
}

impl GameContext {
    /// Context at engine construction and after every restart
    pub fn initial(board_size: usize) -> Self {
        Self {
            score: 0,
            board_size,
            snake_direction: Direction::Right,
            snake: Snake::initial(),
            food: None,
        }
    }

    /// Where the head lands on the next tick
    pub fn next_head(&self) -> Position {
        self.snake.head().moved_in_direction(self.snake_direction)
    }
}

/// Read-only copy of what an observer needs after a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub score: u32,
    pub snake: Vec<Position>,
    pub food: Option<Position>,
    pub snake_direction: Direction,
    pub board_size: usize,
}

impl Snapshot {
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}
