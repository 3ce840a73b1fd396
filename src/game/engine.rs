use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use super::{
    action::{Direction, GameEvent},
    config::GameConfig,
    error::ConfigError,
    state::{GameContext, Phase, Position, Snapshot},
};

/// What a single event did to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The event has no effect in the current phase
    Ignored,
    /// First direction press: food dropped, game running
    Started,
    /// Direction press after a game over: fresh context, game running
    Restarted,
    /// Stored direction replaced
    Turned(Direction),
    /// Reversal onto the neck refused
    TurnRejected(Direction),
    /// Snake advanced one cell
    Moved,
    /// Snake ate the food and grew by one
    Ate,
    /// Next move would leave the board
    HitWall,
}

/// Result of handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Phase before the event
    pub previous: Phase,
    /// Phase after the event
    pub phase: Phase,
    pub outcome: Outcome,
}

impl StepResult {
    pub fn phase_changed(&self) -> bool {
        self.previous != self.phase
    }
}

/// The game state machine
///
/// Owns its phase, context and food RNG. Every event is processed to
/// completion before the next one; the engine never blocks and holds no
/// timers, so the caller decides the tick cadence.
pub struct GameEngine {
    config: GameConfig,
    phase: Phase,
    context: GameContext,
    rng: StdRng,
}

impl GameEngine {
    /// Create an engine in the idle phase with an entropy-seeded RNG
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::build(config, StdRng::from_entropy())
    }

    /// Create an engine whose food drops are reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::build(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: GameConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let context = GameContext::initial(config.board_size);
        Ok(Self {
            config,
            phase: Phase::Idle,
            context,
            rng,
        })
    }

    /// Resume from an explicit phase and context
    ///
    /// # Panics
    ///
    /// If the context was built for a different board size than `config`.
    pub fn from_parts(
        config: GameConfig,
        phase: Phase,
        context: GameContext,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        assert_eq!(
            context.board_size, config.board_size,
            "context board size does not match the engine config"
        );
        let mut engine = Self::with_seed(config, seed)?;
        engine.phase = phase;
        engine.context = context;
        Ok(engine)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn context(&self) -> &GameContext {
        &self.context
    }

    /// Copy of the observable state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.context.score,
            snake: self.context.snake.segments().to_vec(),
            food: self.context.food,
            snake_direction: self.context.snake_direction,
            board_size: self.context.board_size,
        }
    }

    pub fn tick(&mut self) -> StepResult {
        self.handle(GameEvent::Tick)
    }

    pub fn steer(&mut self, direction: Direction) -> StepResult {
        self.handle(GameEvent::Steer(direction))
    }

    /// Feed a browser-style key code. Unrecognized codes are ignored in every phase.
    pub fn keydown(&mut self, code: &str) -> StepResult {
        match Direction::from_key_code(code) {
            Some(direction) => self.steer(direction),
            None => {
                debug!(code, "ignoring unrecognized key code");
                self.unchanged()
            }
        }
    }

    /// Apply one event and move to the next phase
    pub fn handle(&mut self, event: GameEvent) -> StepResult {
        let previous = self.phase;
        let outcome = match (self.phase, event) {
            (Phase::Idle, GameEvent::Tick) | (Phase::GameOver, GameEvent::Tick) => {
                Outcome::Ignored
            }
            (Phase::Idle, GameEvent::Steer(_)) => {
                self.drop_food();
                self.phase = Phase::Running;
                info!(food = ?self.context.food, "game started");
                Outcome::Started
            }
            (Phase::GameOver, GameEvent::Steer(_)) => {
                self.reset_context();
                self.drop_food();
                self.phase = Phase::Running;
                info!(food = ?self.context.food, "game restarted");
                Outcome::Restarted
            }
            (Phase::Running, GameEvent::Steer(direction)) => {
                if self.is_valid_direction(direction) {
                    self.context.snake_direction = direction;
                    Outcome::Turned(direction)
                } else {
                    Outcome::TurnRejected(direction)
                }
            }
            (Phase::Running, GameEvent::Tick) => {
                if self.is_eaten() {
                    self.grow();
                    self.drop_food();
                    Outcome::Ate
                } else if self.is_valid_move() {
                    self.advance();
                    Outcome::Moved
                } else {
                    self.phase = Phase::GameOver;
                    info!(score = self.context.score, "game over");
                    Outcome::HitWall
                }
            }
        };

        debug!(
            ?event,
            from = previous.label(),
            to = self.phase.label(),
            ?outcome,
            "transition"
        );

        StepResult {
            previous,
            phase: self.phase,
            outcome,
        }
    }

    fn unchanged(&self) -> StepResult {
        StepResult {
            previous: self.phase,
            phase: self.phase,
            outcome: Outcome::Ignored,
        }
    }

    /// Refuse only the exact reverse of the travel direction read off the
    /// first two segments, not the stored direction.
    fn is_valid_direction(&self, direction: Direction) -> bool {
        !self
            .context
            .snake
            .travel_direction()
            .is_opposite(direction)
    }

    fn is_valid_move(&self) -> bool {
        self.context.next_head().is_on_board(self.context.board_size)
    }

    fn is_eaten(&self) -> bool {
        self.is_valid_move() && self.context.food == Some(self.context.next_head())
    }

    fn advance(&mut self) {
        let direction = self.context.snake_direction;
        self.context.snake.advance(direction);
    }

    /// Single head insertion on the food cell; the tail stays put.
    fn grow(&mut self) {
        let head = self.context.next_head();
        self.context.score += 1;
        self.context.snake.grow_into(head);
    }

    /// Each coordinate uniform in `[1, board_size - 1]`. Row and column 0 never
    /// get food and the snake's own cells are not avoided.
    fn drop_food(&mut self) {
        let max = self.context.board_size as i32 - 1;
        let food = Position::new(self.rng.gen_range(1..=max), self.rng.gen_range(1..=max));
        debug!(x = food.x, y = food.y, "food dropped");
        self.context.food = Some(food);
    }

    fn reset_context(&mut self) {
        self.context = GameContext::initial(self.config.board_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Snake;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 7).unwrap()
    }

    fn running_with(snake: Vec<Position>, direction: Direction, food: Position) -> GameEngine {
        let context = GameContext {
            score: 0,
            board_size: 10,
            snake_direction: direction,
            snake: Snake::from_segments(snake).unwrap(),
            food: Some(food),
        };
        GameEngine::from_parts(GameConfig::default(), Phase::Running, context, 7).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let engine = engine();
        assert_eq!(engine.phase(), Phase::Idle);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.snake, vec![Position::new(2, 0), Position::new(1, 0)]);
        assert_eq!(snapshot.snake_direction, Direction::Right);
        assert_eq!(snapshot.food, None);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = GameConfig {
            board_size: 2,
            ..Default::default()
        };
        assert!(GameEngine::new(config).is_err());
    }

    #[test]
    fn test_tick_in_idle_is_noop() {
        let mut engine = engine();
        let before = engine.snapshot();

        let result = engine.tick();

        assert_eq!(result.outcome, Outcome::Ignored);
        assert!(!result.phase_changed());
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_first_arrow_starts_and_drops_food() {
        let mut engine = engine();

        let result = engine.keydown("ArrowRight");

        assert_eq!(result.outcome, Outcome::Started);
        assert_eq!(engine.phase(), Phase::Running);
        let food = engine.context().food.unwrap();
        assert!((1..=9).contains(&food.x));
        assert!((1..=9).contains(&food.y));
    }

    #[test]
    fn test_starting_key_does_not_set_direction() {
        let mut engine = engine();
        engine.keydown("ArrowDown");
        assert_eq!(engine.context().snake_direction, Direction::Right);
    }

    #[test]
    fn test_unrecognized_key_is_ignored_everywhere() {
        let mut engine = engine();
        assert_eq!(engine.keydown("Space").outcome, Outcome::Ignored);
        assert_eq!(engine.phase(), Phase::Idle);

        engine.keydown("ArrowRight");
        let before = engine.snapshot();
        assert_eq!(engine.keydown("KeyW").outcome, Outcome::Ignored);
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_reverse_turn_rejected() {
        let mut engine = running_with(
            vec![Position::new(4, 4), Position::new(3, 4)],
            Direction::Right,
            Position::new(8, 8),
        );

        let result = engine.steer(Direction::Left);

        assert_eq!(result.outcome, Outcome::TurnRejected(Direction::Left));
        assert_eq!(engine.context().snake_direction, Direction::Right);
    }

    #[test]
    fn test_turn_accepted() {
        let mut engine = running_with(
            vec![Position::new(4, 4), Position::new(3, 4)],
            Direction::Right,
            Position::new(8, 8),
        );

        assert_eq!(engine.steer(Direction::Up).outcome, Outcome::Turned(Direction::Up));
        engine.tick();
        assert_eq!(engine.context().snake.head(), Position::new(4, 3));
    }

    #[test]
    fn test_turn_validity_uses_geometry_not_stored_direction() {
        let mut engine = running_with(
            vec![Position::new(4, 4), Position::new(3, 4)],
            Direction::Right,
            Position::new(8, 8),
        );

        // Stored direction becomes Up, but the snake still travels Right
        // until the next tick, so Left stays blocked and Down is allowed.
        engine.steer(Direction::Up);
        assert_eq!(
            engine.steer(Direction::Left).outcome,
            Outcome::TurnRejected(Direction::Left)
        );
        assert_eq!(engine.steer(Direction::Down).outcome, Outcome::Turned(Direction::Down));
        assert_eq!(engine.context().snake_direction, Direction::Down);
    }

    #[test]
    fn test_advance_moves_head_and_tail() {
        let mut engine = running_with(
            vec![Position::new(4, 4), Position::new(3, 4)],
            Direction::Right,
            Position::new(8, 8),
        );

        let result = engine.tick();

        assert_eq!(result.outcome, Outcome::Moved);
        assert_eq!(
            engine.context().snake.segments(),
            &[Position::new(5, 4), Position::new(4, 4)]
        );
        assert_eq!(engine.context().score, 0);
    }

    #[test]
    fn test_eating_grows_by_one_and_scores() {
        let mut engine = running_with(
            vec![Position::new(4, 4), Position::new(3, 4)],
            Direction::Right,
            Position::new(5, 4),
        );

        let result = engine.tick();

        assert_eq!(result.outcome, Outcome::Ate);
        let ctx = engine.context();
        assert_eq!(ctx.score, 1);
        assert_eq!(
            ctx.snake.segments(),
            &[Position::new(5, 4), Position::new(4, 4), Position::new(3, 4)]
        );
        let food = ctx.food.unwrap();
        assert!((1..=9).contains(&food.x) && (1..=9).contains(&food.y));
    }

    #[test]
    fn test_wall_ends_game() {
        let mut engine = running_with(
            vec![Position::new(9, 4), Position::new(8, 4)],
            Direction::Right,
            Position::new(2, 2),
        );
        let before = engine.context().clone();

        let result = engine.tick();

        assert_eq!(result.outcome, Outcome::HitWall);
        assert!(result.phase_changed());
        assert_eq!(engine.phase(), Phase::GameOver);
        assert_eq!(engine.context(), &before);
    }

    #[test]
    fn test_each_wall_blocks() {
        let cases = [
            (vec![Position::new(0, 5), Position::new(1, 5)], Direction::Left),
            (vec![Position::new(5, 0), Position::new(5, 1)], Direction::Up),
            (vec![Position::new(5, 9), Position::new(5, 8)], Direction::Down),
        ];
        for (snake, direction) in cases {
            let mut engine = running_with(snake, direction, Position::new(3, 3));
            assert_eq!(engine.tick().outcome, Outcome::HitWall);
        }
    }

    #[test]
    fn test_food_beyond_wall_is_not_eaten() {
        // Food off the board can only come from an injected context, but the
        // wall check still wins over the eat check.
        let mut engine = running_with(
            vec![Position::new(9, 4), Position::new(8, 4)],
            Direction::Right,
            Position::new(10, 4),
        );
        assert_eq!(engine.tick().outcome, Outcome::HitWall);
        assert_eq!(engine.context().score, 0);
    }

    #[test]
    fn test_game_over_ignores_ticks_and_restarts_on_arrow() {
        let mut engine = running_with(
            vec![Position::new(7, 9), Position::new(6, 9)],
            Direction::Down,
            Position::new(2, 2),
        );
        engine.tick();
        assert_eq!(engine.phase(), Phase::GameOver);

        assert_eq!(engine.tick().outcome, Outcome::Ignored);
        assert_eq!(engine.phase(), Phase::GameOver);

        let result = engine.keydown("ArrowUp");
        assert_eq!(result.outcome, Outcome::Restarted);
        assert_eq!(engine.phase(), Phase::Running);

        let ctx = engine.context();
        assert_eq!(ctx.score, 0);
        assert_eq!(ctx.snake, Snake::initial());
        assert_eq!(ctx.snake_direction, Direction::Right);
        assert!(ctx.food.is_some());
    }

    #[test]
    fn test_seeded_engines_drop_identical_food() {
        let mut a = GameEngine::with_seed(GameConfig::default(), 99).unwrap();
        let mut b = GameEngine::with_seed(GameConfig::default(), 99).unwrap();
        a.keydown("ArrowRight");
        b.keydown("ArrowRight");
        assert_eq!(a.context().food, b.context().food);
    }

    #[test]
    #[should_panic(expected = "board size")]
    fn test_from_parts_rejects_mismatched_board() {
        let context = GameContext::initial(12);
        let _ = GameEngine::from_parts(GameConfig::default(), Phase::Running, context, 0);
    }
}
