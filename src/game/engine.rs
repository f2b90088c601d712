use super::{
    action::Direction,
    config::GameConfig,
    progression::Progression,
    state::{CollisionType, Phase, Position, SessionState, Snake},
};
use rand::Rng;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
    /// Whether this tick crossed a level threshold
    pub leveled_up: bool,
    /// Whether the session is (now) terminated
    pub terminated: bool,
}

impl TickOutcome {
    fn idle(terminated: bool) -> Self {
        Self {
            ate_food: false,
            collision: None,
            leveled_up: false,
            terminated,
        }
    }

    fn fatal(collision: CollisionType) -> Self {
        Self {
            ate_food: false,
            collision: Some(collision),
            leveled_up: false,
            terminated: true,
        }
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: rand::rngs::ThreadRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: rand::thread_rng(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a session from loaded (or fresh) progression
    ///
    /// The snake begins as a single idle cell at the board center; food is
    /// placed at a random unoccupied cell.
    pub fn new_session(&mut self, progression: Progression) -> SessionState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(Position::new(center_x, center_y));
        let food = self.spawn_food_avoiding(&snake);
        let tick_rate = self.config.tick_rate_for_level(progression.level);

        SessionState::new(
            snake,
            food,
            progression,
            tick_rate,
            self.config.grid_width,
            self.config.grid_height,
        )
    }

    /// Execute one tick
    ///
    /// A steer that would invert the current heading is ignored; the first
    /// steer of a session is always accepted. Does nothing unless the session
    /// is running and the snake has a heading.
    pub fn tick(&mut self, state: &mut SessionState, steer: Option<Direction>) -> TickOutcome {
        if state.phase != Phase::Running {
            return TickOutcome::idle(state.phase == Phase::Terminated);
        }

        if let Some(direction) = steer {
            match state.snake.heading {
                Some(current) if current.is_opposite(direction) => {}
                _ => state.snake.heading = Some(direction),
            }
        }

        let Some(heading) = state.snake.heading else {
            // Not moving yet
            return TickOutcome::idle(false);
        };

        let new_head = state.snake.head().moved_in_direction(heading);

        // Wall collision leaves the state untouched apart from the phase
        if !state.is_in_bounds(new_head) {
            state.phase = Phase::Terminated;
            return TickOutcome::fatal(CollisionType::Wall);
        }

        let ate_food = new_head == state.food;

        // Advance before the self check so the tail cell vacated this tick
        // counts as free
        state.snake.advance_to(new_head, ate_food);

        if state.snake.collides_with_body(new_head) {
            state.phase = Phase::Terminated;
            return TickOutcome::fatal(CollisionType::SelfCollision);
        }

        let mut leveled_up = false;

        if ate_food {
            leveled_up = state.progression.advance(&self.config);
            if leveled_up {
                state.tick_rate = self.config.tick_rate_for_level(state.progression.level);
            }
            state.food = self.spawn_food_avoiding(&state.snake);
        }

        TickOutcome {
            ate_food,
            collision: None,
            leveled_up,
            terminated: false,
        }
    }

    /// Spawn food at a random cell not occupied by the snake
    fn spawn_food_avoiding(&mut self, snake: &Snake) -> Position {
        loop {
            let x = self.rng.gen_range(0..self.config.grid_width) as i32;
            let y = self.rng.gen_range(0..self.config.grid_height) as i32;
            let pos = Position::new(x, y);

            if !snake.body.contains(&pos) {
                return pos;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_session(engine: &mut GameEngine) -> SessionState {
        engine.new_session(Progression::new())
    }

    /// Place food somewhere the snake will not reach during a short test
    fn park_food(state: &mut SessionState, pos: Position) {
        assert!(!state.snake.body.contains(&pos));
        state.food = pos;
    }

    #[test]
    fn test_new_session() {
        let mut engine = GameEngine::new(GameConfig::small());
        let state = running_session(&mut engine);

        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position::new(5, 5));
        assert_eq!(state.snake.heading, None);
        assert_ne!(state.food, state.snake.head());
        assert_eq!(state.tick_rate, 12); // base 10 + 2 * level 1
    }

    #[test]
    fn test_session_on_degenerate_grid_size() {
        // Zero dimensions clamp to the minimal board instead of making food
        // placement sample an empty range
        let mut engine = GameEngine::new(GameConfig::new(0, 0));
        let state = engine.new_session(Progression::new());

        assert_eq!((state.grid_width, state.grid_height), (2, 2));
        assert_ne!(state.food, state.snake.head());
        assert!(state.is_in_bounds(state.food));
    }

    #[test]
    fn test_idle_until_first_steer() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = running_session(&mut engine);

        let outcome = engine.tick(&mut state, None);

        assert!(!outcome.terminated);
        assert_eq!(state.snake.head(), Position::new(5, 5));
        assert_eq!(state.phase, Phase::Running);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = running_session(&mut engine);
        park_food(&mut state, Position::new(0, 0));

        let outcome = engine.tick(&mut state, Some(Direction::Right));

        assert!(!outcome.terminated);
        assert!(!outcome.ate_food);
        assert_eq!(state.snake.head(), Position::new(6, 5));
        assert_eq!(state.snake.len(), 1);
    }

    #[test]
    fn test_steer_persists_across_ticks() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = running_session(&mut engine);
        park_food(&mut state, Position::new(0, 0));

        engine.tick(&mut state, Some(Direction::Up));
        engine.tick(&mut state, None);

        assert_eq!(state.snake.head(), Position::new(5, 3));
        assert_eq!(state.snake.heading, Some(Direction::Up));
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = running_session(&mut engine);
        park_food(&mut state, Position::new(0, 0));

        engine.tick(&mut state, Some(Direction::Right));
        let outcome = engine.tick(&mut state, Some(Direction::Left));

        assert!(!outcome.terminated);
        assert_eq!(state.snake.heading, Some(Direction::Right));
        assert_eq!(state.snake.head(), Position::new(7, 5));
    }

    #[test]
    fn test_first_steer_always_accepted() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = running_session(&mut engine);
        park_food(&mut state, Position::new(0, 0));

        engine.tick(&mut state, Some(Direction::Left));

        assert_eq!(state.snake.heading, Some(Direction::Left));
        assert_eq!(state.snake.head(), Position::new(4, 5));
    }

    #[test]
    fn test_food_consumption_grows_and_scores() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = running_session(&mut engine);
        state.food = state.snake.head().moved_in_direction(Direction::Right);

        let outcome = engine.tick(&mut state, Some(Direction::Right));

        assert!(outcome.ate_food);
        assert!(!outcome.leveled_up);
        assert_eq!(state.score(), 1);
        assert_eq!(state.snake.len(), 2);
        assert!(!state.snake.body.contains(&state.food));
    }

    #[test]
    fn test_food_not_replaced_on_non_eating_tick() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = running_session(&mut engine);
        park_food(&mut state, Position::new(0, 0));
        let food_before = state.food;

        engine.tick(&mut state, Some(Direction::Right));

        assert_eq!(state.food, food_before);
    }

    #[test]
    fn test_level_up_after_threshold_foods() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = running_session(&mut engine);
        let rate_before = state.tick_rate;

        // Feed the snake four times by always planting food ahead of it
        let mut leveled = false;
        for _ in 0..4 {
            state.food = state.snake.head().moved_in_direction(Direction::Right);
            let outcome = engine.tick(&mut state, Some(Direction::Right));
            assert!(outcome.ate_food);
            leveled = outcome.leveled_up;
        }

        assert!(leveled);
        assert_eq!(state.score(), 4);
        assert_eq!(state.level(), 2);
        assert_eq!(state.tick_rate, rate_before + 2);
        assert_eq!(state.phase, Phase::Running);
    }

    #[test]
    fn test_wall_collision_terminates() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = running_session(&mut engine);
        park_food(&mut state, Position::new(0, 0));

        // Head starts at (5, 5) on a 10x10 grid; five moves right hit the wall
        let mut outcome = engine.tick(&mut state, Some(Direction::Right));
        for _ in 0..4 {
            assert!(!outcome.terminated);
            outcome = engine.tick(&mut state, None);
        }

        assert!(outcome.terminated);
        assert_eq!(outcome.collision, Some(CollisionType::Wall));
        assert_eq!(state.phase, Phase::Terminated);
        // No partial tick effects: the head never left the board
        assert_eq!(state.snake.head(), Position::new(9, 5));
    }

    #[test]
    fn test_self_collision_terminates() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = running_session(&mut engine);

        // Grow to length 5 by eating four foods planted ahead
        for _ in 0..4 {
            state.food = state.snake.head().moved_in_direction(Direction::Right);
            engine.tick(&mut state, Some(Direction::Right));
        }
        park_food(&mut state, Position::new(0, 0));

        // Turn back into the body: down, left, up lands on a body cell
        engine.tick(&mut state, Some(Direction::Down));
        engine.tick(&mut state, Some(Direction::Left));
        let outcome = engine.tick(&mut state, Some(Direction::Up));

        assert!(outcome.terminated);
        assert_eq!(outcome.collision, Some(CollisionType::SelfCollision));
        assert_eq!(state.phase, Phase::Terminated);
    }

    #[test]
    fn test_vacated_tail_cell_is_free() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = running_session(&mut engine);

        // Grow to length 4: a tight 2x2 turn then re-enters the tail cell
        for _ in 0..3 {
            state.food = state.snake.head().moved_in_direction(Direction::Right);
            engine.tick(&mut state, Some(Direction::Right));
        }
        park_food(&mut state, Position::new(0, 0));

        // Body is a straight line of 4; loop around a 2x2 square. The fourth
        // move targets the cell the tail vacates on the same tick.
        engine.tick(&mut state, Some(Direction::Down));
        engine.tick(&mut state, Some(Direction::Left));
        let outcome = engine.tick(&mut state, Some(Direction::Up));

        assert!(!outcome.terminated, "vacated tail cell must not collide");
        assert_eq!(state.phase, Phase::Running);
    }

    #[test]
    fn test_no_duplicate_body_cells_while_running() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = running_session(&mut engine);

        // Grow, then wander in a safe zig-zag; body must stay duplicate-free
        for _ in 0..3 {
            state.food = state.snake.head().moved_in_direction(Direction::Right);
            engine.tick(&mut state, Some(Direction::Right));
        }
        park_food(&mut state, Position::new(0, 0));

        for steer in [
            Some(Direction::Down),
            None,
            Some(Direction::Left),
            None,
            Some(Direction::Down),
            Some(Direction::Right),
        ] {
            let outcome = engine.tick(&mut state, steer);
            assert!(!outcome.terminated);

            let mut seen = state.snake.body.clone();
            seen.sort_by_key(|p| (p.x, p.y));
            seen.dedup();
            assert_eq!(seen.len(), state.snake.len());
        }
    }

    #[test]
    fn test_terminated_is_absorbing() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = running_session(&mut engine);
        state.phase = Phase::Terminated;
        let snapshot = state.clone();

        let outcome = engine.tick(&mut state, Some(Direction::Right));

        assert!(outcome.terminated);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_paused_session_does_not_tick() {
        let mut engine = GameEngine::new(GameConfig::small());
        let mut state = running_session(&mut engine);
        state.phase = Phase::Paused;
        let snapshot = state.clone();

        let outcome = engine.tick(&mut state, Some(Direction::Right));

        assert!(!outcome.terminated);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_resumed_session_keeps_level_and_rate() {
        let mut engine = GameEngine::new(GameConfig::small());
        let state = engine.new_session(Progression { level: 3, score: 10 });

        assert_eq!(state.level(), 3);
        assert_eq!(state.score(), 10);
        assert_eq!(state.tick_rate, 16); // base 10 + 2 * level 3
    }
}
