use super::action::Direction;
use super::progression::Progression;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
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
}

/// The snake in the game
///
/// A fresh snake is a single cell with no heading; it stays put until the
/// first steer. Length always equals growth count + 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of travel, None until the first steer
    pub heading: Option<Direction>,
}

impl Snake {
    /// Create a new single-cell snake at the given starting position
    pub fn new(head: Position) -> Self {
        Self {
            body: vec![head],
            heading: None,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Advance the head to a new position, growing if should_grow is true
    ///
    /// The tail is popped before any caller checks for self-collision, so the
    /// cell vacated this tick counts as free.
    pub fn advance_to(&mut self, new_head: Position, should_grow: bool) {
        self.body.insert(0, new_head);

        if !should_grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Lifecycle of a game session
///
/// Terminated is absorbing: no tick is processed and no transition leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    Terminated,
}

/// Complete state of one game session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub snake: Snake,
    pub food: Position,
    pub progression: Progression,
    /// Ticks per second currently in effect, derived from the level
    pub tick_rate: u32,
    pub grid_width: usize,
    pub grid_height: usize,
    pub phase: Phase,
}

impl SessionState {
    pub fn new(
        snake: Snake,
        food: Position,
        progression: Progression,
        tick_rate: u32,
        grid_width: usize,
        grid_height: usize,
    ) -> Self {
        Self {
            snake,
            food,
            progression,
            tick_rate,
            grid_width,
            grid_height,
            phase: Phase::Running,
        }
    }

    pub fn score(&self) -> u32 {
        self.progression.score
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state(snake: Snake) -> SessionState {
        SessionState::new(snake, Position::new(9, 9), Progression::new(), 12, 20, 20)
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
    }

    #[test]
    fn test_new_snake_is_single_idle_cell() {
        let snake = Snake::new(Position::new(5, 5));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.heading, None);
        assert!(snake.body_segments().is_empty());
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::new(Position::new(5, 5));

        // Advance without growing keeps length 1
        snake.advance_to(Position::new(6, 5), false);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Position::new(6, 5));

        // Advance with growing
        snake.advance_to(Position::new(7, 5), true);
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Position::new(7, 5));
        assert_eq!(snake.body[1], Position::new(6, 5));
    }

    #[test]
    fn test_collision_detection_excludes_head() {
        let mut snake = Snake::new(Position::new(5, 5));
        snake.advance_to(Position::new(6, 5), true);
        snake.advance_to(Position::new(7, 5), true);

        assert!(!snake.collides_with_body(Position::new(7, 5))); // head
        assert!(snake.collides_with_body(Position::new(6, 5))); // body
        assert!(snake.collides_with_body(Position::new(5, 5))); // tail
        assert!(!snake.collides_with_body(Position::new(10, 10))); // empty
    }

    #[test]
    fn test_bounds_checking() {
        let state = test_state(Snake::new(Position::new(5, 5)));

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(19, 19)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(20, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 20)));
    }

    #[test]
    fn test_new_session_starts_running() {
        let state = test_state(Snake::new(Position::new(5, 5)));
        assert_eq!(state.phase, Phase::Running);
        assert!(!state.is_paused());
    }
}
