use serde::{Deserialize, Serialize};

/// Configuration for a game session
///
/// Replaces the module-level tuning knobs (grid size, base speed, level
/// threshold) with an explicit struct passed by reference into the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Tick rate at a hypothetical level 0, in ticks per second
    pub base_tick_rate: u32,
    /// Foods eaten per level-up
    pub level_threshold: u32,
    /// Ticks per second gained per level
    pub rate_increment: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 30,
            base_tick_rate: 10,
            level_threshold: 4,
            rate_increment: 2,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    ///
    /// Dimensions are clamped to at least 2 cells per axis; the board must
    /// hold the snake and its food.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width.max(2),
            grid_height: height.max(2),
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Tick rate in effect at the given level
    pub fn tick_rate_for_level(&self, level: u32) -> u32 {
        self.base_tick_rate + self.rate_increment * level
    }
}
