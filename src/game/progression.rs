use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use crate::persistence::ProgressionRecord;

/// Level and score for the current session
///
/// The level-up rule: every time the score reaches a positive multiple of
/// `GameConfig::level_threshold`, the level goes up by one and the tick rate
/// rises by `rate_increment`. Level never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub score: u32,
}

impl Progression {
    /// Fresh progression for a new player
    pub fn new() -> Self {
        Self { level: 1, score: 0 }
    }

    /// Resume progression from a persisted record
    pub fn from_record(record: &ProgressionRecord) -> Self {
        Self {
            level: record.level,
            score: record.score,
        }
    }

    /// Record one eaten food and apply the level-up rule
    ///
    /// Returns true if the level changed, in which case the caller should
    /// recompute the tick rate via `GameConfig::tick_rate_for_level`.
    pub fn advance(&mut self, config: &GameConfig) -> bool {
        self.score += 1;

        if self.score % config.level_threshold == 0 {
            self.level += 1;
            true
        } else {
            false
        }
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_progression() {
        let progression = Progression::new();
        assert_eq!(progression.level, 1);
        assert_eq!(progression.score, 0);
    }

    #[test]
    fn test_level_up_every_threshold_foods() {
        let config = GameConfig::default();
        let mut progression = Progression::new();

        // Foods 1-3 do not level up
        for _ in 0..3 {
            assert!(!progression.advance(&config));
        }
        assert_eq!(progression.level, 1);
        assert_eq!(progression.score, 3);

        // Food 4 does
        assert!(progression.advance(&config));
        assert_eq!(progression.level, 2);
        assert_eq!(progression.score, 4);
    }

    #[test]
    fn test_level_matches_score_over_threshold() {
        let config = GameConfig::default();
        let mut progression = Progression::new();
        let mut previous_level = progression.level;

        for _ in 0..20 {
            progression.advance(&config);
            assert!(progression.level >= previous_level);
            assert_eq!(
                progression.level,
                1 + progression.score / config.level_threshold
            );
            previous_level = progression.level;
        }
    }

    #[test]
    fn test_resume_from_record() {
        let record = ProgressionRecord {
            username: "alice".to_string(),
            level: 3,
            score: 9,
        };
        let progression = Progression::from_record(&record);
        assert_eq!(progression.level, 3);
        assert_eq!(progression.score, 9);
    }
}
