//! Session configuration.
//!
//! Timing is policy: the core never measures time, it only reports the tick
//! interval a presentation layer should use for the current level.

use serde::{Deserialize, Serialize};
use tetris_2048_types::{
    Tile, DEFAULT_INTERVAL_STEP_MS, DEFAULT_LINES_PER_LEVEL, DEFAULT_MIN_INTERVAL_MS,
    DEFAULT_ROW_CLEAR_BONUS_MULTIPLIER, DEFAULT_TICK_INTERVAL_MS,
};

use crate::error::{Error, Result};

/// Shape selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Randomizer {
    /// Every shape once per shuffled bag of seven
    #[default]
    Bag,
    /// Independent uniform draws
    Uniform,
}

/// One entry of the weighted tile-value distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnWeight {
    pub value: u64,
    pub weight: u32,
}

impl SpawnWeight {
    pub const fn new(value: u64, weight: u32) -> Self {
        Self { value, weight }
    }
}

/// Level progression: faster gravity as rows are cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelPolicy {
    pub lines_per_level: u32,
    pub interval_step_ms: u32,
    pub min_interval_ms: u32,
}

impl Default for LevelPolicy {
    fn default() -> Self {
        Self {
            lines_per_level: DEFAULT_LINES_PER_LEVEL,
            interval_step_ms: DEFAULT_INTERVAL_STEP_MS,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Gravity interval at level 1
    pub tick_interval_ms: u32,
    /// Bonus per cleared row, multiplied by the largest tile on the board
    pub row_clear_bonus_multiplier: u64,
    /// Weighted tile values for new pieces
    pub spawn_bias: Vec<SpawnWeight>,
    pub randomizer: Randomizer,
    pub level: LevelPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            row_clear_bonus_multiplier: DEFAULT_ROW_CLEAR_BONUS_MULTIPLIER,
            spawn_bias: vec![SpawnWeight::new(2, 9), SpawnWeight::new(4, 1)],
            randomizer: Randomizer::Bag,
            level: LevelPolicy::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(Error::InvalidConfig("tick_interval_ms must be positive".into()));
        }
        if self.level.lines_per_level == 0 {
            return Err(Error::InvalidConfig(
                "level.lines_per_level must be positive".into(),
            ));
        }
        if self.spawn_bias.is_empty() {
            return Err(Error::InvalidConfig("spawn_bias is empty".into()));
        }
        if let Some(bad) = self.spawn_bias.iter().find(|w| Tile::new(w.value).is_none()) {
            return Err(Error::InvalidConfig(format!(
                "spawn_bias value {} is not a power of two >= 2",
                bad.value
            )));
        }
        if self.spawn_bias.iter().all(|w| w.weight == 0) {
            return Err(Error::InvalidConfig("spawn_bias weights are all zero".into()));
        }
        Ok(())
    }

    /// Level reached after clearing `lines` rows (levels start at 1)
    pub fn level_for_lines(&self, lines: u32) -> u32 {
        1 + lines / self.level.lines_per_level.max(1)
    }

    /// Recommended gravity interval at `level`
    pub fn tick_interval_for_level(&self, level: u32) -> u32 {
        let reduction = level
            .saturating_sub(1)
            .saturating_mul(self.level.interval_step_ms);
        self.tick_interval_ms
            .saturating_sub(reduction)
            .max(self.level.min_interval_ms)
    }
}
