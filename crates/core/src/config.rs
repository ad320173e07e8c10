use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board needs at least one row and one column")]
    EmptyBoard,
    #[error("at least one color must be configured")]
    NoColors,
    #[error("at least one shape must be configured")]
    NoShapes,
    #[error("piece value range {0}..={1} is empty")]
    BadValueRange(i64, i64),
    #[error("removal threshold range {0}..={1} is empty")]
    BadThresholdRange(i64, i64),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoardRule {
    pub rows: usize,
    pub cols: usize,
    pub color_count: u8,
    pub shape_count: u8,
}

/// Inclusive range a freshly spawned piece's value is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRule {
    pub min: i64,
    pub max: i64,
}

/// Inclusive range the per-index removal requirements are rolled from at
/// board initialization. A rolled requirement never changes during play.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EndCondition {
    MovesExhausted,
    ComboTarget(u32),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModeRule {
    /// None = unlimited swaps.
    pub move_limit: Option<u32>,
    pub end: EndCondition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub board: BoardRule,
    pub values: ValueRule,
    pub thresholds: ThresholdRule,
    pub mode: ModeRule,
    /// Compact-board preset: scales rolled requirements by 3/4 at init.
    #[serde(default)]
    pub compact: bool,
    /// Starting selection count for the n^n reward threshold.
    pub selection_seed: u32,
    /// Retry cap when generating an initial board without matches.
    pub fill_attempts: u32,
}

pub const COMBO_TARGET_DEFAULT: u32 = 256;

impl GameConfig {
    pub fn standard() -> Self {
        Self {
            board: BoardRule {
                rows: 8,
                cols: 8,
                color_count: 8,
                shape_count: 8,
            },
            values: ValueRule { min: 1, max: 999 },
            thresholds: ThresholdRule { min: 500, max: 900 },
            mode: ModeRule {
                move_limit: None,
                end: EndCondition::MovesExhausted,
            },
            compact: false,
            selection_seed: 5,
            fill_attempts: 2000,
        }
    }

    pub fn combo256() -> Self {
        let mut config = Self::standard();
        config.mode.end = EndCondition::ComboTarget(COMBO_TARGET_DEFAULT);
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.rows == 0 || self.board.cols == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        if self.board.color_count == 0 {
            return Err(ConfigError::NoColors);
        }
        if self.board.shape_count == 0 {
            return Err(ConfigError::NoShapes);
        }
        if self.values.min > self.values.max || self.values.min < 1 {
            return Err(ConfigError::BadValueRange(self.values.min, self.values.max));
        }
        if self.thresholds.min > self.thresholds.max {
            return Err(ConfigError::BadThresholdRange(
                self.thresholds.min,
                self.thresholds.max,
            ));
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.board.rows * self.board.cols
    }
}
