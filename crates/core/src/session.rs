use crate::{
    EffectBook, EffectOption, FillRule, GameConfig, Grid, Ledger, Pos, RngState, Thresholds,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod offers;
mod state;
mod swap;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("position {0} is out of bounds")]
    OutOfBounds(Pos),
    #[error("no effect choice is pending")]
    NoChoicePending,
    #[error("invalid effect option index {0}")]
    InvalidOptionIndex(usize),
}

/// Advisory swap rejections; state conditions, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    MovesExhausted,
    ChoicePending,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    MovesExhausted,
    ComboTargetReached,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    pub chain_length: u32,
    pub removed_cells: usize,
    pub removed_value: i64,
    pub bonus_score: i64,
    pub actions_fired: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    Rejected(RejectReason),
    Reverted,
    Resolved(ResolutionSummary),
}

/// One game in progress. Every operation threads through this explicit
/// state object; there is no global state anywhere in the crate, so
/// multiple sessions can coexist and tests stay deterministic.
#[derive(Debug)]
pub struct SessionState {
    pub config: GameConfig,
    pub grid: Grid,
    pub required: Thresholds,
    /// Effective fill parameters: the value ceiling is derived from the
    /// rolled thresholds at init, not taken raw from the config.
    pub fill: FillRule,
    pub ledger: Ledger,
    pub effects: EffectBook,
    pub rng: RngState,
    pub selection_count: u32,
    pub pending_options: Option<Vec<EffectOption>>,
    pub moves_left: Option<u32>,
    pub moves_taken: u32,
    pub outcome: Option<GameOutcome>,
}
