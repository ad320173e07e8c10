use crate::Piece;
use serde::{Deserialize, Serialize};

/// Removed-value accumulators, the trigger substrate for effects. Values
/// grow with every removal and shrink only when an effect consumes its
/// required amount.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemovalCounters {
    pub by_color: Vec<i64>,
    pub by_shape: Vec<i64>,
    pub total: i64,
}

impl RemovalCounters {
    pub fn new(color_count: u8, shape_count: u8) -> Self {
        Self {
            by_color: vec![0; color_count as usize],
            by_shape: vec![0; shape_count as usize],
            total: 0,
        }
    }

    pub fn record(&mut self, piece: Piece) {
        if let Some(entry) = self.by_color.get_mut(piece.color as usize) {
            *entry = entry.saturating_add(piece.value);
        }
        if let Some(entry) = self.by_shape.get_mut(piece.shape as usize) {
            *entry = entry.saturating_add(piece.value);
        }
        self.total = self.total.saturating_add(piece.value);
    }

    pub fn color(&self, index: u8) -> i64 {
        self.by_color.get(index as usize).copied().unwrap_or(0)
    }

    pub fn shape(&self, index: u8) -> i64 {
        self.by_shape.get(index as usize).copied().unwrap_or(0)
    }

    pub fn consume_color(&mut self, index: u8, amount: i64) {
        if let Some(entry) = self.by_color.get_mut(index as usize) {
            *entry = (*entry - amount).max(0);
        }
    }

    pub fn consume_shape(&mut self, index: u8, amount: i64) {
        if let Some(entry) = self.by_shape.get_mut(index as usize) {
            *entry = (*entry - amount).max(0);
        }
    }

    pub fn consume_total(&mut self, amount: i64) {
        self.total = (self.total - amount).max(0);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub score: i64,
    /// Transient per-chain cascade counter; display value, reset every swap.
    pub combo: u32,
    /// Banked count of completed chains, consumed by combo-gated effects.
    pub combo_bank: u32,
    pub removed: RemovalCounters,
}

impl Ledger {
    pub fn new(color_count: u8, shape_count: u8) -> Self {
        Self {
            score: 0,
            combo: 0,
            combo_bank: 0,
            removed: RemovalCounters::new(color_count, shape_count),
        }
    }

    pub fn add_score(&mut self, delta: i64) {
        self.score = self.score.saturating_add(delta);
    }

    pub fn set_score(&mut self, value: i64) {
        self.score = value;
    }

    pub fn add_bank(&mut self, chains: u32) {
        self.combo_bank = self.combo_bank.saturating_add(chains);
    }

    /// Consume up to `amount` from the bank; clamps, never goes negative.
    /// Returns what was actually taken.
    pub fn consume_bank(&mut self, amount: u32) -> u32 {
        let took = self.combo_bank.min(amount);
        self.combo_bank -= took;
        took
    }
}

/// Reward gate: n^n for the current selection count, saturating. Grows
/// combinatorially with each accepted effect.
pub fn next_threshold_value(selection_count: u32) -> i64 {
    (selection_count as i64)
        .checked_pow(selection_count)
        .unwrap_or(i64::MAX)
}
