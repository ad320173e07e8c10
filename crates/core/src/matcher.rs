use crate::{Grid, Piece, Pos, RemovalCounters, RngState, ThresholdRule};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Per-index removal requirements. An entry ≤ 0 disables that index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thresholds {
    pub by_color: Vec<i64>,
    pub by_shape: Vec<i64>,
}

impl Thresholds {
    pub fn roll(rng: &mut RngState, rule: ThresholdRule, color_count: u8, shape_count: u8) -> Self {
        let by_color = (0..color_count)
            .map(|_| rng.range_i64(rule.min, rule.max))
            .collect();
        let by_shape = (0..shape_count)
            .map(|_| rng.range_i64(rule.min, rule.max))
            .collect();
        Self { by_color, by_shape }
    }

    /// Compact-board easing: every requirement drops to 3/4, floored, min 1.
    pub fn scale_compact(&mut self) {
        for required in self.by_color.iter_mut().chain(self.by_shape.iter_mut()) {
            *required = (*required * 3 / 4).max(1);
        }
    }

    pub fn max_required(&self) -> i64 {
        self.by_color
            .iter()
            .chain(self.by_shape.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    /// Union of all qualifying color- and shape-components.
    pub cells: HashSet<Pos>,
    pub matched_colors: Vec<u8>,
    pub matched_shapes: Vec<u8>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removed {
    pub pos: Pos,
    pub piece: Piece,
}

/// Connected-component search over hex adjacency, run independently per
/// color index and per shape index. A component whose value sum reaches the
/// index's requirement (inclusive) is marked whole; single-cell components
/// qualify on their own value.
pub fn find_matches(grid: &Grid, required: &Thresholds) -> MatchResult {
    let mut result = MatchResult::default();
    scan_index(
        grid,
        &required.by_color,
        |piece| piece.color,
        &mut result.cells,
        &mut result.matched_colors,
    );
    scan_index(
        grid,
        &required.by_shape,
        |piece| piece.shape,
        &mut result.cells,
        &mut result.matched_shapes,
    );
    result
}

fn scan_index(
    grid: &Grid,
    required: &[i64],
    key: impl Fn(&Piece) -> u8,
    cells: &mut HashSet<Pos>,
    matched: &mut Vec<u8>,
) {
    for (index, &threshold) in required.iter().enumerate() {
        if threshold <= 0 {
            continue;
        }
        let index = index as u8;
        // Components are index-specific; the visited set restarts per index.
        let mut visited = vec![false; grid.rows() * grid.cols()];
        for start in grid.positions() {
            if visited[grid.index_of(start)] {
                continue;
            }
            let Some(piece) = grid.get(start) else {
                continue;
            };
            if key(&piece) != index {
                continue;
            }
            let component = collect_component(grid, start, index, &key, &mut visited);
            let sum: i64 = component
                .iter()
                .filter_map(|pos| grid.get(*pos))
                .map(|piece| piece.value)
                .sum();
            if sum >= threshold {
                cells.extend(component.iter().copied());
                if !matched.contains(&index) {
                    matched.push(index);
                }
            }
        }
    }
}

fn collect_component(
    grid: &Grid,
    start: Pos,
    index: u8,
    key: &impl Fn(&Piece) -> u8,
    visited: &mut [bool],
) -> Vec<Pos> {
    let mut component = Vec::new();
    let mut stack = vec![start];
    visited[grid.index_of(start)] = true;
    while let Some(pos) = stack.pop() {
        component.push(pos);
        for neighbor in grid.hex_neighbors(pos) {
            if visited[grid.index_of(neighbor)] {
                continue;
            }
            if let Some(piece) = grid.get(neighbor) {
                if key(&piece) == index {
                    visited[grid.index_of(neighbor)] = true;
                    stack.push(neighbor);
                }
            }
        }
    }
    component
}

/// Null every marked cell and return what was removed. Each removed piece's
/// value is added once to the color, shape, and total counters — a cell
/// marked by both a color- and a shape-component still counts once.
pub fn remove_matches(
    grid: &mut Grid,
    cells: &HashSet<Pos>,
    counters: &mut RemovalCounters,
) -> Vec<Removed> {
    let mut ordered: Vec<Pos> = cells.iter().copied().collect();
    ordered.sort();
    let mut removed = Vec::with_capacity(ordered.len());
    for pos in ordered {
        if let Some(piece) = grid.take(pos) {
            counters.record(piece);
            removed.push(Removed { pos, piece });
        }
    }
    removed
}
