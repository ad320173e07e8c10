use hexmatch_core::{
    find_matches, remove_matches, Grid, Piece, Pos, RemovalCounters, Thresholds,
};
use std::collections::HashSet;

fn piece(color: u8, shape: u8, value: i64) -> Piece {
    Piece {
        color,
        shape,
        value,
    }
}

fn neighbor_set(grid: &Grid, row: usize, col: usize) -> HashSet<Pos> {
    grid.hex_neighbors(Pos::new(row, col)).into_iter().collect()
}

fn positions(coords: &[(usize, usize)]) -> HashSet<Pos> {
    coords.iter().map(|&(r, c)| Pos::new(r, c)).collect()
}

#[test]
fn even_row_interior_neighbors_match_offset_table() {
    let grid = Grid::empty(6, 6);
    assert_eq!(
        neighbor_set(&grid, 2, 2),
        positions(&[(2, 1), (2, 3), (1, 2), (1, 1), (3, 2), (3, 1)])
    );
}

#[test]
fn odd_row_interior_neighbors_match_offset_table() {
    let grid = Grid::empty(6, 6);
    assert_eq!(
        neighbor_set(&grid, 1, 2),
        positions(&[(1, 1), (1, 3), (0, 3), (0, 2), (2, 3), (2, 2)])
    );
}

#[test]
fn corner_neighbors_are_bounds_filtered() {
    let grid = Grid::empty(4, 5);
    // even-row origin corner
    assert_eq!(neighbor_set(&grid, 0, 0), positions(&[(0, 1), (1, 0)]));
    // odd-row right edge
    assert_eq!(
        neighbor_set(&grid, 1, 4),
        positions(&[(1, 3), (0, 4), (2, 4)])
    );
    // even-row bottom-left (rows=4 so row 3 is odd; use row 2)
    assert_eq!(
        neighbor_set(&grid, 2, 0),
        positions(&[(2, 1), (1, 0), (3, 0)])
    );
}

#[test]
fn no_cell_has_more_than_six_neighbors() {
    let grid = Grid::empty(8, 8);
    for pos in grid.positions() {
        let neighbors = grid.hex_neighbors(pos);
        assert!(neighbors.len() <= 6, "{pos} has {}", neighbors.len());
        let unique: HashSet<Pos> = neighbors.iter().copied().collect();
        assert_eq!(unique.len(), neighbors.len(), "{pos} repeats a neighbor");
    }
}

#[test]
fn gravity_compacts_columns_preserving_order() {
    let mut grid = Grid::empty(4, 2);
    grid.set(Pos::new(0, 0), Some(piece(0, 0, 1)));
    grid.set(Pos::new(2, 0), Some(piece(1, 1, 2)));
    grid.set(Pos::new(1, 1), Some(piece(2, 2, 3)));
    grid.apply_gravity();
    assert_eq!(grid.get(Pos::new(3, 0)), Some(piece(1, 1, 2)));
    assert_eq!(grid.get(Pos::new(2, 0)), Some(piece(0, 0, 1)));
    assert_eq!(grid.get(Pos::new(3, 1)), Some(piece(2, 2, 3)));
    assert_eq!(grid.get(Pos::new(0, 0)), None);
    assert_eq!(grid.get(Pos::new(1, 1)), None);
}

#[test]
fn gravity_is_idempotent() {
    let mut grid = Grid::empty(5, 4);
    grid.set(Pos::new(0, 1), Some(piece(0, 0, 5)));
    grid.set(Pos::new(2, 1), Some(piece(1, 0, 6)));
    grid.set(Pos::new(4, 1), Some(piece(2, 0, 7)));
    grid.set(Pos::new(1, 3), Some(piece(3, 1, 8)));
    grid.apply_gravity();
    let once = grid.clone();
    grid.apply_gravity();
    assert_eq!(grid, once);
}

#[test]
fn swap_and_swap_back_restores_the_grid() {
    let mut grid = Grid::empty(3, 3);
    for (i, pos) in grid.positions().enumerate().collect::<Vec<_>>() {
        grid.set(pos, Some(piece((i % 4) as u8, (i % 3) as u8, i as i64 + 1)));
    }
    let before = grid.clone();
    let a = Pos::new(0, 1);
    let b = Pos::new(2, 2);
    grid.swap(a, b);
    assert_ne!(grid, before);
    grid.swap(a, b);
    assert_eq!(grid, before);
}

#[test]
fn component_sum_at_threshold_triggers_inclusively() {
    let mut grid = Grid::empty(2, 3);
    // (0,0) and (0,1) are hex-adjacent on an even row.
    grid.set(Pos::new(0, 0), Some(piece(0, 0, 60)));
    grid.set(Pos::new(0, 1), Some(piece(0, 1, 40)));
    let mut required = Thresholds {
        by_color: vec![100, 0],
        by_shape: vec![0, 0],
    };
    let result = find_matches(&grid, &required);
    assert_eq!(result.cells, positions(&[(0, 0), (0, 1)]));
    assert_eq!(result.matched_colors, vec![0]);
    assert!(result.matched_shapes.is_empty());

    // One unit short stays put.
    required.by_color[0] = 101;
    assert!(find_matches(&grid, &required).is_empty());
}

#[test]
fn single_cell_component_can_trigger_on_its_own_value() {
    let mut grid = Grid::empty(2, 2);
    grid.set(Pos::new(1, 1), Some(piece(3, 0, 500)));
    let required = Thresholds {
        by_color: vec![0, 0, 0, 500],
        by_shape: vec![0],
    };
    let result = find_matches(&grid, &required);
    assert_eq!(result.cells, positions(&[(1, 1)]));
}

#[test]
fn zero_threshold_disables_an_index() {
    let mut grid = Grid::empty(2, 2);
    grid.set(Pos::new(0, 0), Some(piece(0, 0, 1000)));
    grid.set(Pos::new(0, 1), Some(piece(0, 0, 1000)));
    let required = Thresholds {
        by_color: vec![0],
        by_shape: vec![0],
    };
    assert!(find_matches(&grid, &required).is_empty());
}

#[test]
fn components_are_recomputed_per_index() {
    // Two colors interleaved; each forms its own component and only the one
    // whose sum clears its own requirement is marked.
    let mut grid = Grid::empty(1, 4);
    grid.set(Pos::new(0, 0), Some(piece(0, 0, 50)));
    grid.set(Pos::new(0, 1), Some(piece(1, 0, 50)));
    grid.set(Pos::new(0, 2), Some(piece(0, 0, 60)));
    grid.set(Pos::new(0, 3), Some(piece(1, 0, 10)));
    let required = Thresholds {
        by_color: vec![100, 100],
        by_shape: vec![0],
    };
    // Color 0 splits into two components (50 and 60) separated by color 1;
    // neither reaches 100. Color 1 likewise (50, 10).
    assert!(find_matches(&grid, &required).is_empty());
}

#[test]
fn removal_updates_every_counter_by_removed_value() {
    let mut grid = Grid::empty(2, 3);
    grid.set(Pos::new(0, 0), Some(piece(2, 1, 30)));
    grid.set(Pos::new(0, 1), Some(piece(2, 4, 70)));
    let cells = positions(&[(0, 0), (0, 1)]);
    let mut counters = RemovalCounters::new(8, 8);
    let removed = remove_matches(&mut grid, &cells, &mut counters);
    assert_eq!(removed.len(), 2);
    assert_eq!(counters.color(2), 100);
    assert_eq!(counters.shape(1), 30);
    assert_eq!(counters.shape(4), 70);
    assert_eq!(counters.total, 100);
    assert_eq!(grid.occupied_cells(), 0);
}

#[test]
fn cell_matched_by_color_and_shape_counts_once() {
    // All three cells share color 0 and shape 0; both predicates mark the
    // same component and the union removes each cell exactly once.
    let mut grid = Grid::empty(1, 3);
    grid.set(Pos::new(0, 0), Some(piece(0, 0, 40)));
    grid.set(Pos::new(0, 1), Some(piece(0, 0, 40)));
    grid.set(Pos::new(0, 2), Some(piece(0, 0, 40)));
    let required = Thresholds {
        by_color: vec![120],
        by_shape: vec![120],
    };
    let result = find_matches(&grid, &required);
    assert_eq!(result.cells.len(), 3);
    assert_eq!(result.matched_colors, vec![0]);
    assert_eq!(result.matched_shapes, vec![0]);

    let mut counters = RemovalCounters::new(1, 1);
    let removed = remove_matches(&mut grid, &result.cells, &mut counters);
    assert_eq!(removed.len(), 3);
    assert_eq!(counters.color(0), 120);
    assert_eq!(counters.shape(0), 120);
    assert_eq!(counters.total, 120);
}

#[test]
fn removal_set_is_the_union_of_color_and_shape_components() {
    let mut grid = Grid::empty(1, 5);
    // color 0 pair on the left, shape 2 pair on the right, disjoint.
    grid.set(Pos::new(0, 0), Some(piece(0, 0, 80)));
    grid.set(Pos::new(0, 1), Some(piece(0, 1, 80)));
    grid.set(Pos::new(0, 3), Some(piece(1, 2, 90)));
    grid.set(Pos::new(0, 4), Some(piece(2, 2, 90)));
    let required = Thresholds {
        by_color: vec![150, 0, 0],
        by_shape: vec![0, 0, 150],
    };
    let result = find_matches(&grid, &required);
    assert_eq!(result.cells, positions(&[(0, 0), (0, 1), (0, 3), (0, 4)]));
    assert_eq!(result.matched_colors, vec![0]);
    assert_eq!(result.matched_shapes, vec![2]);
}
