//! Within-rank reordering to reduce inter-rank edge crossings.
//!
//! Median up/down weighings combined with a transpose heuristic, after
//! Gansner et al 1993. The stage keeps the best ordering found so far and
//! rolls non-improving iterations back, so the committed crossing count never
//! increases.

use crate::config::LayoutConfig;
use crate::model::{CellRef, CellValues, HierarchyModel};
use tracing::debug;

/// Consecutive non-improving iterations tolerated before giving up.
const MAX_NO_IMPROVEMENT_ITERATIONS: usize = 2;

/// Cap on transpose scans per main-loop iteration in case of looping.
const MAX_TRANSPOSE_SCANS: usize = 10;

pub fn run(model: &mut HierarchyModel, config: &LayoutConfig) {
    if model.ranks.is_empty() {
        return;
    }

    // The initial ordering is the incumbent best.
    let mut best_ranks: Vec<Vec<CellRef>> = model.ranks.clone();

    let mut positions = CellValues::new(model, 0usize);
    for (rank_value, rank) in model.ranks.iter().enumerate() {
        for (i, &cell) in rank.iter().enumerate() {
            positions.set(cell, rank_value, i);
        }
    }

    let mut iterations_without_improvement = 0;
    let mut current_best = calculate_crossings(model, &positions);
    debug!(crossings = current_best, "crossing reduction start");

    let mut i = 0;
    while i < config.max_crossing_iterations
        && iterations_without_improvement < MAX_NO_IMPROVEMENT_ITERATIONS
    {
        weighted_median(model, &best_ranks, &mut positions, i);
        transpose(model, &mut positions, i);
        let candidate = calculate_crossings(model, &positions);

        if candidate < current_best {
            current_best = candidate;
            iterations_without_improvement = 0;

            // Store the current ordering as the best one.
            for (j, rank) in model.ranks.iter().enumerate() {
                for &cell in rank {
                    best_ranks[j][positions.get(cell, j)] = cell;
                }
            }
        } else {
            iterations_without_improvement += 1;

            // Restore the positions the iteration started from.
            for (j, rank) in model.ranks.iter().enumerate() {
                for (k, &cell) in rank.iter().enumerate() {
                    positions.set(cell, j, k);
                }
            }
        }

        if current_best == 0 {
            break;
        }
        i += 1;
    }
    debug!(
        crossings = current_best,
        iterations = i,
        "crossing reduction settled"
    );

    model.ranks = best_ranks;
}

/// Total crossings of the current candidate ordering, counting every
/// adjacent rank pair.
pub fn count_crossings(model: &HierarchyModel) -> usize {
    let mut positions = CellValues::new(model, 0usize);
    for (rank_value, rank) in model.ranks.iter().enumerate() {
        for (i, &cell) in rank.iter().enumerate() {
            positions.set(cell, rank_value, i);
        }
    }
    calculate_crossings(model, &positions)
}

fn calculate_crossings(model: &HierarchyModel, positions: &CellValues<usize>) -> usize {
    (1..model.ranks.len())
        .map(|i| calculate_rank_crossing(model, positions, i))
        .sum()
}

/// Crossings between rank `i` and the rank above it, via a binary indexed
/// accumulator tree over the concatenated neighbor positions.
fn calculate_rank_crossing(
    model: &HierarchyModel,
    positions: &CellValues<usize>,
    i: usize,
) -> usize {
    let rank = &model.ranks[i];
    let previous_rank_len = model.ranks[i - 1].len();
    if rank.is_empty() || previous_rank_len == 0 {
        return 0;
    }

    // Project every cell's neighbor positions on the rank above, ordered by
    // the cell's own candidate position.
    let mut grouped: Vec<Vec<usize>> = vec![Vec::new(); rank.len()];
    for &cell in rank {
        let rank_position = positions.get(cell, i);
        let mut node_indices: Vec<usize> = model
            .previous_layer_connected_cells(cell, i)
            .iter()
            .map(|&connected| positions.get(connected, i - 1))
            .collect();
        node_indices.sort_unstable();
        grouped[rank_position] = node_indices;
    }

    let mut first_index = 1usize;
    while first_index < previous_rank_len {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree = vec![0usize; tree_size];

    let mut total_crossings = 0;
    for index in grouped.into_iter().flatten() {
        let mut tree_index = index + first_index;
        tree[tree_index] += 1;
        while tree_index > 0 {
            if tree_index % 2 == 1 {
                total_crossings += tree[tree_index + 1];
            }
            tree_index = (tree_index - 1) >> 1;
            tree[tree_index] += 1;
        }
    }
    total_crossings
}

/// One sweep over the ranks, pulling each cell towards the median position
/// of its neighbors on the just-processed adjacent rank. Sweep direction
/// alternates per iteration.
fn weighted_median(
    model: &HierarchyModel,
    best_ranks: &[Vec<CellRef>],
    positions: &mut CellValues<usize>,
    iteration: usize,
) {
    let max_rank = model.max_rank();
    let downward = iteration % 2 == 0;
    if downward {
        for j in 1..=max_rank {
            median_rank(model, best_ranks, positions, j, downward);
        }
    } else {
        for j in (1..max_rank).rev() {
            median_rank(model, best_ranks, positions, j, downward);
        }
    }
}

struct MedianCellSorter {
    median_value: f64,
    cell: CellRef,
}

fn median_rank(
    model: &HierarchyModel,
    best_ranks: &[Vec<CellRef>],
    positions: &mut CellValues<usize>,
    rank_value: usize,
    downward: bool,
) {
    let num_cells = best_ranks[rank_value].len();
    let mut median_values: Vec<MedianCellSorter> = Vec::new();
    let mut reserved = vec![false; num_cells];

    for &cell in &best_ranks[rank_value] {
        let connected = if downward {
            model.previous_layer_connected_cells(cell, rank_value)
        } else {
            model.next_layer_connected_cells(cell, rank_value)
        };
        let next_rank_value = if downward {
            rank_value - 1
        } else {
            rank_value + 1
        };

        if !connected.is_empty() {
            median_values.push(MedianCellSorter {
                median_value: median_value(positions, &connected, next_rank_value),
                cell,
            });
        } else {
            // Cells with no neighbors on that side keep their slot.
            reserved[positions.get(cell, rank_value)] = true;
        }
    }

    median_values.sort_by(|a, b| {
        a.median_value
            .partial_cmp(&b.median_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut sorted = median_values.into_iter();
    for i in 0..num_cells {
        if !reserved[i] {
            if let Some(entry) = sorted.next() {
                positions.set(entry.cell, rank_value, i);
            }
        }
    }
}

/// Median of the neighbor positions: middle value for odd arities, plain
/// mean for pairs, and for larger even arities a value weighted towards the
/// side with the tighter spread.
fn median_value(positions: &CellValues<usize>, connected: &[CellRef], rank_value: usize) -> f64 {
    let mut values: Vec<f64> = connected
        .iter()
        .map(|&cell| positions.get(cell, rank_value) as f64)
        .collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = values.len();
    if count % 2 == 1 {
        return values[count / 2];
    }
    if count == 2 {
        return (values[0] + values[1]) / 2.0;
    }

    let median_point = count / 2;
    let left_median = values[median_point - 1] - values[0];
    let right_median = values[count - 1] - values[median_point];
    if left_median + right_median == 0.0 {
        // All positions coincide; either middle value works.
        return (values[median_point - 1] + values[median_point]) / 2.0;
    }
    (values[median_point - 1] * right_median + values[median_point] * left_median)
        / (left_median + right_median)
}

/// Scans every adjacent cell pair on every rank and swaps the pair whenever
/// that strictly reduces the crossings it causes. On alternating scans of
/// odd main-loop iterations, equal-crossing swaps are also taken to nudge a
/// stuck ordering out of a local minimum; those do not count as improvement.
fn transpose(model: &HierarchyModel, positions: &mut CellValues<usize>, main_iteration: usize) {
    let mut improved = true;
    let mut count = 0;

    while improved && count < MAX_TRANSPOSE_SCANS {
        count += 1;
        let nudge = main_iteration % 2 == 1 && count % 2 == 1;
        improved = false;

        for i in 0..model.ranks.len() {
            let rank = &model.ranks[i];
            if rank.len() < 2 {
                continue;
            }

            let mut ordered: Vec<CellRef> = rank.clone();
            for &cell in rank {
                ordered[positions.get(cell, i)] = cell;
            }

            // Carried neighbor data: after a swap the old left cell stays
            // the left cell of the next pair, so its projections are reused.
            let mut left_cell = ordered[0];
            let mut left_next_positions = neighbor_positions(model, positions, left_cell, i, true);
            let mut left_prev_positions = neighbor_positions(model, positions, left_cell, i, false);

            for j in 0..rank.len() - 1 {
                let right_cell = ordered[j + 1];
                let right_next_positions =
                    neighbor_positions(model, positions, right_cell, i, true);
                let right_prev_positions =
                    neighbor_positions(model, positions, right_cell, i, false);

                let mut total_current_crossings = 0;
                let mut total_switched_crossings = 0;

                for &left in &left_next_positions {
                    for &right in &right_next_positions {
                        if left > right {
                            total_current_crossings += 1;
                        }
                        if left < right {
                            total_switched_crossings += 1;
                        }
                    }
                }
                for &left in &left_prev_positions {
                    for &right in &right_prev_positions {
                        if left > right {
                            total_current_crossings += 1;
                        }
                        if left < right {
                            total_switched_crossings += 1;
                        }
                    }
                }

                if total_switched_crossings < total_current_crossings
                    || (total_switched_crossings == total_current_crossings && nudge)
                {
                    let temp = positions.get(left_cell, i);
                    positions.set(left_cell, i, positions.get(right_cell, i));
                    positions.set(right_cell, i, temp);

                    // Nudges must not count as improvement or the scan gets
                    // stuck alternating between two equal orderings.
                    if !nudge {
                        improved = true;
                    }
                } else {
                    left_cell = right_cell;
                    left_next_positions = right_next_positions;
                    left_prev_positions = right_prev_positions;
                }
            }
        }
    }
}

fn neighbor_positions(
    model: &HierarchyModel,
    positions: &CellValues<usize>,
    cell: CellRef,
    rank_value: usize,
    next: bool,
) -> Vec<usize> {
    let (connected, layer) = if next {
        (
            model.next_layer_connected_cells(cell, rank_value),
            rank_value + 1,
        )
    } else {
        (
            model.previous_layer_connected_cells(cell, rank_value),
            rank_value.wrapping_sub(1),
        )
    };
    connected
        .iter()
        .map(|&connected| positions.get(connected, layer))
        .collect()
}
