//! Final coordinate assignment and edge routing.
//!
//! Sets the horizontal locations of nodes and edge dummy segments on each
//! rank, using median up/down weighings plus heuristics to straighten edges
//! as far as possible, then commits vertex locations and builds every edge's
//! control points (jetties and inter-rank channel points).

use crate::config::{EdgeStyle, LayoutConfig};
use crate::facade::{LayoutGraph, Point};
use crate::model::{CellRef, CellValues, EdgeId, HierarchyModel, NodeId};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Don't move cells within this distance of their median.
const TOLERANCE: f64 = 1.0;

/// Runs the placement on an ordered, rank-populated model and writes the
/// results through the facade. Returns the maximum x extent laid up to.
pub fn run<G: LayoutGraph>(
    model: &mut HierarchyModel,
    graph: &mut G,
    config: &LayoutConfig,
) -> f64 {
    fetch_geometry(model, graph, config);

    let mut placement = Placement::new(model);
    placement.initial_coords(model, config);

    if config.fine_tuning {
        placement.min_node(model, config);

        let mut best_x_delta = 100000000.0;
        for i in 0..config.max_placement_iterations {
            if i != 0 {
                placement.median_pos(model, config, i);
                placement.min_node(model, config);
            }

            // If the total displacement is lower for the current positioning
            // there are fewer heavily angled edges, so it is kept.
            if placement.current_x_delta < best_x_delta {
                for (j, rank) in model.ranks.iter().enumerate() {
                    for &cell in rank {
                        let value = placement.temp.get(cell, j);
                        placement.x.set(cell, j, value);
                    }
                }
                best_x_delta = placement.current_x_delta;
            } else {
                for (j, rank) in model.ranks.iter().enumerate() {
                    for &cell in rank {
                        let value = placement.x.get(cell, j);
                        placement.temp.set(cell, j, value);
                    }
                }
            }

            placement.min_path(model, config);
            placement.current_x_delta = 0.0;
        }
        debug!(best_x_delta, "placement refinement settled");
    }

    placement.set_cell_locations(model, graph, config);
    placement.limit_x
}

/// Pulls vertex geometry through the facade once per vertex and sizes the
/// virtual edge segments from their parallel edge counts. East/west layouts
/// swap width and height here and swap coordinates back on output.
fn fetch_geometry<G: LayoutGraph>(model: &mut HierarchyModel, graph: &G, config: &LayoutConfig) {
    let mut bounds_warning = false;

    for v in model.node_ids() {
        let bounds = graph.vertex_bounds(&model.node(v).cell);
        let node = model.node_mut(v);
        match bounds {
            Some(bounds) => {
                if config.orientation.swaps_axes() {
                    node.width = bounds.height;
                    node.height = bounds.width;
                } else {
                    node.width = bounds.width;
                    node.height = bounds.height;
                }
            }
            None => {
                bounds_warning = true;
                node.width = 0.0;
                node.height = 0.0;
            }
        }
    }
    if bounds_warning {
        warn!("at least one vertex has no bounds, laying it out with zero size");
    }

    for eid in model.edge_ids() {
        let num_edges = match model.edge(eid).cells.len() {
            0 => {
                warn!(edge = eid.index(), "edge has no real edges, treating as a single edge");
                1
            }
            n => n,
        };
        model.edge_mut(eid).width = (num_edges - 1) as f64 * config.parallel_edge_spacing;
    }
}

struct WeightedCellSorter {
    weighted_value: usize,
    rank_index: usize,
    visited: bool,
    cell: CellRef,
}

struct Placement {
    /// Per-layer scratch x for the current refinement attempt.
    temp: CellValues<f64>,
    /// Committed per-layer x of the best attempt so far.
    x: CellValues<f64>,
    /// Center y of every rank in the canonical frame.
    rank_y: Vec<f64>,
    rank_widths: Vec<f64>,
    /// Extents of the real vertices per rank; the routing channels lie
    /// between one rank's bottom and the next rank's top.
    rank_top_y: Vec<f64>,
    rank_bottom_y: Vec<f64>,
    widest_rank: usize,
    widest_rank_value: f64,
    /// Sum of unsatisfied displacements in the current iteration.
    current_x_delta: f64,
    /// The maximum x value this positioning lays up to.
    limit_x: f64,
    /// Jetty x positions and y offsets where each edge connects to its
    /// source and target vertices, four values per real edge.
    jetty_positions: FxHashMap<EdgeId, Vec<f64>>,
}

impl Placement {
    fn new(model: &HierarchyModel) -> Self {
        let num_ranks = model.ranks.len();
        Self {
            temp: CellValues::new(model, 0.0),
            x: CellValues::new(model, 0.0),
            rank_y: vec![0.0; num_ranks],
            rank_widths: vec![0.0; num_ranks],
            rank_top_y: vec![f64::MAX; num_ranks],
            rank_bottom_y: vec![-f64::MAX; num_ranks],
            widest_rank: 0,
            widest_rank_value: f64::NEG_INFINITY,
            current_x_delta: 0.0,
            limit_x: 0.0,
            jetty_positions: FxHashMap::default(),
        }
    }

    /// Initial positioning: ranks are placed left to right from their
    /// intrinsic widths, then re-centered against the widest rank.
    fn initial_coords(&mut self, model: &HierarchyModel, config: &LayoutConfig) {
        self.calculate_widest_rank(model, config);

        // Sweep up and down from the widest rank.
        for i in (0..=self.widest_rank).rev() {
            if i < model.max_rank() {
                self.rank_coordinates(model, config, i);
            }
        }
        for i in self.widest_rank + 1..=model.max_rank() {
            if i > 0 {
                self.rank_coordinates(model, config, i);
            }
        }
    }

    /// Places one rank with its cells packed as close as their sizes and
    /// buffering permit, centered against the widest rank.
    fn rank_coordinates(&mut self, model: &HierarchyModel, config: &LayoutConfig, rank_value: usize) {
        let mut local_x =
            config.initial_x + (self.widest_rank_value - self.rank_widths[rank_value]) / 2.0;

        for &cell in &model.ranks[rank_value] {
            let width = model.cell_width(cell);
            local_x += width / 2.0;
            self.x.set(cell, rank_value, local_x);
            self.temp.set(cell, rank_value, local_x);
            local_x += width / 2.0 + config.intra_cell_spacing;
        }
    }

    /// Finds the widest rank and assigns every rank its y coordinate in the
    /// canonical frame while doing so.
    fn calculate_widest_rank(&mut self, model: &HierarchyModel, config: &LayoutConfig) {
        // The y difference between ranks depends on the tallest cell on the
        // rank before.
        let mut y = -config.inter_rank_cell_spacing;
        let mut last_rank_max_cell_height = 0.0;

        for rank_value in 0..model.ranks.len() {
            let mut max_cell_height = 0.0f64;
            let mut local_x = config.initial_x;

            for &cell in &model.ranks[rank_value] {
                let width = model.cell_width(cell);
                if let CellRef::Node(v) = cell {
                    max_cell_height = max_cell_height.max(model.node(v).height);
                }

                local_x += width / 2.0;
                self.x.set(cell, rank_value, local_x);
                self.temp.set(cell, rank_value, local_x);
                local_x += width / 2.0 + config.intra_cell_spacing;

                if local_x > self.widest_rank_value {
                    self.widest_rank_value = local_x;
                    self.widest_rank = rank_value;
                }
                self.rank_widths[rank_value] = local_x;
            }

            let distance_to_next_rank = max_cell_height / 2.0
                + last_rank_max_cell_height / 2.0
                + config.inter_rank_cell_spacing;
            last_rank_max_cell_height = max_cell_height;

            if config.orientation.flow_reversed() {
                y -= distance_to_next_rank;
            } else {
                y += distance_to_next_rank;
            }
            self.rank_y[rank_value] = y;
        }
    }

    /// One median positioning sweep in one direction: each rank is aligned
    /// to the adjacent rank processed just before it.
    fn median_pos(&mut self, model: &HierarchyModel, config: &LayoutConfig, iteration: usize) {
        let max_rank = model.max_rank();
        let downward = iteration % 2 == 0;

        if downward {
            for j in 1..=max_rank {
                self.rank_median_position(model, config, j, j - 1);
            }
        } else {
            for j in (1..max_rank).rev() {
                self.rank_median_position(model, config, j, j + 1);
            }
        }
    }

    /// Median minimisation over one rank relative to `next_rank_value`.
    fn rank_median_position(
        &mut self,
        model: &HierarchyModel,
        config: &LayoutConfig,
        rank_value: usize,
        next_rank_value: usize,
    ) {
        let rank = &model.ranks[rank_value];

        // Process cells in the order given by the weighted sum of their
        // connections on the adjacent rank; entries are indexed by rank
        // position so the limit scans below can walk the neighbors directly.
        let mut entries: Vec<WeightedCellSorter> = rank
            .iter()
            .enumerate()
            .map(|(i, &cell)| {
                let connected = if next_rank_value < rank_value {
                    model.previous_layer_connected_cells(cell, rank_value)
                } else {
                    model.next_layer_connected_cells(cell, rank_value)
                };
                WeightedCellSorter {
                    weighted_value: calculated_weighted_value(cell, &connected),
                    rank_index: i,
                    visited: false,
                    cell,
                }
            })
            .collect();

        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by_key(|&i| (entries[i].weighted_value, entries[i].rank_index));

        for &entry_index in &order {
            let cell = entries[entry_index].cell;
            let cell_width = model.cell_width(cell);
            let rank_index = entries[entry_index].rank_index;

            let connected = if next_rank_value < rank_value {
                model.previous_layer_connected_cells(cell, rank_value)
            } else {
                model.next_layer_connected_cells(cell, rank_value)
            };
            let median_next_level = if connected.is_empty() {
                // With no connections on the next level the cell tries to
                // stay where it is.
                self.temp.get(cell, rank_value)
            } else {
                self.median_x_value(&connected, next_rank_value)
            };

            // The limit on either side is the nearest already-placed cell,
            // with an allowance for the unplaced cells in between.
            let mut left_buffer = 0.0;
            let mut left_limit = -100000000.0;
            let mut j = rank_index;
            while j > 0 {
                j -= 1;
                let left_cell = entries[j].cell;
                let left_width = model.cell_width(left_cell);
                if entries[j].visited {
                    left_limit = self.temp.get(left_cell, rank_value)
                        + left_width / 2.0
                        + config.intra_cell_spacing
                        + left_buffer
                        + cell_width / 2.0;
                    break;
                }
                left_buffer += left_width + config.intra_cell_spacing;
            }

            let mut right_buffer = 0.0;
            let mut right_limit = 100000000.0;
            for j in rank_index + 1..entries.len() {
                let right_cell = entries[j].cell;
                let right_width = model.cell_width(right_cell);
                if entries[j].visited {
                    right_limit = self.temp.get(right_cell, rank_value)
                        - right_width / 2.0
                        - config.intra_cell_spacing
                        - right_buffer
                        - cell_width / 2.0;
                    break;
                }
                right_buffer += right_width + config.intra_cell_spacing;
            }

            if median_next_level >= left_limit && median_next_level <= right_limit {
                self.temp.set(cell, rank_value, median_next_level);
            } else if median_next_level < left_limit {
                // Couldn't place at the median value, place as close to it
                // as possible.
                self.temp.set(cell, rank_value, left_limit);
                self.current_x_delta += left_limit - median_next_level;
            } else {
                self.temp.set(cell, rank_value, right_limit);
                self.current_x_delta += median_next_level - right_limit;
            }

            entries[entry_index].visited = true;
        }
    }

    /// Median x of the connected cells on the given rank.
    fn median_x_value(&self, connected: &[CellRef], rank_value: usize) -> f64 {
        if connected.is_empty() {
            return 0.0;
        }

        let mut median_values: Vec<f64> = connected
            .iter()
            .map(|&cell| self.temp.get(cell, rank_value))
            .collect();
        median_values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        if connected.len() % 2 == 1 {
            median_values[connected.len() / 2]
        } else {
            let median_point = connected.len() / 2;
            (median_values[median_point - 1] + median_values[median_point]) / 2.0
        }
    }

    /// Queue-based relaxation pulling every cell towards the weighted
    /// average of its neighbor medians on both adjacent ranks, clamped by
    /// its immediate siblings. Cells whose position changes re-enqueue their
    /// neighbors; the queue is bounded in case of looping.
    fn min_node(&mut self, model: &HierarchyModel, config: &LayoutConfig) {
        let mut entries: Vec<WeightedCellSorter> = Vec::new();
        let mut entry_of: FxHashMap<CellRef, usize> = FxHashMap::default();
        let mut queue: VecDeque<usize> = VecDeque::new();

        for (rank_value, rank) in model.ranks.iter().enumerate() {
            for (rank_index, &cell) in rank.iter().enumerate() {
                let index = entries.len();
                entries.push(WeightedCellSorter {
                    // The weighted value stores the rank here.
                    weighted_value: rank_value,
                    rank_index,
                    visited: true,
                    cell,
                });
                // A cell spanning several ranks keeps its last wrapper, as
                // upstream's identity map does.
                entry_of.insert(cell, index);
                queue.push_back(index);
            }
        }

        let max_tries = entries.len() * 10;
        let mut count = 0;

        while count <= max_tries {
            let Some(entry_index) = queue.pop_front() else {
                break;
            };
            let cell = entries[entry_index].cell;
            let rank_value = entries[entry_index].weighted_value;
            let rank_index = entries[entry_index].rank_index;

            let next_layer_connected = model.next_layer_connected_cells(cell, rank_value);
            let previous_layer_connected = model.previous_layer_connected_cells(cell, rank_value);

            let num_next = next_layer_connected.len();
            let num_previous = previous_layer_connected.len();
            let median_next = self.median_x_value(&next_layer_connected, rank_value + 1);
            let median_previous =
                self.median_x_value(&previous_layer_connected, rank_value.wrapping_sub(1));

            let num_connected = num_next + num_previous;
            let current_position = self.temp.get(cell, rank_value);
            let mut cell_median = current_position;
            if num_connected > 0 {
                cell_median = (median_next * num_next as f64
                    + median_previous * num_previous as f64)
                    / num_connected as f64;
            }

            let cell_width = model.cell_width(cell);
            let mut position_changed = false;

            if cell_median < current_position - TOLERANCE {
                if rank_index == 0 {
                    self.temp.set(cell, rank_value, cell_median);
                    position_changed = true;
                } else {
                    let left_cell = model.ranks[rank_value][rank_index - 1];
                    let left_limit = self.temp.get(left_cell, rank_value)
                        + model.cell_width(left_cell) / 2.0
                        + config.intra_cell_spacing
                        + cell_width / 2.0;

                    if left_limit < cell_median {
                        self.temp.set(cell, rank_value, cell_median);
                        position_changed = true;
                    } else if left_limit < self.temp.get(cell, rank_value) - TOLERANCE {
                        self.temp.set(cell, rank_value, left_limit);
                        position_changed = true;
                    }
                }
            } else if cell_median > current_position + TOLERANCE {
                let rank_size = model.ranks[rank_value].len();

                if rank_index == rank_size - 1 {
                    self.temp.set(cell, rank_value, cell_median);
                    position_changed = true;
                } else {
                    let right_cell = model.ranks[rank_value][rank_index + 1];
                    let right_limit = self.temp.get(right_cell, rank_value)
                        - model.cell_width(right_cell) / 2.0
                        - config.intra_cell_spacing
                        - cell_width / 2.0;

                    if right_limit > cell_median {
                        self.temp.set(cell, rank_value, cell_median);
                        position_changed = true;
                    } else if right_limit > self.temp.get(cell, rank_value) + TOLERANCE {
                        self.temp.set(cell, rank_value, right_limit);
                        position_changed = true;
                    }
                }
            }

            if position_changed {
                for &connected in next_layer_connected
                    .iter()
                    .chain(previous_layer_connected.iter())
                {
                    if let Some(&connected_index) = entry_of.get(&connected) {
                        if !entries[connected_index].visited {
                            entries[connected_index].visited = true;
                            queue.push_back(connected_index);
                        }
                    }
                }
            }

            entries[entry_index].visited = false;
            count += 1;
        }
    }

    /// Straightens chains of virtual segments where possible. Each edge with
    /// at least two segments is swept from both ends; whichever direction
    /// straightens more segments than the edge already has is applied, the
    /// source-to-target sweep winning ties.
    fn min_path(&mut self, model: &HierarchyModel, config: &LayoutConfig) {
        for eid in model.edge_ids() {
            let edge = model.edge(eid);
            let (min_rank, max_rank) = (edge.min_rank, edge.max_rank);
            if max_rank <= min_rank + 2 {
                continue;
            }
            let cell = CellRef::Edge(eid);
            let inner = max_rank - min_rank - 1;

            // Check first whether the edge is already straight.
            let mut reference_x = self.temp.get(cell, min_rank + 1);
            let mut edge_straight = true;
            let mut ref_seg_count = 0;
            for i in min_rank + 2..max_rank {
                let x = self.temp.get(cell, i);
                if reference_x != x {
                    edge_straight = false;
                    reference_x = x;
                } else {
                    ref_seg_count += 1;
                }
            }
            if edge_straight {
                continue;
            }

            // Propagate from the source end towards the target.
            let mut down_seg_count = 0;
            let mut down_x_positions = vec![0.0; inner - 1];
            let mut current_x = self.x.get(cell, min_rank + 1);
            for i in min_rank + 1..max_rank - 1 {
                let next_x = self.x.get(cell, i + 1);
                if current_x == next_x
                    || self.reposition_valid(model, config, cell, i + 1, current_x)
                {
                    down_x_positions[i - min_rank - 1] = current_x;
                    down_seg_count += 1;
                } else {
                    down_x_positions[i - min_rank - 1] = next_x;
                    current_x = next_x;
                }
            }

            // And from the target end towards the source.
            let mut up_seg_count = 0;
            let mut up_x_positions = vec![0.0; inner - 1];
            let mut current_x = self.temp.get(cell, max_rank - 1);
            for i in (min_rank + 2..=max_rank - 1).rev() {
                let next_x = self.x.get(cell, i - 1);
                if current_x == next_x
                    || self.reposition_valid(model, config, cell, i - 1, current_x)
                {
                    up_x_positions[i - min_rank - 2] = current_x;
                    up_seg_count += 1;
                } else {
                    up_x_positions[i - min_rank - 2] = next_x;
                    current_x = next_x;
                }
            }

            if down_seg_count > ref_seg_count || up_seg_count > ref_seg_count {
                if down_seg_count >= up_seg_count {
                    for i in min_rank + 2..max_rank {
                        self.x.set(cell, i, down_x_positions[i - min_rank - 2]);
                    }
                } else {
                    for i in min_rank + 1..max_rank - 1 {
                        self.x.set(cell, i, up_x_positions[i - min_rank - 1]);
                    }
                }
            }
        }
    }

    /// Whether the cell may move to `position` on `rank` without violating
    /// the spacing against its in-rank neighbors.
    fn reposition_valid(
        &self,
        model: &HierarchyModel,
        config: &LayoutConfig,
        cell: CellRef,
        rank: usize,
        position: f64,
    ) -> bool {
        let rank_array = &model.ranks[rank];
        let Some(rank_index) = rank_array.iter().position(|&c| c == cell) else {
            return false;
        };
        let current_x = self.temp.get(cell, rank);

        if position < current_x {
            if rank_index == 0 {
                return true;
            }
            let left_cell = rank_array[rank_index - 1];
            let left_limit = self.temp.get(left_cell, rank)
                + model.cell_width(left_cell) / 2.0
                + config.intra_cell_spacing
                + model.cell_width(cell) / 2.0;
            left_limit <= position
        } else if position > current_x {
            if rank_index == rank_array.len() - 1 {
                return true;
            }
            let right_cell = rank_array[rank_index + 1];
            let right_limit = self.temp.get(right_cell, rank)
                - model.cell_width(right_cell) / 2.0
                - config.intra_cell_spacing
                - model.cell_width(cell) / 2.0;
            right_limit >= position
        } else {
            true
        }
    }

    /// Commits the computed geometry through the facade. Vertices go first
    /// since their extents bound the routing channels.
    fn set_cell_locations<G: LayoutGraph>(
        &mut self,
        model: &mut HierarchyModel,
        graph: &mut G,
        config: &LayoutConfig,
    ) {
        for v in model.node_ids() {
            self.set_vertex_location(model, graph, config, v);
        }

        if matches!(
            config.edge_style,
            EdgeStyle::Orthogonal | EdgeStyle::Polyline | EdgeStyle::Curve
        ) {
            self.local_edge_processing(model, config);
        }

        for eid in model.edge_ids() {
            self.set_edge_position(model, graph, config, eid);
        }
    }

    fn set_vertex_location<G: LayoutGraph>(
        &mut self,
        model: &HierarchyModel,
        graph: &mut G,
        config: &LayoutConfig,
        v: NodeId,
    ) {
        let node = model.node(v);
        let rank = node.rank;
        let position_x = self.x.get(CellRef::Node(v), rank) - node.width / 2.0;
        let position_y = self.rank_y[rank] - node.height / 2.0;

        self.rank_top_y[rank] = self.rank_top_y[rank].min(position_y);
        self.rank_bottom_y[rank] = self.rank_bottom_y[rank].max(position_y + node.height);

        if config.orientation.swaps_axes() {
            graph.set_vertex_location(&node.cell, position_y, position_x);
        } else {
            graph.set_vertex_location(&node.cell, position_x, position_y);
        }

        self.limit_x = self.limit_x.max(position_x + node.width);
    }

    /// Separates the x positions of edges as they connect to vertices: each
    /// side of a vertex spreads its incident edges across the available
    /// width, with a small y-offset ladder so jetties do not overlap.
    fn local_edge_processing(&mut self, model: &HierarchyModel, config: &LayoutConfig) {
        for rank_index in 0..model.ranks.len() {
            for &cell in &model.ranks[rank_index] {
                let CellRef::Node(v) = cell else {
                    continue;
                };
                let node = model.node(v);

                // Side 0 faces the next rank (this vertex as edge source),
                // side 1 faces the previous rank.
                for k in 0..2 {
                    let (current_cells, current_rank) = if k == 0 {
                        (
                            model.next_layer_connected_cells(cell, rank_index),
                            rank_index + 1,
                        )
                    } else {
                        (
                            model.previous_layer_connected_cells(cell, rank_index),
                            rank_index.wrapping_sub(1),
                        )
                    };
                    if current_rank >= model.ranks.len() || current_cells.is_empty() {
                        continue;
                    }

                    let mut sorted_cells: Vec<(f64, CellRef)> = current_cells
                        .iter()
                        .map(|&connected| (self.x.get(connected, current_rank), connected))
                        .collect();
                    sorted_cells
                        .sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

                    let mut left_limit = self.x.get(cell, rank_index) - node.width / 2.0;
                    let mut right_limit = left_limit + node.width;

                    let mut connected_edge_count = 0;
                    let mut connected_edges: Vec<EdgeId> = Vec::new();
                    for &(_, inner_cell) in &sorted_cells {
                        match inner_cell {
                            CellRef::Node(other) => {
                                // Find the edges connecting to this neighbor.
                                let connections = if k == 0 {
                                    &node.connects_as_source
                                } else {
                                    &node.connects_as_target
                                };
                                for &eid in connections {
                                    let edge = model.edge(eid);
                                    if edge.source == other || edge.target == other {
                                        connected_edge_count += edge.cells.len().max(1);
                                        connected_edges.push(eid);
                                    }
                                }
                            }
                            CellRef::Edge(eid) => {
                                connected_edge_count += model.edge(eid).cells.len().max(1);
                                connected_edges.push(eid);
                            }
                        }
                    }

                    let required_width = (connected_edge_count + 1) as f64 * config.pref_hoz_edge_sep;
                    // Buffer on the edges of the vertex if the edge count allows.
                    if node.width > required_width + 2.0 * config.pref_hoz_edge_sep {
                        left_limit += config.pref_hoz_edge_sep;
                        right_limit -= config.pref_hoz_edge_sep;
                    }

                    let available_width = right_limit - left_limit;
                    let edge_spacing = available_width / connected_edge_count as f64;

                    let mut current_x = left_limit + edge_spacing / 2.0;
                    let mut current_y_offset = config.min_edge_jetty - config.pref_vert_edge_off;

                    for (group, &eid) in connected_edges.iter().enumerate() {
                        let num_actual_edges = model.edge(eid).cells.len().max(1);
                        let positions = self
                            .jetty_positions
                            .entry(eid)
                            .or_insert_with(|| vec![0.0; 4 * num_actual_edges]);

                        if (group as f64) < connected_edge_count as f64 / 2.0 {
                            current_y_offset += config.pref_vert_edge_off;
                        } else if (group as f64) > connected_edge_count as f64 / 2.0 {
                            current_y_offset -= config.pref_vert_edge_off;
                        }
                        // The equal case is the second of two jettys with the
                        // same y for an even number of edges.

                        for m in 0..num_actual_edges {
                            positions[m * 4 + k * 2] = current_x;
                            current_x += edge_spacing;
                            positions[m * 4 + k * 2 + 1] = current_y_offset;
                        }
                    }
                }
            }
        }
    }

    /// Builds and emits the control points for one hierarchy edge, fanning
    /// parallel real edges out with alternating offsets. Runs once per edge.
    fn set_edge_position<G: LayoutGraph>(
        &mut self,
        model: &mut HierarchyModel,
        graph: &mut G,
        config: &LayoutConfig,
        eid: EdgeId,
    ) {
        if model.edge(eid).routed {
            return;
        }

        let (min_rank, max_rank, reversed, real_edges) = {
            let edge = model.edge(eid);
            (
                edge.min_rank,
                edge.max_rank,
                edge.reversed,
                edge.cells.clone(),
            )
        };
        let cell = CellRef::Edge(eid);
        let jettys = self.jetty_positions.get(&eid).cloned();
        let layout_reversed = config.orientation.flow_reversed();
        let swap_axes = config.orientation.swaps_axes();

        // The inner ranks are walked in the real edge's direction so the
        // output points run from its real source to its real target.
        let mut inner_ranks: Vec<usize> = (min_rank + 1..max_rank).collect();
        if reversed {
            inner_ranks.reverse();
        }

        let mut offset_x = 0.0;
        for (parallel_count, real_edge) in real_edges.iter().enumerate() {
            let mut new_points: Vec<Point> = Vec::new();

            // Jetty where the edge leaves its real source.
            if let Some(jettys) = &jettys {
                let array_offset = if reversed { 2 } else { 0 };
                let y_base = if reversed {
                    if layout_reversed {
                        self.rank_bottom_y[max_rank]
                    } else {
                        self.rank_top_y[max_rank]
                    }
                } else if layout_reversed {
                    self.rank_top_y[min_rank]
                } else {
                    self.rank_bottom_y[min_rank]
                };
                let mut jetty = jettys[parallel_count * 4 + 1 + array_offset];
                if reversed != layout_reversed {
                    jetty = -jetty;
                }
                let y = y_base + jetty;
                let x = jettys[parallel_count * 4 + array_offset];

                if swap_axes {
                    new_points.push(Point { x: y, y: x });
                    if config.edge_style == EdgeStyle::Curve {
                        new_points.push(Point { x: y + jetty, y: x });
                    }
                } else {
                    new_points.push(Point { x, y });
                    if config.edge_style == EdgeStyle::Curve {
                        new_points.push(Point { x, y: y + jetty });
                    }
                }
            }

            // One pair of points per intermediate rank, in the buffer
            // channels above and below it.
            for &rank in &inner_ranks {
                let position_x = self.x.get(cell, rank) + offset_x;
                let mut top_channel_y =
                    (self.rank_bottom_y[rank - 1] + self.rank_top_y[rank]) / 2.0;
                let mut bottom_channel_y =
                    (self.rank_bottom_y[rank] + self.rank_top_y[rank + 1]) / 2.0;
                if reversed {
                    std::mem::swap(&mut top_channel_y, &mut bottom_channel_y);
                }

                if swap_axes {
                    new_points.push(Point {
                        x: top_channel_y,
                        y: position_x,
                    });
                    new_points.push(Point {
                        x: bottom_channel_y,
                        y: position_x,
                    });
                } else {
                    new_points.push(Point {
                        x: position_x,
                        y: top_channel_y,
                    });
                    new_points.push(Point {
                        x: position_x,
                        y: bottom_channel_y,
                    });
                }
                self.limit_x = self.limit_x.max(position_x);
            }

            // Jetty where the edge reaches its real target.
            if let Some(jettys) = &jettys {
                let array_offset = if reversed { 2 } else { 0 };
                let y_base = if reversed {
                    if layout_reversed {
                        self.rank_top_y[min_rank]
                    } else {
                        self.rank_bottom_y[min_rank]
                    }
                } else if layout_reversed {
                    self.rank_bottom_y[max_rank]
                } else {
                    self.rank_top_y[max_rank]
                };
                let mut jetty = jettys[parallel_count * 4 + 3 - array_offset];
                if reversed != layout_reversed {
                    jetty = -jetty;
                }
                let y = y_base - jetty;
                let x = jettys[parallel_count * 4 + 2 - array_offset];

                if swap_axes {
                    if config.edge_style == EdgeStyle::Curve {
                        new_points.push(Point { x: y - jetty, y: x });
                    }
                    new_points.push(Point { x: y, y: x });
                } else {
                    if config.edge_style == EdgeStyle::Curve {
                        new_points.push(Point { x, y: y - jetty });
                    }
                    new_points.push(Point { x, y });
                }
            }

            graph.set_edge_points(real_edge, new_points);

            // Each following parallel edge is drawn next to the last one.
            offset_x = if offset_x == 0.0 {
                config.parallel_edge_spacing
            } else if offset_x > 0.0 {
                -offset_x
            } else {
                -offset_x + config.parallel_edge_spacing
            };
        }

        model.edge_mut(eid).routed = true;
    }
}

/// Priority of a cell from its type and the types of the cells it connects
/// to on the adjacent rank.
fn calculated_weighted_value(current_cell: CellRef, connected: &[CellRef]) -> usize {
    let mut total_weight = 0;
    for &cell in connected {
        match (current_cell, cell) {
            (CellRef::Node(_), CellRef::Node(_)) => total_weight += 1,
            (CellRef::Edge(_), CellRef::Edge(_)) => total_weight += 8,
            _ => total_weight += 2,
        }
    }
    total_weight
}
