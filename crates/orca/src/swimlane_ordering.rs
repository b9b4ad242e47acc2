//! Cycle breaking for swimlane layouts.
//!
//! Same contract as [`crate::cycle_remover`], with two inversion rules
//! checked while walking the undirected adjacency from the roots:
//!
//! 1. an outgoing edge whose endpoint is already on the current search path
//!    is inverted, but only when both endpoints share a lane (ancestry is
//!    meaningful only within one lane);
//! 2. an edge stored running out of the visited endpoint back into an
//!    earlier lane crosses the lanes backward and is inverted.
//!
//! Nodes without a lane assignment count as lane 0.

use crate::model::{EdgeId, HierarchyModel, NodeId};

pub fn run(model: &mut HierarchyModel) {
    let mut visited = vec![false; model.node_count()];
    let mut on_path = vec![false; model.node_count()];

    let roots: Vec<NodeId> = model.roots.clone();
    for root in roots {
        dfs(model, root, &mut visited, &mut on_path);
    }
}

fn lane(model: &HierarchyModel, v: NodeId) -> usize {
    model.node(v).swimlane.unwrap_or(0)
}

fn dfs(model: &mut HierarchyModel, v: NodeId, visited: &mut [bool], on_path: &mut [bool]) {
    if visited[v.index()] {
        return;
    }
    visited[v.index()] = true;
    on_path[v.index()] = true;

    let mut incident: Vec<EdgeId> = model.node(v).connects_as_source.clone();
    incident.extend_from_slice(&model.node(v).connects_as_target);

    for eid in incident {
        let edge = model.edge(eid);
        let (source, target) = (edge.source, edge.target);
        let other = if source == v { target } else { source };

        let is_ancestor =
            source == v && lane(model, v) == lane(model, other) && on_path[other.index()];
        let reversed_over_lane = source == other && lane(model, v) < lane(model, other);

        if is_ancestor || reversed_over_lane {
            model.invert_edge(eid);
        }

        if !visited[other.index()] {
            dfs(model, other, visited, on_path);
        }
    }

    on_path[v.index()] = false;
}
