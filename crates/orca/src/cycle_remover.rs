//! Edge-direction normalization.
//!
//! A depth-first search from the model roots inverts every edge that closes
//! a cycle back to a node on the current search path, so the rank graph is a
//! DAG for the remaining stages. A second sweep covers components the roots
//! cannot reach. Running the stage again on an already processed model
//! performs no further inversions.

use crate::model::{HierarchyModel, NodeId};

pub fn run(model: &mut HierarchyModel) {
    let mut visited = vec![false; model.node_count()];
    let mut on_path = vec![false; model.node_count()];

    let roots: Vec<NodeId> = model.roots.clone();
    for root in roots {
        dfs(model, root, &mut visited, &mut on_path);
    }

    // Nodes the roots cannot reach still need their cycles broken.
    for v in model.node_ids() {
        if !visited[v.index()] {
            dfs(model, v, &mut visited, &mut on_path);
        }
    }
}

fn dfs(model: &mut HierarchyModel, v: NodeId, visited: &mut [bool], on_path: &mut [bool]) {
    if visited[v.index()] {
        return;
    }
    visited[v.index()] = true;
    on_path[v.index()] = true;

    let outgoing = model.node(v).connects_as_source.clone();
    for eid in outgoing {
        let target = model.edge(eid).target;
        if on_path[target.index()] {
            model.invert_edge(eid);
        } else {
            dfs(model, target, visited, on_path);
        }
    }

    on_path[v.index()] = false;
}
