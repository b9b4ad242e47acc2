//! Internal hierarchy model shared by all layout stages.
//!
//! Nodes and edges are arena-allocated and addressed by integer ids; stages
//! keep their per-cell scratch in [`CellValues`] tables indexed by the same
//! ids instead of hanging temporary fields off shared cells.

/// Index of a node in the model arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of an edge in the model arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A rank occupant: either a node or the virtual segment of an edge that
/// spans the rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellRef {
    Node(NodeId),
    Edge(EdgeId),
}

/// Wrapper around one of the caller's vertices.
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    /// The caller's vertex key, echoed back through the facade.
    pub cell: String,
    /// The rank assigned by the upstream layering step. Fixed for the whole
    /// layout run; only the within-rank position changes.
    pub rank: usize,
    /// Swimlane index, when laying out with [`crate::swimlane_ordering`].
    pub swimlane: Option<usize>,
    pub width: f64,
    pub height: f64,
    /// Edges that leave this node.
    pub connects_as_source: Vec<EdgeId>,
    /// Edges that arrive at this node.
    pub connects_as_target: Vec<EdgeId>,
}

/// Wrapper around one or more parallel real edges between the same pair of
/// vertices.
#[derive(Debug, Clone)]
pub struct HierarchyEdge {
    /// The caller's edge keys. Parallel edges are collapsed into one wrapper
    /// and fanned back out during routing.
    pub cells: Vec<String>,
    pub source: NodeId,
    pub target: NodeId,
    /// First rank the edge touches (the source's rank once directions are
    /// normalized).
    pub min_rank: usize,
    /// Last rank the edge touches.
    pub max_rank: usize,
    /// Set when the edge direction was flipped to make the rank graph
    /// acyclic. Output points are emitted in the real edge's direction.
    pub reversed: bool,
    /// Set once the edge's control points have been emitted.
    pub routed: bool,
    /// Width of the virtual segments, from the parallel edge count.
    pub width: f64,
}

impl HierarchyEdge {
    /// Number of intermediate ranks the edge crosses.
    pub fn span_len(&self) -> usize {
        (self.max_rank - self.min_rank).saturating_sub(1)
    }
}

/// The mutable hierarchy every stage operates on.
///
/// The caller builds it from an already rank-assigned graph, runs the stages
/// in order and copies the results back through the facade. Within-rank order
/// in `ranks` is the only ordering stages are allowed to change.
#[derive(Debug, Default)]
pub struct HierarchyModel {
    nodes: Vec<HierarchyNode>,
    edges: Vec<HierarchyEdge>,
    /// One entry per rank, rank 0 first; each holds the rank's nodes and the
    /// virtual segments of edges spanning it, in within-rank order.
    pub ranks: Vec<Vec<CellRef>>,
    /// DFS start nodes for the cycle stages. Filled with the model's sources
    /// by [`HierarchyModel::fix_ranks`] when the caller leaves it empty.
    pub roots: Vec<NodeId>,
}

impl HierarchyModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a wrapper for a real vertex on the given rank.
    pub fn add_vertex(&mut self, cell: impl Into<String>, rank: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(HierarchyNode {
            cell: cell.into(),
            rank,
            swimlane: None,
            width: 0.0,
            height: 0.0,
            connects_as_source: Vec::new(),
            connects_as_target: Vec::new(),
        });
        id
    }

    pub fn set_swimlane(&mut self, node: NodeId, lane: usize) {
        self.nodes[node.0].swimlane = Some(lane);
    }

    /// Adds a wrapper collapsing the given parallel real edges.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, cells: Vec<String>) -> EdgeId {
        let id = EdgeId(self.edges.len());
        let source_rank = self.nodes[source.0].rank;
        let target_rank = self.nodes[target.0].rank;
        self.edges.push(HierarchyEdge {
            cells,
            source,
            target,
            min_rank: source_rank.min(target_rank),
            max_rank: source_rank.max(target_rank),
            reversed: false,
            routed: false,
            width: 0.0,
        });
        self.nodes[source.0].connects_as_source.push(id);
        self.nodes[target.0].connects_as_target.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut HierarchyNode {
        &mut self.nodes[id.0]
    }

    pub fn edge(&self, id: EdgeId) -> &HierarchyEdge {
        &self.edges[id.0]
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> &mut HierarchyEdge {
        &mut self.edges[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + use<> {
        (0..self.edges.len()).map(EdgeId)
    }

    /// Highest rank index; 0 for an empty model.
    pub fn max_rank(&self) -> usize {
        self.ranks.len().saturating_sub(1)
    }

    /// Rebuilds the rank lists from the per-node rank assignments.
    ///
    /// Every node lands in its rank, every edge records its span and drops a
    /// virtual segment into each intermediate rank. Initial within-rank order
    /// is insertion order; when no roots were set, the model's sources become
    /// the DFS roots.
    pub fn fix_ranks(&mut self) {
        let Some(max_rank) = self.nodes.iter().map(|n| n.rank).max() else {
            self.ranks = Vec::new();
            return;
        };
        self.ranks = vec![Vec::new(); max_rank + 1];

        for (i, node) in self.nodes.iter().enumerate() {
            self.ranks[node.rank].push(CellRef::Node(NodeId(i)));
        }

        for (i, edge) in self.edges.iter_mut().enumerate() {
            let source_rank = self.nodes[edge.source.0].rank;
            let target_rank = self.nodes[edge.target.0].rank;
            edge.min_rank = source_rank.min(target_rank);
            edge.max_rank = source_rank.max(target_rank);
            for rank in edge.min_rank + 1..edge.max_rank {
                self.ranks[rank].push(CellRef::Edge(EdgeId(i)));
            }
        }

        if self.roots.is_empty() {
            self.roots = self
                .node_ids()
                .filter(|&v| self.nodes[v.0].connects_as_target.is_empty())
                .collect();
        }
    }

    /// Flips an edge's direction, toggling its reversed flag and moving it
    /// between both endpoints' adjacency lists.
    pub fn invert_edge(&mut self, id: EdgeId) {
        let (old_source, old_target) = {
            let e = &self.edges[id.0];
            (e.source, e.target)
        };

        detach(&mut self.nodes[old_source.0].connects_as_source, id);
        self.nodes[old_source.0].connects_as_target.push(id);
        detach(&mut self.nodes[old_target.0].connects_as_target, id);
        self.nodes[old_target.0].connects_as_source.push(id);

        let e = &mut self.edges[id.0];
        e.source = old_target;
        e.target = old_source;
        e.reversed = !e.reversed;
    }

    /// Width of a rank occupant (vertex width or virtual segment width).
    pub fn cell_width(&self, cell: CellRef) -> f64 {
        match cell {
            CellRef::Node(v) => self.nodes[v.0].width,
            CellRef::Edge(e) => self.edges[e.0].width,
        }
    }

    /// The cells `cell` connects to on the rank below (`layer + 1`).
    ///
    /// For a node these come from its outgoing edges: the target node when
    /// the edge reaches it directly, otherwise the edge's virtual segment.
    /// For a virtual segment it is the next segment of the same edge, or the
    /// target node at the end of the span.
    pub fn next_layer_connected_cells(&self, cell: CellRef, layer: usize) -> Vec<CellRef> {
        match cell {
            CellRef::Node(v) => self.nodes[v.0]
                .connects_as_source
                .iter()
                .map(|&eid| {
                    let e = &self.edges[eid.0];
                    if e.max_rank <= layer + 1 {
                        CellRef::Node(e.target)
                    } else {
                        CellRef::Edge(eid)
                    }
                })
                .collect(),
            CellRef::Edge(eid) => {
                let e = &self.edges[eid.0];
                if layer + 1 == e.max_rank {
                    vec![CellRef::Node(e.target)]
                } else {
                    vec![CellRef::Edge(eid)]
                }
            }
        }
    }

    /// The cells `cell` connects to on the rank above (`layer - 1`).
    pub fn previous_layer_connected_cells(&self, cell: CellRef, layer: usize) -> Vec<CellRef> {
        match cell {
            CellRef::Node(v) => self.nodes[v.0]
                .connects_as_target
                .iter()
                .map(|&eid| {
                    let e = &self.edges[eid.0];
                    if e.min_rank + 1 >= layer {
                        CellRef::Node(e.source)
                    } else {
                        CellRef::Edge(eid)
                    }
                })
                .collect(),
            CellRef::Edge(eid) => {
                let e = &self.edges[eid.0];
                if layer <= e.min_rank + 1 {
                    vec![CellRef::Node(e.source)]
                } else {
                    vec![CellRef::Edge(eid)]
                }
            }
        }
    }
}

fn detach(list: &mut Vec<EdgeId>, id: EdgeId) {
    if let Some(pos) = list.iter().position(|&e| e == id) {
        list.remove(pos);
    }
}

/// Per-stage scratch values addressed by `(cell, rank)`.
///
/// A node owns one slot; an edge owns one slot per intermediate rank it
/// spans. Sized against the model at construction, so it must be rebuilt
/// after `fix_ranks` changes spans.
#[derive(Debug, Clone)]
pub struct CellValues<T> {
    nodes: Vec<T>,
    edges: Vec<EdgeSlots<T>>,
}

#[derive(Debug, Clone)]
struct EdgeSlots<T> {
    first_rank: usize,
    values: Vec<T>,
}

impl<T: Clone> CellValues<T> {
    pub fn new(model: &HierarchyModel, init: T) -> Self {
        Self {
            nodes: vec![init.clone(); model.node_count()],
            edges: model
                .edge_ids()
                .map(|eid| {
                    let e = model.edge(eid);
                    EdgeSlots {
                        first_rank: e.min_rank + 1,
                        values: vec![init.clone(); e.span_len()],
                    }
                })
                .collect(),
        }
    }

    pub fn set(&mut self, cell: CellRef, layer: usize, value: T) {
        match cell {
            CellRef::Node(v) => self.nodes[v.0] = value,
            CellRef::Edge(e) => {
                let slots = &mut self.edges[e.0];
                slots.values[layer - slots.first_rank] = value;
            }
        }
    }
}

impl<T: Copy> CellValues<T> {
    pub fn get(&self, cell: CellRef, layer: usize) -> T {
        match cell {
            CellRef::Node(v) => self.nodes[v.0],
            CellRef::Edge(e) => {
                let slots = &self.edges[e.0];
                slots.values[layer - slots.first_rank]
            }
        }
    }
}
