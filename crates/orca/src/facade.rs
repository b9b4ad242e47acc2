//! Boundary between the layout core and the embedding diagram model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Implemented by the layout driver that owns the real diagram.
///
/// Coordinate assignment reads vertex geometry through this trait and writes
/// the finished layout back through it; nothing else leaves the core.
pub trait LayoutGraph {
    /// Geometry of a real vertex. `None` is tolerated: the vertex is laid
    /// out with zero size and a warning is logged.
    fn vertex_bounds(&self, vertex: &str) -> Option<Rect>;

    /// Receives the final top-left corner of a vertex. Called once per
    /// vertex per layout run.
    fn set_vertex_location(&mut self, vertex: &str, x: f64, y: f64);

    /// Receives the ordered control points of a real edge, from its real
    /// source towards its real target. Called once per real edge per layout
    /// run.
    fn set_edge_points(&mut self, edge: &str, points: Vec<Point>);
}
