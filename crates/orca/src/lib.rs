//! Hierarchical (Sugiyama-style) graph layout stages.
//!
//! Port of maxGraph's hierarchical layout pipeline: cycle removal, swimlane
//! ordering, median-hybrid crossing reduction and coordinate assignment.
//! Layer assignment and rendering stay with the embedding application; this
//! crate is a pure in-memory computation over a [`model::HierarchyModel`]
//! built from an already rank-assigned graph.
//!
//! ```
//! use orca::{LayoutConfig, LayoutGraph, Point, Rect, pipeline};
//! use orca::model::HierarchyModel;
//!
//! struct Diagram; // the embedding application's graph
//!
//! impl LayoutGraph for Diagram {
//!     fn vertex_bounds(&self, _vertex: &str) -> Option<Rect> {
//!         Some(Rect { x: 0.0, y: 0.0, width: 80.0, height: 40.0 })
//!     }
//!     fn set_vertex_location(&mut self, _vertex: &str, _x: f64, _y: f64) {}
//!     fn set_edge_points(&mut self, _edge: &str, _points: Vec<Point>) {}
//! }
//!
//! let mut model = HierarchyModel::new();
//! let a = model.add_vertex("a", 0);
//! let b = model.add_vertex("b", 1);
//! model.add_edge(a, b, vec!["a->b".to_string()]);
//! model.fix_ranks();
//!
//! let mut diagram = Diagram;
//! pipeline::run(&mut model, &mut diagram, &LayoutConfig::default());
//! ```

pub mod config;
pub mod coordinate_assignment;
pub mod crossing_reduction;
pub mod cycle_remover;
pub mod facade;
pub mod model;
pub mod pipeline;
pub mod swimlane_ordering;

pub use config::{ConfigError, EdgeStyle, LayoutConfig, Orientation};
pub use facade::{LayoutGraph, Point, Rect};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
