//! Layout configuration.
//!
//! One immutable [`LayoutConfig`] is passed by reference into every stage.
//! The string parsers exist for callers that surface the knobs as loosely
//! typed options; they are the only fallible part of the crate.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Where the root rank sits relative to the rest of the drawing.
///
/// Positions are computed in a canonical north frame (rank 0 on top, y
/// growing downwards) and axis-swapped on output for east/west.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    North,
    South,
    East,
    West,
}

impl Orientation {
    /// East/west layouts swap x and y (and vertex width/height) on the way
    /// in and out.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Orientation::East | Orientation::West)
    }

    /// South/east layouts grow towards negative y in the canonical frame.
    pub fn flow_reversed(self) -> bool {
        matches!(self, Orientation::South | Orientation::East)
    }
}

impl FromStr for Orientation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Orientation::North),
            "south" | "s" => Ok(Orientation::South),
            "east" | "e" => Ok(Orientation::East),
            "west" | "w" => Ok(Orientation::West),
            _ => Err(ConfigError::UnknownOrientation(s.to_string())),
        }
    }
}

/// How edges are routed between ranks.
///
/// Anything other than `None` enables jetty placement and channel routing;
/// `Curve` additionally doubles up the jetty control points so renderers can
/// spline through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EdgeStyle {
    Orthogonal,
    #[default]
    Polyline,
    Curve,
    None,
}

impl FromStr for EdgeStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "orthogonal" => Ok(EdgeStyle::Orthogonal),
            "polyline" => Ok(EdgeStyle::Polyline),
            "curve" => Ok(EdgeStyle::Curve),
            "none" => Ok(EdgeStyle::None),
            _ => Err(ConfigError::UnknownEdgeStyle(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown orientation `{0}`, expected north, south, east or west")]
    UnknownOrientation(String),
    #[error("unknown edge style `{0}`, expected orthogonal, polyline, curve or none")]
    UnknownEdgeStyle(String),
}

/// Tunables for the layout stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub orientation: Orientation,
    /// The minimum buffer between cells on the same rank. Default is 30.
    pub intra_cell_spacing: f64,
    /// The minimum distance between cells on adjacent ranks. Default is 100.
    pub inter_rank_cell_spacing: f64,
    /// The distance between each parallel edge on each rank for long edges.
    /// Default is 10.
    pub parallel_edge_spacing: f64,
    /// The preferred horizontal distance between edges exiting a vertex.
    /// Default is 5.
    pub pref_hoz_edge_sep: f64,
    /// The preferred vertical offset between edges exiting a vertex.
    /// Default is 2.
    pub pref_vert_edge_off: f64,
    /// The minimum distance for an edge jetty from a vertex. Default is 12.
    pub min_edge_jetty: f64,
    /// The size of the buffer in the center of inter-rank channels where
    /// edge control points should not be placed. Default is 4.
    pub channel_buffer: f64,
    /// Padding added to resized parent groups by the caller. Default is 10.
    pub group_padding: f64,
    /// The leftmost coordinate node placement starts at. Default is 0.
    pub initial_x: f64,
    /// Whether to run the iterative placement refinements. Default is true.
    pub fine_tuning: bool,
    /// The maximum number of iterations whilst reducing edge crossings.
    /// Default is 24.
    pub max_crossing_iterations: usize,
    /// The number of placement refinement iterations to run. Default is 8.
    pub max_placement_iterations: usize,
    pub edge_style: EdgeStyle,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::North,
            intra_cell_spacing: 30.0,
            inter_rank_cell_spacing: 100.0,
            parallel_edge_spacing: 10.0,
            pref_hoz_edge_sep: 5.0,
            pref_vert_edge_off: 2.0,
            min_edge_jetty: 12.0,
            channel_buffer: 4.0,
            group_padding: 10.0,
            initial_x: 0.0,
            fine_tuning: true,
            max_crossing_iterations: 24,
            max_placement_iterations: 8,
            edge_style: EdgeStyle::Polyline,
        }
    }
}
