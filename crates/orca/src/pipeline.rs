//! Stage sequencing helpers.
//!
//! The embedding driver owns layer assignment and the final copy into its
//! diagram model; these helpers only chain the core stages in their required
//! order on an already rank-populated model.

use crate::config::LayoutConfig;
use crate::coordinate_assignment;
use crate::crossing_reduction;
use crate::cycle_remover;
use crate::facade::LayoutGraph;
use crate::model::HierarchyModel;
use crate::swimlane_ordering;

/// Cycle removal, crossing reduction and coordinate assignment, in order.
/// Returns the maximum x extent of the drawing.
pub fn run<G: LayoutGraph>(
    model: &mut HierarchyModel,
    graph: &mut G,
    config: &LayoutConfig,
) -> f64 {
    cycle_remover::run(model);
    crossing_reduction::run(model, config);
    coordinate_assignment::run(model, graph, config)
}

/// The swimlane variant: lane-aware cycle removal instead of the plain one.
pub fn run_swimlane<G: LayoutGraph>(
    model: &mut HierarchyModel,
    graph: &mut G,
    config: &LayoutConfig,
) -> f64 {
    swimlane_ordering::run(model);
    crossing_reduction::run(model, config);
    coordinate_assignment::run(model, graph, config)
}
