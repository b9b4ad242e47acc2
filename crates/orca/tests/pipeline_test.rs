use orca::model::HierarchyModel;
use orca::{pipeline, LayoutConfig, LayoutGraph, Point, Rect};
use std::collections::HashMap;

#[derive(Default)]
struct RecordingGraph {
    bounds: HashMap<String, Rect>,
    locations: HashMap<String, (f64, f64)>,
    points: HashMap<String, Vec<Point>>,
}

impl LayoutGraph for RecordingGraph {
    fn vertex_bounds(&self, vertex: &str) -> Option<Rect> {
        self.bounds.get(vertex).copied()
    }

    fn set_vertex_location(&mut self, vertex: &str, x: f64, y: f64) {
        self.locations.insert(vertex.to_string(), (x, y));
    }

    fn set_edge_points(&mut self, edge: &str, points: Vec<Point>) {
        self.points.insert(edge.to_string(), points);
    }
}

fn diamond_with_back_edge() -> HierarchyModel {
    let mut model = HierarchyModel::new();
    let a = model.add_vertex("a", 0);
    let b = model.add_vertex("b", 1);
    let c = model.add_vertex("c", 1);
    let d = model.add_vertex("d", 2);
    model.add_edge(a, b, vec!["ab".to_string()]);
    model.add_edge(a, c, vec!["ac".to_string()]);
    model.add_edge(b, d, vec!["bd".to_string()]);
    model.add_edge(c, d, vec!["cd".to_string()]);
    model.add_edge(d, a, vec!["da".to_string()]);
    model.fix_ranks();
    model
}

fn diamond_graph() -> RecordingGraph {
    let mut graph = RecordingGraph::default();
    for name in ["a", "b", "c", "d"] {
        graph.bounds.insert(
            name.to_string(),
            Rect {
                x: 0.0,
                y: 0.0,
                width: 60.0,
                height: 30.0,
            },
        );
    }
    graph
}

#[test]
fn the_full_pipeline_lays_out_every_cell() {
    let mut model = diamond_with_back_edge();
    let mut graph = diamond_graph();
    let limit_x = pipeline::run(&mut model, &mut graph, &LayoutConfig::default());

    // Cycle removal left a DAG behind.
    for e in model.edge_ids() {
        let edge = model.edge(e);
        assert!(model.node(edge.source).rank < model.node(edge.target).rank);
    }

    assert_eq!(graph.locations.len(), 4);
    assert_eq!(graph.points.len(), 5);
    assert!(limit_x > 0.0);
}

#[test]
fn identical_inputs_produce_identical_layouts() {
    let mut first_graph = diamond_graph();
    let mut second_graph = diamond_graph();

    let mut first_model = diamond_with_back_edge();
    let mut second_model = diamond_with_back_edge();

    pipeline::run(&mut first_model, &mut first_graph, &LayoutConfig::default());
    pipeline::run(&mut second_model, &mut second_graph, &LayoutConfig::default());

    assert_eq!(first_graph.locations, second_graph.locations);
    assert_eq!(first_graph.points, second_graph.points);
}

#[test]
fn the_swimlane_pipeline_reverses_lane_backward_edges() {
    let mut model = HierarchyModel::new();
    let a = model.add_vertex("a", 0);
    let b = model.add_vertex("b", 1);
    model.set_swimlane(a, 1);
    model.set_swimlane(b, 0);
    let e = model.add_edge(a, b, vec!["ab".to_string()]);
    model.fix_ranks();

    let mut graph = RecordingGraph::default();
    for name in ["a", "b"] {
        graph.bounds.insert(
            name.to_string(),
            Rect {
                x: 0.0,
                y: 0.0,
                width: 60.0,
                height: 30.0,
            },
        );
    }
    pipeline::run_swimlane(&mut model, &mut graph, &LayoutConfig::default());

    assert!(model.edge(e).reversed);
    assert_eq!(graph.locations.len(), 2);
    assert_eq!(graph.points.len(), 1);
}
