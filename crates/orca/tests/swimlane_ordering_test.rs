use orca::model::HierarchyModel;
use orca::swimlane_ordering;

#[test]
fn forward_lane_edges_are_kept() {
    let mut model = HierarchyModel::new();
    let a = model.add_vertex("a", 0);
    let b = model.add_vertex("b", 1);
    model.set_swimlane(a, 0);
    model.set_swimlane(b, 1);
    model.add_edge(a, b, vec!["ab".to_string()]);
    model.fix_ranks();

    swimlane_ordering::run(&mut model);
    assert!(model.edge_ids().all(|e| !model.edge(e).reversed));
}

#[test]
fn lane_backward_edges_are_inverted() {
    let mut model = HierarchyModel::new();
    let a = model.add_vertex("a", 0);
    let b = model.add_vertex("b", 1);
    model.set_swimlane(a, 1);
    model.set_swimlane(b, 0);
    let e = model.add_edge(a, b, vec!["ab".to_string()]);
    model.fix_ranks();

    swimlane_ordering::run(&mut model);

    assert!(model.edge(e).reversed);
    assert_eq!(model.edge(e).source, b);
    assert_eq!(model.edge(e).target, a);
}

#[test]
fn cycle_within_one_lane_is_broken() {
    let mut model = HierarchyModel::new();
    let a = model.add_vertex("a", 0);
    let b = model.add_vertex("b", 1);
    let c = model.add_vertex("c", 2);
    for v in [a, b, c] {
        model.set_swimlane(v, 0);
    }
    model.add_edge(a, b, vec!["ab".to_string()]);
    model.add_edge(b, c, vec!["bc".to_string()]);
    let back = model.add_edge(c, a, vec!["ca".to_string()]);
    model.roots = vec![a];
    model.fix_ranks();

    swimlane_ordering::run(&mut model);

    assert!(model.edge(back).reversed);
    assert_eq!(model.edge(back).source, a);
    assert!(model.edge_ids().filter(|&e| model.edge(e).reversed).count() == 1);
}

#[test]
fn cross_lane_cycles_are_broken_by_the_lane_rule() {
    let mut model = HierarchyModel::new();
    let a = model.add_vertex("a", 0);
    let b = model.add_vertex("b", 1);
    model.set_swimlane(a, 0);
    model.set_swimlane(b, 1);
    model.add_edge(a, b, vec!["ab".to_string()]);
    let back = model.add_edge(b, a, vec!["ba".to_string()]);
    model.roots = vec![a];
    model.fix_ranks();

    swimlane_ordering::run(&mut model);

    assert!(model.edge(back).reversed);
    assert_eq!(model.edge(back).source, a);
    assert_eq!(model.edge(back).target, b);
}

#[test]
fn nodes_without_a_lane_count_as_lane_zero() {
    let mut model = HierarchyModel::new();
    let a = model.add_vertex("a", 0);
    let b = model.add_vertex("b", 1);
    model.set_swimlane(a, 1);
    // b has no lane assigned, so the edge runs from lane 1 back to lane 0.
    let e = model.add_edge(a, b, vec!["ab".to_string()]);
    model.fix_ranks();

    swimlane_ordering::run(&mut model);
    assert!(model.edge(e).reversed);
}
