use orca::crossing_reduction::{self, count_crossings};
use orca::model::{CellRef, HierarchyModel, NodeId};
use orca::LayoutConfig;

fn rank_sets(model: &HierarchyModel) -> Vec<Vec<CellRef>> {
    model
        .ranks
        .iter()
        .map(|rank| {
            let mut cells = rank.clone();
            cells.sort();
            cells
        })
        .collect()
}

#[test]
fn a_single_crossing_pair_is_untangled() {
    let mut model = HierarchyModel::new();
    let a = model.add_vertex("a", 0);
    let b = model.add_vertex("b", 0);
    let x = model.add_vertex("x", 1);
    let y = model.add_vertex("y", 1);
    model.add_edge(a, y, vec!["ay".to_string()]);
    model.add_edge(b, x, vec!["bx".to_string()]);
    model.fix_ranks();

    assert_eq!(count_crossings(&model), 1);
    crossing_reduction::run(&mut model, &LayoutConfig::default());
    assert_eq!(count_crossings(&model), 0);
}

#[test]
fn rank_membership_is_never_changed() {
    let mut model = HierarchyModel::new();
    let mut upper: Vec<NodeId> = Vec::new();
    let mut lower: Vec<NodeId> = Vec::new();
    for i in 0..4 {
        upper.push(model.add_vertex(format!("u{i}"), 0));
        lower.push(model.add_vertex(format!("l{i}"), 1));
    }
    for i in 0..4 {
        model.add_edge(
            upper[i],
            lower[3 - i],
            vec![format!("e{i}")],
        );
    }
    model.fix_ranks();
    let before = rank_sets(&model);

    crossing_reduction::run(&mut model, &LayoutConfig::default());
    assert_eq!(rank_sets(&model), before);
}

#[test]
fn a_reversed_bipartite_matching_reaches_zero_crossings() {
    let mut model = HierarchyModel::new();
    let mut upper: Vec<NodeId> = Vec::new();
    let mut lower: Vec<NodeId> = Vec::new();
    for i in 0..4 {
        upper.push(model.add_vertex(format!("u{i}"), 0));
        lower.push(model.add_vertex(format!("l{i}"), 1));
    }
    for i in 0..4 {
        model.add_edge(
            upper[i],
            lower[3 - i],
            vec![format!("e{i}")],
        );
    }
    model.fix_ranks();

    assert_eq!(count_crossings(&model), 6);
    crossing_reduction::run(&mut model, &LayoutConfig::default());
    assert_eq!(count_crossings(&model), 0);
}

#[test]
fn two_siblings_on_one_target_stay_put() {
    let mut model = HierarchyModel::new();
    let a = model.add_vertex("a", 0);
    let b = model.add_vertex("b", 0);
    let t = model.add_vertex("t", 1);
    model.add_edge(a, t, vec!["at".to_string()]);
    model.add_edge(b, t, vec!["bt".to_string()]);
    model.fix_ranks();
    let before = model.ranks.clone();

    crossing_reduction::run(&mut model, &LayoutConfig::default());
    assert_eq!(count_crossings(&model), 0);
    assert_eq!(model.ranks, before);
}

#[test]
fn long_edge_segments_take_part_in_the_ordering() {
    let mut model = HierarchyModel::new();
    let a = model.add_vertex("a", 0);
    let b = model.add_vertex("b", 0);
    let d = model.add_vertex("d", 1);
    let c = model.add_vertex("c", 2);
    let e = model.add_vertex("e", 2);
    model.add_edge(a, c, vec!["ac".to_string()]);
    model.add_edge(b, d, vec!["bd".to_string()]);
    model.add_edge(d, e, vec!["de".to_string()]);
    model.fix_ranks();

    assert_eq!(count_crossings(&model), 2);
    crossing_reduction::run(&mut model, &LayoutConfig::default());
    assert_eq!(count_crossings(&model), 0);
}

#[test]
fn committed_crossings_never_increase() {
    let mut model = HierarchyModel::new();
    let mut upper: Vec<NodeId> = Vec::new();
    let mut lower: Vec<NodeId> = Vec::new();
    for i in 0..6 {
        upper.push(model.add_vertex(format!("u{i}"), 0));
        lower.push(model.add_vertex(format!("l{i}"), 1));
    }
    // A deterministic scramble with plenty of crossings.
    let targets = [2usize, 5, 0, 4, 1, 3];
    for i in 0..6 {
        model.add_edge(upper[i], lower[targets[i]], vec![format!("e{i}")]);
    }
    model.fix_ranks();
    let before = count_crossings(&model);

    crossing_reduction::run(&mut model, &LayoutConfig::default());
    assert!(count_crossings(&model) <= before);
}
