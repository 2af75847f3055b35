use opgraph_core::{
    graph::Graph,
    id::{IdGenerator, NodeId},
    node::Node,
    op::Op,
    sample,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

fn adjacency(g: &Graph) -> Vec<(usize, Vec<usize>)> {
    g.node_ids()
        .map(|id| {
            let dsts = g.successor_ids(id).unwrap();
            (id.index(), dsts.iter().map(|d| d.index()).collect())
        })
        .collect()
}

fn edges(g: &Graph) -> Vec<String> {
    g.edge_labels()
        .map(|(from, to)| format!("{from} -> {to}"))
        .collect()
}

#[test]
fn fork_adjacency() {
    let g = sample::fork(&IdGenerator::new()).unwrap();
    assert_eq!(
        adjacency(&g),
        vec![(0, vec![1, 2]), (1, vec![2]), (2, vec![])]
    );
    assert_eq!(
        g.to_string(),
        "Node:0, Node:1, Node:2\n\nNode:0 -> Node:1, Node:2\nNode:1 -> Node:2\nNode:2 -> \n"
    );
}

#[test]
fn add_sequence_builds_a_single_chain() {
    let ids = IdGenerator::new();
    let nodes = (0..5)
        .map(|_| Node::new_in(Op::Generic, &ids))
        .collect::<Vec<_>>();
    let created = nodes.iter().map(Node::id).collect::<Vec<_>>();

    let mut g = Graph::new();
    let chained = g.add_sequence(nodes).unwrap();
    assert_eq!(chained, created);
    assert_eq!(g.edge_count(), 4);
    insta::assert_debug_snapshot!(edges(&g), @r###"
    [
        "Node:0 -> Node:1",
        "Node:1 -> Node:2",
        "Node:2 -> Node:3",
        "Node:3 -> Node:4",
    ]
    "###);
}

#[test]
fn chain_sample_matches_add_sequence() {
    let g = sample::chain(&IdGenerator::new()).unwrap();
    assert_eq!(g.len(), 5);
    assert_eq!(
        adjacency(&g),
        vec![
            (0, vec![1]),
            (1, vec![2]),
            (2, vec![3]),
            (3, vec![4]),
            (4, vec![])
        ]
    );
}

#[test]
fn diamond_joins_both_chains() {
    let g = sample::diamond(&IdGenerator::new()).unwrap();
    assert_eq!(g.len(), 8);
    assert_eq!(
        adjacency(&g),
        vec![
            (0, vec![1, 4]),
            (1, vec![2]),
            (2, vec![3]),
            (3, vec![7]),
            (4, vec![5]),
            (5, vec![6]),
            (6, vec![7]),
            (7, vec![])
        ]
    );
}

#[test]
fn hourglass_links_all_pairs() {
    let g = sample::hourglass(&IdGenerator::new()).unwrap();
    insta::assert_debug_snapshot!(edges(&g), @r###"
    [
        "Node:0 -> Node:3",
        "Node:1 -> Node:3",
        "Node:2 -> Node:3",
        "Node:3 -> Node:4",
        "Node:3 -> Node:5",
        "Node:3 -> Node:6",
    ]
    "###);
}

fn shortest_path(g: &Graph, from: NodeId, to: NodeId) -> Option<usize> {
    let mut dist = FxHashMap::default();
    let mut que = VecDeque::from([from]);
    dist.insert(from, 0);
    while let Some(id) = que.pop_front() {
        let d = dist[&id];
        if id == to {
            return Some(d);
        }
        for &next in g.successor_ids(id).unwrap() {
            dist.entry(next).or_insert_with(|| {
                que.push_back(next);
                d + 1
            });
        }
    }
    None
}

#[test]
fn inception_forks_and_joins() {
    let g = sample::inception(&IdGenerator::new()).unwrap();
    let ids = g.node_ids().collect::<Vec<_>>();
    let (fork, join) = (ids[0], ids[ids.len() - 1]);

    assert_eq!(g.len(), 15);
    assert_eq!(g[fork].op, Op::MaxPool);
    assert_eq!(g[join].op, Op::Concat);

    let cross = g
        .edges()
        .filter(|(from, to)| from.id() == fork || to.id() == join)
        .count();
    assert_eq!(cross, 8);
    // Chains of 2, 4, 4 and 3 operators.
    assert_eq!(g.edge_count(), 8 + 1 + 3 + 3 + 2);

    assert!(!g.successor_ids(fork).unwrap().contains(&join));
    assert!(shortest_path(&g, fork, join).unwrap() >= 2);

    let starts = g
        .successors(fork)
        .unwrap()
        .into_iter()
        .map(Node::label)
        .collect::<Vec<_>>();
    assert_eq!(starts, vec!["Conv:1", "Conv:3", "Conv:7", "Maxpool:11"]);
}

#[test]
fn inception_display() {
    let g = sample::inception(&IdGenerator::new()).unwrap();
    let text = g.to_string();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some(
            "Maxpool:0, Conv:1, Relu:2, Conv:3, Relu:4, Conv:5, Relu:6, Conv:7, Relu:8, \
             Conv:9, Relu:10, Maxpool:11, Conv:12, Relu:13, Concat:14"
        )
    );
    assert_eq!(lines.next(), Some(""));
    assert_eq!(
        lines.next(),
        Some("Maxpool:0 -> Conv:1, Conv:3, Conv:7, Maxpool:11")
    );
    assert_eq!(text.lines().count(), 2 + 15);
}

#[test]
fn samples_on_one_generator_never_share_ids() {
    let ids = IdGenerator::new();
    let mut seen = FxHashSet::default();
    for s in sample::SAMPLES {
        let g = (s.build)(&ids).unwrap();
        for id in g.node_ids() {
            assert!(seen.insert(id), "{id} reused by {}", s.name);
        }
    }
}
