//! Hand-written graphs used to smoke-test graph construction.

use thiserror::Error;

use crate::{
    graph::{Graph, GraphError},
    id::IdGenerator,
    node::Node,
    op::Op,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("Unknown sample {index}: expected a number between 1 and {count}")]
    OutOfRange { index: usize, count: usize },
}

pub struct Sample {
    pub name: &'static str,
    pub description: &'static str,
    pub build: fn(&IdGenerator) -> Result<Graph, GraphError>,
}

pub const SAMPLES: &[Sample] = &[
    Sample {
        name: "fork",
        description: "a -> b, a -> c, b -> c",
        build: fork,
    },
    Sample {
        name: "chain",
        description: "five nodes linked in a row",
        build: chain,
    },
    Sample {
        name: "diamond",
        description: "one source, two three-node chains, one sink",
        build: diamond,
    },
    Sample {
        name: "hourglass",
        description: "three nodes into one, one into three",
        build: hourglass,
    },
    Sample {
        name: "inception",
        description: "first inception block of GoogLeNet",
        build: inception,
    },
];

/// Looks a sample up by its 1-based position in [`SAMPLES`].
pub fn get(index: usize) -> Result<&'static Sample, SampleError> {
    index
        .checked_sub(1)
        .and_then(|i| SAMPLES.get(i))
        .ok_or(SampleError::OutOfRange {
            index,
            count: SAMPLES.len(),
        })
}

fn generic(ids: &IdGenerator, n: usize) -> Vec<Node> {
    (0..n).map(|_| Node::new_in(Op::Generic, ids)).collect()
}

/// ```text
///    a
///  / |
/// b  |
///  \ |
///    c
/// ```
pub fn fork(ids: &IdGenerator) -> Result<Graph, GraphError> {
    let first = generic(ids, 2);
    let (a, b) = (first[0].id(), first[1].id());
    let mut g = Graph::from_nodes(first);
    let c = g.add_node(Node::new_in(Op::Generic, ids));
    g.add_edge(a, b)?;
    g.add_edges([(a, c), (b, c)])?;
    Ok(g)
}

pub fn chain(ids: &IdGenerator) -> Result<Graph, GraphError> {
    let mut g = Graph::new();
    let v = g.add_nodes(generic(ids, 5));
    g.link_sequence(v)?;
    Ok(g)
}

pub fn diamond(ids: &IdGenerator) -> Result<Graph, GraphError> {
    let mut g = Graph::new();
    let src = g.add_node(Node::new_in(Op::Generic, ids));
    let left = g.add_sequence(generic(ids, 3))?;
    let right = g.add_sequence(generic(ids, 3))?;
    let sink = g.add_node(Node::new_in(Op::Generic, ids));
    g.add_edges([
        (src, left[0]),
        (left[left.len() - 1], sink),
        (src, right[0]),
        (right[right.len() - 1], sink),
    ])?;
    Ok(g)
}

pub fn hourglass(ids: &IdGenerator) -> Result<Graph, GraphError> {
    let mut g = Graph::new();
    let top = g.add_nodes(generic(ids, 3));
    let waist = g.add_nodes(generic(ids, 1));
    let bottom = g.add_nodes(generic(ids, 3));
    g.link_all_pairs(&top, &waist)?;
    g.link_all_pairs(&waist, &bottom)?;
    Ok(g)
}

pub fn inception(ids: &IdGenerator) -> Result<Graph, GraphError> {
    let node = |op| Node::new_in(op, ids);

    let mut g = Graph::new();
    let fork = g.add_node(node(Op::MaxPool));
    let branches = [
        g.add_sequence([node(Op::Conv), node(Op::Relu)])?,
        g.add_sequence([
            node(Op::Conv),
            node(Op::Relu),
            node(Op::Conv),
            node(Op::Relu),
        ])?,
        g.add_sequence([
            node(Op::Conv),
            node(Op::Relu),
            node(Op::Conv),
            node(Op::Relu),
        ])?,
        g.add_sequence([node(Op::MaxPool), node(Op::Conv), node(Op::Relu)])?,
    ];
    let join = g.add_node(node(Op::Concat));

    let starts = branches.iter().map(|b| b[0]).collect::<Vec<_>>();
    let ends = branches.iter().map(|b| b[b.len() - 1]).collect::<Vec<_>>();
    g.link_all_pairs(&[fork], &starts)?;
    g.link_all_pairs(&ends, &[join])?;
    Ok(g)
}

#[test]
fn get_is_one_based() {
    assert_eq!(get(1).unwrap().name, "fork");
    assert_eq!(get(SAMPLES.len()).unwrap().name, "inception");
}

#[test]
fn get_rejects_out_of_range() {
    let count = SAMPLES.len();
    for index in [0, count + 1, usize::MAX] {
        assert_eq!(
            get(index).err(),
            Some(SampleError::OutOfRange { index, count })
        );
    }
    assert_eq!(
        get(0).err().unwrap().to_string(),
        "Unknown sample 0: expected a number between 1 and 5"
    );
}

#[test]
fn every_sample_builds() {
    for sample in SAMPLES {
        let g = (sample.build)(&IdGenerator::new()).unwrap();
        assert!(!g.is_empty(), "{} is empty", sample.name);
    }
}
