use std::fmt;

use crate::{
    id::{IdGenerator, NodeId},
    op::Op,
};

/// A graph node: an identity allocated at construction plus the operator it stands for.
///
/// Identities come from an [`IdGenerator`], so two nodes built from the same generator
/// never share one, whether or not either ends up in a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    pub op: Op,
}

impl Node {
    pub fn new(op: Op) -> Self {
        Self::new_in(op, IdGenerator::global())
    }

    pub fn new_in(op: Op, ids: &IdGenerator) -> Self {
        Self {
            id: ids.next_id(),
            op,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.op.name(), self.id)
    }
}

#[test]
fn node_labels() {
    use crate::op::TensorDesc;

    let ids = IdGenerator::new();
    assert_eq!(Node::new_in(Op::Conv, &ids).label(), "Conv:0");
    assert_eq!(Node::new_in(Op::MaxPool, &ids).label(), "Maxpool:1");
    assert_eq!(Node::new_in(Op::store(42), &ids).label(), "Store:2");
    assert_eq!(
        Node::new_in(Op::tensor(TensorDesc::new("x", 4)), &ids).label(),
        "Tensor:3"
    );
    assert_eq!(Node::new_in(Op::Generic, &ids).label(), "Node:4");
}

#[test]
fn identities_are_shared_across_kinds() {
    let ids = IdGenerator::new();
    let nodes = [
        Node::new_in(Op::Relu, &ids),
        Node::new_in(Op::load(1), &ids),
        Node::new_in(Op::Concat, &ids),
        Node::new_in(Op::free(1), &ids),
    ];
    let got = nodes.iter().map(|n| n.id().index()).collect::<Vec<_>>();
    assert_eq!(got, vec![0, 1, 2, 3]);
}

#[test]
fn unattached_nodes_still_consume_ids() {
    let ids = IdGenerator::new();
    let _ = Node::new_in(Op::Conv, &ids);
    let _ = Node::new_in(Op::Conv, &ids);
    assert_eq!(Node::new_in(Op::Conv, &ids).id(), NodeId(2));
}
