use std::{fmt, ops::Index};

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{id::NodeId, node::Node};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node {0} not found in graph")]
    NotFound(NodeId),
}

/// A directed graph of operator nodes stored as adjacency lists.
///
/// Nodes and their destination lists live in two parallel tables indexed through
/// `index`, so every node has exactly one (possibly empty) destination list. Both
/// node order and destination order follow insertion order. Duplicate edges and
/// self-loops are kept as given.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    adjacency: Vec<Vec<NodeId>>,
    index: FxHashMap<NodeId, usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut graph = Self::new();
        graph.add_nodes(nodes);
        graph
    }

    /// Registers `node` and returns its identity. A node whose identity is already
    /// present is dropped and the graph is left untouched.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id();
        if self.index.contains_key(&id) {
            return id;
        }
        self.index.insert(id, self.nodes.len());
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        debug_assert_eq!(self.nodes.len(), self.adjacency.len());
        id
    }

    pub fn add_nodes(&mut self, nodes: impl IntoIterator<Item = Node>) -> Vec<NodeId> {
        nodes.into_iter().map(|node| self.add_node(node)).collect()
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        let from_idx = self.position(from)?;
        self.position(to)?;
        log::trace!("add_edge: {from} -> {to}");
        self.adjacency[from_idx].push(to);
        Ok(())
    }

    /// Adds the edges in order. On the first pair naming an unknown node this stops and
    /// returns the error; edges added before it stay in the graph.
    pub fn add_edges(
        &mut self,
        edges: impl IntoIterator<Item = (NodeId, NodeId)>,
    ) -> Result<(), GraphError> {
        for (from, to) in edges {
            self.add_edge(from, to)?;
        }
        Ok(())
    }

    /// Chains `ids` so that each one points to its successor, and hands the ids back.
    pub fn link_sequence(
        &mut self,
        ids: impl IntoIterator<Item = NodeId>,
    ) -> Result<Vec<NodeId>, GraphError> {
        let ids = ids.into_iter().collect::<Vec<_>>();
        log::debug!("link_sequence: {} nodes", ids.len());
        self.add_edges(ids.windows(2).map(|w| (w[0], w[1])))?;
        Ok(ids)
    }

    /// Adds an edge from every node of `src` to every node of `dst`, iterating `src` in
    /// the outer loop. Fails like [`Graph::add_edges`].
    pub fn link_all_pairs(&mut self, src: &[NodeId], dst: &[NodeId]) -> Result<(), GraphError> {
        log::debug!("link_all_pairs: {} x {}", src.len(), dst.len());
        for &from in src {
            for &to in dst {
                self.add_edge(from, to)?;
            }
        }
        Ok(())
    }

    pub fn add_sequence(
        &mut self,
        nodes: impl IntoIterator<Item = Node>,
    ) -> Result<Vec<NodeId>, GraphError> {
        let ids = self.add_nodes(nodes);
        self.link_sequence(ids)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        Ok(&self.nodes[self.position(id)?])
    }

    pub fn successor_ids(&self, id: NodeId) -> Result<&[NodeId], GraphError> {
        Ok(&self.adjacency[self.position(id)?])
    }

    pub fn successors(&self, id: NodeId) -> Result<Vec<&Node>, GraphError> {
        Ok(self
            .successor_ids(id)?
            .iter()
            .map(|&to| &self[to])
            .collect())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(Node::id)
    }

    pub fn labels(&self) -> impl Iterator<Item = String> + '_ {
        self.nodes.iter().map(Node::label)
    }

    /// Every directed edge as `(source, destination)`, grouped by source in node
    /// insertion order and by destination insertion order within a source.
    pub fn edges(&self) -> impl Iterator<Item = (&Node, &Node)> + '_ {
        self.nodes
            .iter()
            .zip(self.adjacency.iter())
            .flat_map(move |(from, dsts)| dsts.iter().map(move |&to| (from, &self[to])))
    }

    pub fn edge_labels(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.edges().map(|(from, to)| (from.label(), to.label()))
    }

    fn position(&self, id: NodeId) -> Result<usize, GraphError> {
        self.index.get(&id).copied().ok_or(GraphError::NotFound(id))
    }
}

impl Index<NodeId> for Graph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[self.index[&id]]
    }
}

impl FromIterator<Node> for Graph {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self::from_nodes(iter)
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<'a>(
            f: &mut fmt::Formatter<'_>,
            nodes: impl Iterator<Item = &'a Node>,
        ) -> fmt::Result {
            for (i, node) in nodes.enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{node}")?;
            }
            Ok(())
        }

        join(f, self.nodes.iter())?;
        writeln!(f)?;
        writeln!(f)?;
        for (from, dsts) in self.nodes.iter().zip(self.adjacency.iter()) {
            write!(f, "{from} -> ")?;
            join(f, dsts.iter().map(|&to| &self[to]))?;
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
fn generic_nodes(ids: &crate::id::IdGenerator, n: usize) -> Vec<Node> {
    (0..n)
        .map(|_| Node::new_in(crate::op::Op::Generic, ids))
        .collect()
}

#[cfg(test)]
fn edge_ids(graph: &Graph) -> Vec<(usize, usize)> {
    graph
        .edges()
        .map(|(from, to)| (from.id().index(), to.id().index()))
        .collect()
}

#[test]
fn add_node_keeps_tables_in_step() {
    let ids = crate::id::IdGenerator::new();
    let mut g = Graph::new();
    assert!(g.is_empty());
    let got = g.add_nodes(generic_nodes(&ids, 4));
    assert_eq!(got, vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3)]);
    assert_eq!(g.len(), 4);
    for id in g.node_ids() {
        assert!(g.contains(id));
        assert_eq!(g.node(id).unwrap().id(), id);
        assert!(g.successor_ids(id).unwrap().is_empty());
    }
}

#[test]
fn re_adding_a_node_is_a_no_op() {
    let ids = crate::id::IdGenerator::new();
    let mut g = Graph::new();
    let nodes = generic_nodes(&ids, 2);
    let a = g.add_node(nodes[0].clone());
    let b = g.add_node(nodes[1].clone());
    g.add_edge(a, b).unwrap();

    assert_eq!(g.add_node(nodes[0].clone()), a);
    assert_eq!(g.len(), 2);
    assert_eq!(g.successor_ids(a).unwrap(), &[b]);
}

#[test]
fn first_inserted_node_wins_on_collision() {
    use crate::op::Op;

    let ids = crate::id::IdGenerator::new();
    let conv = Node::new_in(Op::Conv, &ids);
    let mut relu = conv.clone();
    relu.op = Op::Relu;

    let mut g = Graph::new();
    let id = g.add_node(conv);
    assert_eq!(g.add_node(relu), id);
    assert_eq!(g[id].op, Op::Conv);
}

#[test]
fn add_edge_rejects_unknown_nodes() {
    let ids = crate::id::IdGenerator::new();
    let mut g = Graph::new();
    let v = g.add_nodes(generic_nodes(&ids, 2));
    let (a, b) = (v[0], v[1]);
    let stray = Node::new_in(crate::op::Op::Conv, &ids).id();

    assert_eq!(g.add_edge(a, stray), Err(GraphError::NotFound(stray)));
    assert_eq!(g.add_edge(stray, b), Err(GraphError::NotFound(stray)));
    assert_eq!(g.edge_count(), 0);
    assert!(g.successor_ids(a).unwrap().is_empty());
}

#[test]
fn duplicate_edges_and_self_loops_are_kept() {
    let ids = crate::id::IdGenerator::new();
    let mut g = Graph::new();
    let a = g.add_node(Node::new_in(crate::op::Op::Generic, &ids));
    g.add_edges([(a, a), (a, a)]).unwrap();
    assert_eq!(edge_ids(&g), vec![(0, 0), (0, 0)]);
}

#[test]
fn add_edges_is_not_atomic() {
    let ids = crate::id::IdGenerator::new();
    let mut g = Graph::new();
    let v = g.add_nodes(generic_nodes(&ids, 3));
    let missing = NodeId(100);
    let err = g
        .add_edges([(v[0], v[1]), (v[1], missing), (v[1], v[2])])
        .unwrap_err();
    assert_eq!(err, GraphError::NotFound(missing));
    assert_eq!(edge_ids(&g), vec![(0, 1)]);
}

#[test]
fn link_sequence_chains_neighbours() {
    let ids = crate::id::IdGenerator::new();
    let mut g = Graph::new();
    let v = g.add_nodes(generic_nodes(&ids, 3));
    assert_eq!(g.link_sequence(v.iter().copied()).unwrap(), v);
    assert_eq!(edge_ids(&g), vec![(0, 1), (1, 2)]);
}

#[test]
fn link_sequence_short_inputs_add_nothing() {
    let ids = crate::id::IdGenerator::new();
    let mut g = Graph::new();
    let v = g.add_nodes(generic_nodes(&ids, 1));
    assert_eq!(g.link_sequence(v.clone()).unwrap(), v);
    assert_eq!(g.link_sequence(Vec::<NodeId>::new()).unwrap(), vec![]);
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn link_sequence_accepts_lazy_input() {
    let ids = crate::id::IdGenerator::new();
    let mut g = Graph::new();
    g.add_nodes(generic_nodes(&ids, 4));
    let chained = g.link_sequence((0..4).rev().map(NodeId)).unwrap();
    assert_eq!(chained, vec![NodeId(3), NodeId(2), NodeId(1), NodeId(0)]);
    assert_eq!(edge_ids(&g), vec![(1, 0), (2, 1), (3, 2)]);
}

#[test]
fn link_all_pairs_is_src_major() {
    let ids = crate::id::IdGenerator::new();
    let mut g = Graph::new();
    let v = g.add_nodes(generic_nodes(&ids, 4));
    g.link_all_pairs(&v[..2], &v[2..]).unwrap();
    insta::assert_debug_snapshot!(g.successor_ids(v[0]).unwrap(), @r###"
    [
        NodeId(
            2,
        ),
        NodeId(
            3,
        ),
    ]
    "###);
    assert_eq!(edge_ids(&g), vec![(0, 2), (0, 3), (1, 2), (1, 3)]);
}

#[test]
fn link_all_pairs_stops_at_first_unknown_id() {
    let ids = crate::id::IdGenerator::new();
    let mut g = Graph::new();
    let v = g.add_nodes(generic_nodes(&ids, 3));
    let missing = NodeId(42);
    let err = g.link_all_pairs(&[v[0], v[1]], &[v[2], missing]).unwrap_err();
    assert_eq!(err, GraphError::NotFound(missing));
    assert_eq!(edge_ids(&g), vec![(0, 2)]);
}

#[test]
fn lookup_unknown_id() {
    let g = Graph::new();
    assert_eq!(g.node(NodeId(5)), Err(GraphError::NotFound(NodeId(5))));
    assert_eq!(g.successors(NodeId(5)), Err(GraphError::NotFound(NodeId(5))));
    assert_eq!(
        GraphError::NotFound(NodeId(5)).to_string(),
        "Node 5 not found in graph"
    );
}

#[test]
fn display_lists_labels_then_adjacency() {
    use crate::op::Op;

    let ids = crate::id::IdGenerator::new();
    let mut g = Graph::new();
    let chain = g
        .add_sequence([
            Node::new_in(Op::Conv, &ids),
            Node::new_in(Op::Relu, &ids),
            Node::new_in(Op::load(3), &ids),
        ])
        .unwrap();
    g.add_edge(chain[0], chain[2]).unwrap();
    assert_eq!(
        g.to_string(),
        "Conv:0, Relu:1, Load:2\n\nConv:0 -> Relu:1, Load:2\nRelu:1 -> Load:2\nLoad:2 -> \n"
    );
    let labels = g
        .successors(chain[0])
        .unwrap()
        .into_iter()
        .map(Node::label)
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["Relu:1", "Load:2"]);
}

#[test]
fn display_empty_graph() {
    assert_eq!(Graph::new().to_string(), "\n\n");
}
