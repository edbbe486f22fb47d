use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{DigraphError, DigraphResult};

/// Edge weight. Lower weights sort first in a node's edge lists.
pub type Weight = i64;

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a node registered in a specific [`Digraph`].
///
/// Carries the id of the issuing graph, so a handle from another graph is
/// rejected instead of silently aliasing a node with the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef {
    graph: u64,
    index: usize,
}

impl NodeRef {
    /// Registration index of the node within its graph.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A directed, weighted edge as stored in a node's edge list.
///
/// In an outgoing list `target` is the node pointed to; in an incoming list
/// it is the source. Edges order by weight, then by target; two edges are
/// equal only when both match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Edge {
    weight: Weight,
    target: NodeRef,
}

impl Edge {
    pub fn target(&self) -> NodeRef {
        self.target
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }
}

/// Insert keeping ascending weight order. Ties go after existing edges of
/// the same weight, so equal-weight edges keep their creation order.
fn insert_sorted(edges: &mut Vec<Edge>, edge: Edge) {
    let pos = edges.partition_point(|e| e.weight <= edge.weight);
    edges.insert(pos, edge);
}

/// A named vertex with an attached payload.
///
/// The name is fixed at construction and is the node's identity inside a
/// graph. `P` lets callers hang their own data off each node.
#[derive(Debug)]
pub struct Node<P = ()> {
    name: String,
    payload: P,
    outgoing: Vec<Edge>,
    incoming: Vec<Edge>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_payload(name, ())
    }
}

impl<P> Node<P> {
    pub fn with_payload(name: impl Into<String>, payload: P) -> Self {
        Self {
            name: name.into(),
            payload,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    /// Outgoing edges, ascending by weight.
    pub fn outgoing(&self) -> &[Edge] {
        &self.outgoing
    }

    /// Incoming edges, ascending by weight.
    pub fn incoming(&self) -> &[Edge] {
        &self.incoming
    }

    /// True if any edge points at this node. Nodes without incoming edges
    /// are the entry points of a topological sort.
    pub fn has_incoming(&self) -> bool {
        !self.incoming.is_empty()
    }

    pub(crate) fn add_outgoing(&mut self, target: NodeRef, weight: Weight) {
        insert_sorted(&mut self.outgoing, Edge { weight, target });
    }

    pub(crate) fn add_incoming(&mut self, source: NodeRef, weight: Weight) {
        insert_sorted(&mut self.incoming, Edge { weight, target: source });
    }
}

/// Directed graph of uniquely named nodes.
///
/// Nodes are kept in registration order; that order, together with edge
/// weights, makes every traversal deterministic. Mutation requires
/// `&mut self`, so concurrent use needs external synchronization.
#[derive(Debug)]
pub struct Digraph<P = ()> {
    id: u64,
    nodes: IndexMap<String, Node<P>>,
}

impl<P> Digraph<P> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-allocate for a known node count.
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            nodes: IndexMap::with_capacity(node_count),
        }
    }

    /// Register a node. Fails if a node with the same name already exists;
    /// the existing node is left untouched.
    pub fn add_node(&mut self, node: Node<P>) -> DigraphResult<NodeRef> {
        if self.nodes.contains_key(node.name()) {
            return Err(DigraphError::duplicate_node(node.name));
        }
        trace!(name = %node.name, "registering node");
        let (index, _) = self.nodes.insert_full(node.name.clone(), node);
        Ok(self.handle(index))
    }

    /// Create an edge `from -> to` with weight 0.
    pub fn create_edge(&mut self, from: NodeRef, to: NodeRef) -> DigraphResult<()> {
        self.create_weighted_edge(from, to, 0)
    }

    /// Create an edge `from -> to`, also recording it on `to`'s incoming list.
    ///
    /// Both handles are validated before either node is touched.
    pub fn create_weighted_edge(
        &mut self,
        from: NodeRef,
        to: NodeRef,
        weight: Weight,
    ) -> DigraphResult<()> {
        self.check(from)?;
        self.check(to)?;

        trace!(from = from.index, to = to.index, weight, "creating edge");
        if let Some((_, node)) = self.nodes.get_index_mut(from.index) {
            node.add_outgoing(to, weight);
        }
        if let Some((_, node)) = self.nodes.get_index_mut(to.index) {
            node.add_incoming(from, weight);
        }
        Ok(())
    }

    /// Look up a node handle by name.
    pub fn find(&self, name: &str) -> Option<NodeRef> {
        self.nodes.get_index_of(name).map(|index| self.handle(index))
    }

    /// Get a node by handle. `None` for handles from another graph.
    pub fn node(&self, node: NodeRef) -> Option<&Node<P>> {
        if node.graph != self.id {
            return None;
        }
        self.nodes.get_index(node.index).map(|(_, n)| n)
    }

    /// Mutable access to a node's payload. The name and edges stay fixed.
    pub fn payload_mut(&mut self, node: NodeRef) -> Option<&mut P> {
        if node.graph != self.id {
            return None;
        }
        self.nodes
            .get_index_mut(node.index)
            .map(|(_, n)| n.payload_mut())
    }

    /// Get a node by name.
    pub fn get(&self, name: &str) -> Option<&Node<P>> {
        self.nodes.get(name)
    }

    /// Iterate over all nodes in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeRef, &Node<P>)> {
        self.nodes
            .values()
            .enumerate()
            .map(move |(index, node)| (self.handle(index), node))
    }

    /// Names of the nodes `node` points to, in edge order.
    pub fn outgoing_names(&self, node: NodeRef) -> Option<Vec<&str>> {
        self.node(node).map(|n| self.target_names(n.outgoing()))
    }

    pub(crate) fn target_names(&self, edges: &[Edge]) -> Vec<&str> {
        edges
            .iter()
            .filter_map(|e| self.nodes.get_index(e.target.index))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub(crate) fn node_at(&self, index: usize) -> Option<&Node<P>> {
        self.nodes.get_index(index).map(|(_, n)| n)
    }

    pub(crate) fn handle(&self, index: usize) -> NodeRef {
        NodeRef {
            graph: self.id,
            index,
        }
    }

    fn check(&self, node: NodeRef) -> DigraphResult<()> {
        if node.graph != self.id || node.index >= self.nodes.len() {
            return Err(DigraphError::invalid_reference(node));
        }
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.outgoing.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let nodes_mem: usize = self
            .nodes
            .keys()
            .map(|name| 2 * name.len() + size_of::<String>() + size_of::<Node<P>>() + 16)
            .sum();
        let edges_mem: usize = self
            .nodes
            .values()
            .map(|n| (n.outgoing.capacity() + n.incoming.capacity()) * size_of::<Edge>())
            .sum();

        nodes_mem + edges_mem
    }
}

impl<P> Default for Digraph<P> {
    fn default() -> Self {
        Self::new()
    }
}
