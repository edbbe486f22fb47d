//! Conversion between a [`Digraph`] and its adjacency mapping.
//!
//! The adjacency mapping is the plain-data form of a graph: each node name
//! maps to the names of the nodes its outgoing edges point to. Key order is
//! preserved in both directions, which keeps node registration order (and
//! therefore sort order) stable across a round trip. Edge weights are not
//! part of the mapping.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{DigraphError, DigraphResult};
use crate::graph::{Digraph, Node, NodeRef};

/// Node name -> ordered outgoing target names.
pub type Adjacency = IndexMap<String, Vec<String>>;

impl<P> Digraph<P> {
    /// Build a new graph from an adjacency mapping, using default payloads.
    pub fn from_mapping(adjacency: &Adjacency) -> DigraphResult<Self>
    where
        P: Default,
    {
        let mut graph = Self::with_capacity(adjacency.len());
        graph.create_from_mapping(adjacency)?;
        Ok(graph)
    }

    /// Build a new graph from an adjacency mapping with a node factory.
    pub fn from_mapping_with<F>(adjacency: &Adjacency, factory: F) -> DigraphResult<Self>
    where
        F: FnMut(&str) -> Node<P>,
    {
        let mut graph = Self::with_capacity(adjacency.len());
        graph.create_from_mapping_with(adjacency, factory)?;
        Ok(graph)
    }

    /// Add the nodes and edges described by `adjacency` to this graph.
    pub fn create_from_mapping(&mut self, adjacency: &Adjacency) -> DigraphResult<()>
    where
        P: Default,
    {
        self.create_from_mapping_with(adjacency, |name| Node::with_payload(name, P::default()))
    }

    /// Add the nodes and edges described by `adjacency`, creating each node
    /// with `factory`.
    ///
    /// Every key is registered before any edge is created, so targets may be
    /// declared after the nodes that reference them. All targets are
    /// resolved before the first edge is added: an undeclared target fails
    /// with [`DigraphError::UnknownReference`] and leaves no edges behind.
    /// Nodes registered before a failure stay in the graph.
    pub fn create_from_mapping_with<F>(
        &mut self,
        adjacency: &Adjacency,
        mut factory: F,
    ) -> DigraphResult<()>
    where
        F: FnMut(&str) -> Node<P>,
    {
        for name in adjacency.keys() {
            self.add_node(factory(name))?;
        }

        let mut edges: Vec<(NodeRef, NodeRef)> = Vec::new();
        for (name, targets) in adjacency {
            let from = self
                .find(name)
                .ok_or_else(|| DigraphError::unknown_reference(name.as_str(), name.as_str()))?;
            for target in targets {
                let to = self.find(target).ok_or_else(|| {
                    DigraphError::unknown_reference(target.as_str(), name.as_str())
                })?;
                edges.push((from, to));
            }
        }

        for (from, to) in &edges {
            self.create_edge(*from, *to)?;
        }

        debug!(
            nodes = adjacency.len(),
            edges = edges.len(),
            "created digraph from adjacency mapping"
        );
        Ok(())
    }

    /// Snapshot the graph as an adjacency mapping, in registration and edge order.
    pub fn as_mapping(&self) -> Adjacency {
        self.nodes()
            .map(|(_, node)| {
                let targets: Vec<String> = self
                    .target_names(node.outgoing())
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                (node.name().to_string(), targets)
            })
            .collect()
    }

    /// Render the adjacency mapping as a JSON object.
    pub fn to_json(&self) -> DigraphResult<String> {
        Ok(serde_json::to_string(&self.as_mapping())?)
    }

    /// Build a graph from a JSON object of `name -> [target names]`.
    pub fn from_json(json: &str) -> DigraphResult<Self>
    where
        P: Default,
    {
        let adjacency: Adjacency = serde_json::from_str(json)?;
        Self::from_mapping(&adjacency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(entries: &[(&str, &[&str])]) -> Adjacency {
        entries
            .iter()
            .map(|(name, targets)| {
                (
                    name.to_string(),
                    targets.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_create_from_mapping() {
        let m = adjacency(&[("A", &["B", "C"]), ("B", &["C"]), ("C", &[])]);
        let g: Digraph = Digraph::from_mapping(&m).unwrap();

        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        let a = g.find("A").unwrap();
        assert_eq!(g.outgoing_names(a).unwrap(), vec!["B", "C"]);
        assert!(g.get("C").unwrap().has_incoming());
        assert!(!g.get("A").unwrap().has_incoming());
    }

    #[test]
    fn test_forward_references() {
        // "A" names "Z" before "Z" appears as a key
        let m = adjacency(&[("A", &["Z"]), ("Z", &[])]);
        let g: Digraph = Digraph::from_mapping(&m).unwrap();
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_unknown_reference() {
        let m = adjacency(&[("A", &["B"])]);
        let mut g: Digraph = Digraph::new();
        let err = g.create_from_mapping(&m).unwrap_err();
        match err {
            DigraphError::UnknownReference { name, referenced_by } => {
                assert_eq!(name, "B");
                assert_eq!(referenced_by, "A");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Nodes from the first pass remain, no edges were created
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_unknown_reference_creates_no_edges() {
        let m = adjacency(&[("A", &["B"]), ("B", &["C", "missing"]), ("C", &[])]);
        let mut g: Digraph = Digraph::new();
        assert!(g.create_from_mapping(&m).is_err());
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_key_against_existing_node() {
        let mut g: Digraph = Digraph::new();
        g.add_node(Node::new("A")).unwrap();
        let err = g.create_from_mapping(&adjacency(&[("A", &[])])).unwrap_err();
        assert!(matches!(err, DigraphError::DuplicateNode { .. }));
    }

    #[test]
    fn test_factory_builds_payload_nodes() {
        let m = adjacency(&[("build", &["compile"]), ("compile", &[])]);
        let mut created = Vec::new();
        let g = Digraph::from_mapping_with(&m, |name| {
            created.push(name.to_string());
            Node::with_payload(name, name.len())
        })
        .unwrap();

        assert_eq!(created, vec!["build", "compile"]);
        assert_eq!(*g.get("compile").unwrap().payload(), 7);
    }

    #[test]
    fn test_as_mapping_round_trip() {
        let m = adjacency(&[("A", &["B", "C"]), ("B", &[]), ("C", &[])]);
        let g: Digraph = Digraph::from_mapping(&m).unwrap();
        assert_eq!(g.as_mapping(), m);

        let again: Digraph = Digraph::from_mapping(&g.as_mapping()).unwrap();
        assert_eq!(again.as_mapping(), g.as_mapping());
    }

    #[test]
    fn test_as_mapping_reflects_weights() {
        let mut g: Digraph = Digraph::new();
        let a = g.add_node(Node::new("A")).unwrap();
        let b = g.add_node(Node::new("B")).unwrap();
        let c = g.add_node(Node::new("C")).unwrap();
        g.create_weighted_edge(a, b, 10).unwrap();
        g.create_weighted_edge(a, c, 1).unwrap();

        assert_eq!(g.as_mapping(), adjacency(&[("A", &["C", "B"]), ("B", &[]), ("C", &[])]));
    }

    #[test]
    fn test_json_round_trip() {
        let json = r#"{"fetch":["unpack"],"unpack":["install"],"install":[]}"#;
        let g: Digraph = Digraph::from_json(json).unwrap();
        let names: Vec<&str> = g.nodes().map(|(_, n)| n.name()).collect();
        assert_eq!(names, vec!["fetch", "unpack", "install"]);
        assert_eq!(g.to_json().unwrap(), json);
    }

    #[test]
    fn test_json_malformed() {
        let err = Digraph::<()>::from_json(r#"{"A": "B"}"#).unwrap_err();
        assert!(matches!(err, DigraphError::Json(_)));
    }

    #[test]
    fn test_empty_mapping() {
        let g: Digraph = Digraph::from_mapping(&Adjacency::new()).unwrap();
        assert!(g.is_empty());
        assert!(g.as_mapping().is_empty());
    }
}
