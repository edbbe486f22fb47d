use std::collections::VecDeque;

use tracing::debug;

use crate::graph::{Digraph, NodeRef};

impl<P> Digraph<P> {
    /// Depth-first topological sort.
    ///
    /// Every node without incoming edges is a root, taken in registration
    /// order. From each root, outgoing edges are followed in edge order;
    /// when a node's subtree is finished the node is inserted at the front
    /// of the result. For an acyclic graph every node therefore precedes
    /// all nodes reachable from it.
    ///
    /// Nodes that can only be reached through a cycle with no root are not
    /// visited and do not appear in the result.
    pub fn topological_sort(&self) -> Vec<NodeRef> {
        let node_count = self.node_count();
        let mut sorted: VecDeque<NodeRef> = VecDeque::with_capacity(node_count);
        let mut visited = vec![false; node_count];
        // (node index, next outgoing edge to follow)
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for (root, node) in self.nodes() {
            if node.has_incoming() || visited[root.index()] {
                continue;
            }
            visited[root.index()] = true;
            stack.push((root.index(), 0));

            while let Some(frame) = stack.last_mut() {
                let (current, cursor) = *frame;
                let next = self
                    .node_at(current)
                    .and_then(|n| n.outgoing().get(cursor))
                    .map(|e| e.target().index());

                match next {
                    Some(child) => {
                        frame.1 += 1;
                        if !visited[child] {
                            visited[child] = true;
                            stack.push((child, 0));
                        }
                    }
                    None => {
                        stack.pop();
                        sorted.push_front(self.handle(current));
                    }
                }
            }
        }

        let omitted = node_count - sorted.len();
        debug!(
            nodes = node_count,
            sorted = sorted.len(),
            omitted,
            "topological sort complete"
        );
        sorted.into()
    }

    /// Topological order as node names.
    pub fn topological_names(&self) -> Vec<&str> {
        self.names_of(&self.topological_sort())
    }

    /// Convert a list of handles to node names. Handles from other graphs
    /// are skipped.
    pub fn names_of(&self, nodes: &[NodeRef]) -> Vec<&str> {
        nodes
            .iter()
            .filter_map(|&n| self.node(n))
            .map(|n| n.name())
            .collect()
    }
}
