//! digraph-core: directed graph with deterministic topological ordering.
//!
//! A pure Rust library holding uniquely named nodes joined by weighted,
//! directed edges. Built for dependency resolution: register the elements,
//! describe what depends on what (directly or as an adjacency mapping), and
//! read back an ordering in which every element precedes the elements it
//! points to.
//!
//! Edge lists are kept sorted by weight and nodes keep their registration
//! order, so the same input always produces the same ordering.
//!
//! ```
//! use digraph_core::{Adjacency, Digraph};
//!
//! let mut adjacency = Adjacency::new();
//! adjacency.insert("A".to_string(), vec!["B".to_string()]);
//! adjacency.insert("B".to_string(), vec!["C".to_string()]);
//! adjacency.insert("C".to_string(), vec![]);
//!
//! let graph: Digraph = Digraph::from_mapping(&adjacency).unwrap();
//! assert_eq!(graph.topological_names(), vec!["A", "B", "C"]);
//! ```

mod error;
mod graph;
mod mapping;
mod topo;

pub use error::{DigraphError, DigraphResult};
pub use graph::{Digraph, Edge, Node, NodeRef, Weight};
pub use mapping::Adjacency;
