//! Decade graph: movie nodes, similarity-weighted edges, construction
//! policies, and centrality enrichment.

pub mod builder;
pub mod centrality;
pub mod edge;
pub mod node;

pub use builder::MovieGraphBuilder;
pub use centrality::{enrich_with_centrality, LOG_EPSILON};
pub use edge::SimilarityEdge;
pub use node::MovieNode;

use petgraph::graph::UnGraph;
use serde::{Deserialize, Serialize};

use crate::types::MovieId;

/// A high-level wrapper around the petgraph representation.
#[derive(Debug, Serialize, Deserialize)]
pub struct MovieGraph {
    inner: UnGraph<MovieNode, SimilarityEdge>,
}

impl MovieGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            inner: UnGraph::new_undirected(),
        }
    }

    pub(crate) fn from_inner(inner: UnGraph<MovieNode, SimilarityEdge>) -> Self {
        Self { inner }
    }

    /// Access the underlying petgraph graph (for advanced operations).
    pub fn inner(&self) -> &UnGraph<MovieNode, SimilarityEdge> {
        &self.inner
    }

    /// Mutable access to the underlying petgraph graph.
    pub fn inner_mut(&mut self) -> &mut UnGraph<MovieNode, SimilarityEdge> {
        &mut self.inner
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over node attributes.
    pub fn nodes(&self) -> impl Iterator<Item = &MovieNode> {
        self.inner.node_weights()
    }

    /// Attributes for a movie's node, if it is in the graph.
    pub fn node(&self, id: MovieId) -> Option<&MovieNode> {
        self.inner
            .node_weights()
            .find(|node| node.wikipedia_id == id)
    }
}

impl Default for MovieGraph {
    fn default() -> Self {
        Self::new()
    }
}
