//! Graph construction: from a similarity map into a MovieGraph under an
//! edge-formation policy.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{NodeIndex, UnGraph};

use crate::config::EdgePolicy;
use crate::errors::{CineError, Result};
use crate::graph::{MovieGraph, MovieNode, SimilarityEdge};
use crate::similarity::SimilarityMap;
use crate::types::{MovieId, PairKey};

/// Builder for a MovieGraph from a pairwise similarity map.
#[derive(Debug)]
pub struct MovieGraphBuilder {
    policy: EdgePolicy,
    graph: UnGraph<MovieNode, SimilarityEdge>,
    id_to_node: HashMap<MovieId, NodeIndex>,
}

impl MovieGraphBuilder {
    /// Create a new builder with the given edge policy.
    pub fn new(policy: EdgePolicy) -> Self {
        Self {
            policy,
            graph: UnGraph::new_undirected(),
            id_to_node: HashMap::new(),
        }
    }

    fn ensure_node(&mut self, id: MovieId) -> NodeIndex {
        if let Some(&idx) = self.id_to_node.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(MovieNode::new(id));
        self.id_to_node.insert(id, idx);
        idx
    }

    /// Materialize the graph.
    ///
    /// `movie_ids` is the full node set — every embedded movie gets a
    /// node even when the policy keeps none of its edges, so isolated
    /// nodes survive thresholding.
    pub fn build(mut self, similarities: &SimilarityMap, movie_ids: &[MovieId]) -> Result<MovieGraph> {
        for &id in movie_ids {
            self.ensure_node(id);
        }

        let kept = self.select_pairs(similarities)?;
        for key in kept {
            // Selection only yields keys present in the map.
            let weight = similarities
                .get(key)
                .ok_or(CineError::MissingSimilarity(key.first(), key.second()))?;
            let a = self.ensure_node(key.first());
            let b = self.ensure_node(key.second());
            self.graph.add_edge(a, b, SimilarityEdge::new(weight));
        }

        Ok(MovieGraph::from_inner(self.graph))
    }

    /// Pairs surviving the edge policy.
    fn select_pairs(&self, similarities: &SimilarityMap) -> Result<Vec<PairKey>> {
        match self.policy {
            EdgePolicy::Full => Ok(similarities.iter().map(|(key, _)| key).collect()),
            EdgePolicy::Threshold { min_similarity } => Ok(similarities
                .iter()
                .filter(|(_, score)| *score >= min_similarity)
                .map(|(key, _)| key)
                .collect()),
            EdgePolicy::TopK { k } => {
                if k == 0 {
                    return Err(CineError::Config(
                        "top-k edge policy requires k > 0".to_string(),
                    ));
                }

                let mut per_node: HashMap<MovieId, Vec<(PairKey, f32)>> = HashMap::new();
                for (key, score) in similarities.iter() {
                    per_node.entry(key.first()).or_default().push((key, score));
                    per_node.entry(key.second()).or_default().push((key, score));
                }

                let mut kept: HashSet<PairKey> = HashSet::new();
                for (_, mut pairs) in per_node {
                    pairs.sort_by(|a, b| {
                        b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal)
                    });
                    kept.extend(pairs.into_iter().take(k).map(|(key, _)| key));
                }
                Ok(kept.into_iter().collect())
            }
        }
    }
}
