//! Global configuration for partition building and matrix sampling.

use serde::{Deserialize, Serialize};

/// Edge-formation policy: which similarity-scored pairs become graph edges.
///
/// The policy is an explicit build-time parameter; the load path never
/// rebuilds edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Every stored pair becomes an edge (full clique).
    Full,
    /// Keep only pairs with similarity at or above the cutoff.
    Threshold {
        /// Minimum similarity for an edge to be kept.
        min_similarity: f32,
    },
    /// Keep each node's k strongest pairs. An edge survives if it is in
    /// either endpoint's top k.
    TopK {
        /// Number of strongest pairs kept per node.
        k: usize,
    },
}

/// Configuration for decade-partition builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Edge-formation policy used when materializing the graph.
    pub edge_policy: EdgePolicy,
    /// L2-normalize the mean plot vector. Categorical embeddings are
    /// always normalized regardless of this flag.
    pub normalize_embeddings: bool,
    /// Retrieval-style prefix applied to each phrase before encoding.
    pub input_template: String,
    /// Number of movies sampled for the similarity matrix table.
    pub matrix_sample_size: usize,
    /// Seed for the deterministic matrix sample.
    pub matrix_seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            edge_policy: EdgePolicy::Full,
            normalize_embeddings: true,
            input_template: "query: ".to_string(),
            matrix_sample_size: 20,
            matrix_seed: 23,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_json() {
        let config = PipelineConfig {
            edge_policy: EdgePolicy::Threshold {
                min_similarity: 0.8,
            },
            ..PipelineConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.edge_policy, config.edge_policy);
        assert_eq!(back.matrix_seed, 23);
    }
}
