//! Movie edge definition (similarity-weighted).

use serde::{Deserialize, Serialize};

/// Edge between two movies, weighted by their similarity score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimilarityEdge {
    /// Similarity score from the pairwise map.
    pub weight: f32,
}

impl SimilarityEdge {
    /// Create a new edge with the given weight.
    pub fn new(weight: f32) -> Self {
        Self { weight }
    }
}
