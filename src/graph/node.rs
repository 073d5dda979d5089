//! Movie node definition.

use serde::{Deserialize, Serialize};

use crate::types::MovieId;

/// A node in the decade graph.
///
/// Attributes accumulate over the pipeline: the builder sets the ID, the
/// centrality pass copies `name` / `release_year` / `rating` from the
/// source table and fills in the metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieNode {
    /// Movie ID, materialized as a node attribute for downstream export.
    pub wikipedia_id: MovieId,
    /// Movie title.
    pub name: String,
    /// Release year.
    pub release_year: u16,
    /// IMDb rating; `None` until enrichment, or for unrated legacy graphs.
    pub rating: Option<f32>,
    /// Unweighted distinct-neighbor count.
    pub degree: u32,
    /// Normalized shortest-path betweenness centrality.
    pub betweenness: f64,
    /// `ln(betweenness + 1e-4)`.
    pub log_betweenness: f64,
}

impl MovieNode {
    /// Create a bare node carrying only its identity.
    pub fn new(wikipedia_id: MovieId) -> Self {
        Self {
            wikipedia_id,
            name: String::new(),
            release_year: 0,
            rating: None,
            degree: 0,
            betweenness: 0.0,
            log_betweenness: 0.0,
        }
    }
}
