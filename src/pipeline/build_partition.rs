//! Orchestrates one partition build:
//! table -> embeddings -> similarities -> graph -> centrality.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::corpus::{MovieRecord, MovieTable};
use crate::embed::{
    embed_distribution, embed_indicator, genre_label_universe, validate_uniform_labels,
    EncodingModel, TextEmbedder,
};
use crate::errors::{CineError, Result};
use crate::graph::{enrich_with_centrality, MovieGraph, MovieGraphBuilder};
use crate::similarity::SimilarityMap;
use crate::types::{Approach, Decade, MovieId};

/// All derived artifacts for one `(decade, approach)` pair.
#[derive(Debug)]
pub struct PartitionArtifacts {
    /// Decade the artifacts are scoped to.
    pub decade: Decade,
    /// Embedding approach the artifacts were built with.
    pub approach: Approach,
    /// Per-movie embedding vectors.
    pub embeddings: HashMap<MovieId, Vec<f32>>,
    /// Pairwise similarity map over the embedded movies.
    pub similarities: SimilarityMap,
    /// Enriched similarity graph.
    pub graph: MovieGraph,
}

/// Batch pipeline building one partition at a time.
///
/// Steps within a partition are strictly sequential; partitions are
/// independent, so callers may build several concurrently.
pub struct PartitionBuildPipeline<'a> {
    config: PipelineConfig,
    model: &'a dyn EncodingModel,
}

impl std::fmt::Debug for PartitionBuildPipeline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartitionBuildPipeline")
            .field("config", &self.config)
            .field("model", &"<EncodingModel>")
            .finish()
    }
}

impl<'a> PartitionBuildPipeline<'a> {
    /// Create a pipeline with the given configuration and encoding model.
    /// The model is only invoked for the plot-text approach.
    pub fn new(config: PipelineConfig, model: &'a dyn EncodingModel) -> Self {
        Self { config, model }
    }

    /// Build the artifacts for one `(decade, approach)` pair.
    ///
    /// Movies outside the decade are ignored; movies without an IMDb
    /// rating are dropped, not carried with a sentinel. Any failure
    /// aborts the build — a partial partition must never surface.
    pub fn build(
        &self,
        table: &MovieTable,
        decade: Decade,
        approach: Approach,
    ) -> Result<PartitionArtifacts> {
        let scoped = table.for_decade(decade).rated();
        tracing::info!(
            %decade,
            %approach,
            movies = scoped.len(),
            "building partition"
        );

        let embeddings = match approach {
            Approach::Plots => self.embed_plots(&scoped)?,
            Approach::RawGenres => self.embed_raw_genres(&scoped)?,
            Approach::CustomGenres => self.embed_custom_genres(&scoped)?,
        };
        self.check_dimensionality(&embeddings, approach)?;

        let similarities = SimilarityMap::build_pairwise(&embeddings);
        tracing::info!(
            embeddings = embeddings.len(),
            pairs = similarities.len(),
            "computed pairwise similarities"
        );

        let mut ids: Vec<MovieId> = embeddings.keys().copied().collect();
        ids.sort_unstable();
        let mut graph =
            MovieGraphBuilder::new(self.config.edge_policy).build(&similarities, &ids)?;
        enrich_with_centrality(&mut graph, &scoped)?;
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph enriched with centrality"
        );

        Ok(PartitionArtifacts {
            decade,
            approach,
            embeddings,
            similarities,
            graph,
        })
    }

    /// Mean phrase embedding of every plot-bearing movie.
    fn embed_plots(&self, scoped: &MovieTable) -> Result<HashMap<MovieId, Vec<f32>>> {
        let embedder = TextEmbedder::new(self.model, &self.config);
        let with_plots: Vec<(&MovieRecord, &str)> = scoped
            .iter()
            .filter_map(|m| m.plot.as_deref().map(|plot| (m, plot)))
            .collect();

        with_plots
            .par_iter()
            .map(|(movie, plot)| Ok((movie.wikipedia_id, embedder.embed(plot)?)))
            .collect()
    }

    /// Indicator distribution over the decade's genre-label universe.
    fn embed_raw_genres(&self, scoped: &MovieTable) -> Result<HashMap<MovieId, Vec<f32>>> {
        let universe = genre_label_universe(scoped);
        scoped
            .iter()
            .filter(|m| !m.genres.is_empty())
            .map(|m| Ok((m.wikipedia_id, embed_indicator(&m.genres, &universe)?)))
            .collect()
    }

    /// Concatenated genre/theme classification distributions.
    fn embed_custom_genres(&self, scoped: &MovieTable) -> Result<HashMap<MovieId, Vec<f32>>> {
        let mut classified = MovieTable::new();
        for movie in scoped.iter() {
            if !movie.genres.is_empty() && !movie.themes.is_empty() {
                classified.insert(movie.clone());
            }
        }
        validate_uniform_labels(&classified)?;

        classified
            .iter()
            .map(|m| Ok((m.wikipedia_id, embed_distribution(&m.genres, &m.themes)?)))
            .collect()
    }

    /// All embeddings in a partition must share one dimensionality; for
    /// plot embeddings it must equal the model's output size.
    fn check_dimensionality(
        &self,
        embeddings: &HashMap<MovieId, Vec<f32>>,
        approach: Approach,
    ) -> Result<()> {
        let Some(reference) = embeddings.values().next() else {
            return Ok(());
        };
        let dims = reference.len();

        if approach == Approach::Plots && dims != self.model.dims() {
            return Err(CineError::Encoder(format!(
                "plot embeddings have {dims} dims, model advertises {}",
                self.model.dims()
            )));
        }
        if embeddings.values().any(|v| v.len() != dims) {
            return Err(CineError::Encoder(format!(
                "partition embeddings disagree on dimensionality (expected {dims})"
            )));
        }
        Ok(())
    }
}
