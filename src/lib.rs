#![forbid(unsafe_code)]
#![deny(missing_debug_implementations, missing_docs, rust_2018_idioms)]

//! # cinegraph
//!
//! Decade-partitioned similarity graphs over movie plots and genres:
//! - plot/genre embeddings behind a pluggable encoding-model interface
//! - pairwise cosine similarity under canonical pair keys
//! - graph materialization with configurable edge-formation policies
//! - degree and betweenness centrality enrichment
//! - atomic, keyed partition persistence per `(decade, approach)`
//!
//! The pipeline is deterministic, batch-oriented, and fail-fast: a bad
//! partition aborts instead of producing misleading metrics.

pub mod config;
pub mod corpus;
pub mod embed;
pub mod errors;
pub mod graph;
/// Decade partition persistence.
pub mod persistence;
/// High-level pipelines.
pub mod pipeline;
/// Pairwise similarity engine.
pub mod similarity;
pub mod types;

pub use config::{EdgePolicy, PipelineConfig};
pub use corpus::{MovieRecord, MovieTable};
pub use embed::EncodingModel;
pub use errors::{CineError, Result};
pub use graph::MovieGraph;
pub use persistence::PartitionStore;
pub use pipeline::{PartitionArtifacts, PartitionBuildPipeline};
pub use similarity::SimilarityMap;
pub use types::{Approach, Decade, MovieId, PairKey};
