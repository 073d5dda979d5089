//! Decade partition store.
//! Saves/loads per-(decade, approach): metadata, embeddings, similarities,
//! and the enriched graph.
//!
//! Writes stage into a `.tmp` sibling directory and rename into place, so
//! a partially-written partition is never visible to readers. Partitions
//! are assumed pre-built: the store never lazily computes.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::errors::{CineError, Result};
use crate::graph::MovieGraph;
use crate::pipeline::PartitionArtifacts;
use crate::similarity::SimilarityMap;
use crate::types::{Approach, Decade, MovieId};

const METADATA_FILE: &str = "metadata.json";
const EMBEDDINGS_FILE: &str = "embeddings.bin";
const SIMILARITIES_FILE: &str = "similarities.bin";
const GRAPH_FILE: &str = "graph.bin";

/// Metadata stored with each partition.
#[derive(Debug, Serialize, Deserialize)]
pub struct PartitionMetadata {
    /// Version of the library that built the partition.
    pub version: String,
    /// ISO 8601 timestamp of creation.
    pub created_at: String,
    /// Decade the partition covers.
    pub decade: Decade,
    /// Embedding approach the partition was built with.
    pub approach: Approach,
    /// Configuration used for the build.
    pub config: PipelineConfig,
}

impl PartitionMetadata {
    /// Create new metadata with the current version and timestamp.
    pub fn new(decade: Decade, approach: Approach, config: &PipelineConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            decade,
            approach,
            config: config.clone(),
        }
    }
}

/// Keyed read/write access to partitions under one root directory.
#[derive(Debug, Clone)]
pub struct PartitionStore {
    root: PathBuf,
}

impl PartitionStore {
    /// Create a store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory a partition lives in: `<root>/<approach>/<decade>s`.
    pub fn partition_dir(&self, decade: Decade, approach: Approach) -> PathBuf {
        self.root.join(approach.dir_name()).join(decade.label())
    }

    /// Persist a built partition atomically.
    pub fn save(&self, artifacts: &PartitionArtifacts, config: &PipelineConfig) -> Result<()> {
        let final_dir = self.partition_dir(artifacts.decade, artifacts.approach);
        let staging = final_dir.with_extension("tmp");
        if staging.exists() {
            std::fs::remove_dir_all(&staging)?;
        }
        std::fs::create_dir_all(&staging)?;

        let metadata = PartitionMetadata::new(artifacts.decade, artifacts.approach, config);
        let meta_file = File::create(staging.join(METADATA_FILE))?;
        serde_json::to_writer_pretty(meta_file, &metadata)?;

        let embeddings_file = File::create(staging.join(EMBEDDINGS_FILE))?;
        bincode::serialize_into(BufWriter::new(embeddings_file), &artifacts.embeddings)?;

        let similarities_file = File::create(staging.join(SIMILARITIES_FILE))?;
        bincode::serialize_into(BufWriter::new(similarities_file), &artifacts.similarities)?;

        let graph_file = File::create(staging.join(GRAPH_FILE))?;
        bincode::serialize_into(BufWriter::new(graph_file), &artifacts.graph)?;

        if final_dir.exists() {
            std::fs::remove_dir_all(&final_dir)?;
        }
        std::fs::rename(&staging, &final_dir)?;

        tracing::info!(dir = %final_dir.display(), "partition saved");
        Ok(())
    }

    /// Load a pre-built partition.
    pub fn load(
        &self,
        decade: Decade,
        approach: Approach,
    ) -> Result<(PartitionMetadata, PartitionArtifacts)> {
        let dir = self.partition_dir(decade, approach);
        if !dir.is_dir() {
            return Err(CineError::PartitionNotFound(format!(
                "{approach}/{decade} (no directory at {})",
                dir.display()
            )));
        }

        let metadata: PartitionMetadata =
            serde_json::from_reader(BufReader::new(open_artifact(&dir, METADATA_FILE)?))?;

        let embeddings: HashMap<MovieId, Vec<f32>> =
            bincode::deserialize_from(BufReader::new(open_artifact(&dir, EMBEDDINGS_FILE)?))?;

        let similarities: SimilarityMap =
            bincode::deserialize_from(BufReader::new(open_artifact(&dir, SIMILARITIES_FILE)?))?;

        let graph: MovieGraph =
            bincode::deserialize_from(BufReader::new(open_artifact(&dir, GRAPH_FILE)?))?;

        let artifacts = PartitionArtifacts {
            decade,
            approach,
            embeddings,
            similarities,
            graph,
        };
        Ok((metadata, artifacts))
    }
}

/// Open one artifact file; a missing file means the partition was never
/// (fully) built.
fn open_artifact(dir: &Path, name: &str) -> Result<File> {
    let path = dir.join(name);
    File::open(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CineError::PartitionNotFound(format!("missing artifact {}", path.display()))
        } else {
            CineError::Io(e)
        }
    })
}

/// Read a legacy embeddings JSON file: movie IDs as string keys, vectors
/// as number arrays.
pub fn load_legacy_embeddings(path: &Path) -> Result<HashMap<MovieId, Vec<f32>>> {
    let raw: HashMap<String, Vec<f32>> =
        serde_json::from_reader(BufReader::new(File::open(path)?))?;
    raw.into_iter()
        .map(|(key, vector)| {
            let id = key
                .trim()
                .parse::<u64>()
                .map_err(|_| CineError::SchemaAssertion(format!("bad movie id key: {key:?}")))?;
            Ok((MovieId(id), vector))
        })
        .collect()
}

/// Read a legacy similarities JSON file keyed by `"id1-id2"` strings in
/// either orientation; keys canonicalize on ingest.
pub fn load_legacy_similarities(path: &Path) -> Result<SimilarityMap> {
    let raw: HashMap<String, f32> = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    let mut map = SimilarityMap::new();
    for (key, score) in raw {
        map.insert(crate::types::PairKey::parse_legacy(&key)?, score);
    }
    Ok(map)
}
