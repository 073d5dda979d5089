//! Pairwise similarity: computation, keyed storage, and matrix sampling.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::corpus::MovieTable;
use crate::errors::{CineError, Result};
use crate::types::{MovieId, PairKey};

/// Sentinel similarity for a movie compared with itself. Self-pairs are
/// never stored; the sampling routine substitutes this value instead of
/// looking one up.
pub const SELF_SIMILARITY: f32 = 100.0;

/// Cosine similarity between two vectors of equal dimensionality.
///
/// Returns 0.0 for empty, mismatched, or zero-norm inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }
    dot / denom
}

/// Sparse map from canonical movie pairs to similarity scores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimilarityMap {
    pairs: HashMap<PairKey, f32>,
}

impl SimilarityMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cosine similarity over all unordered pairs of the given embeddings.
    pub fn build_pairwise(embeddings: &HashMap<MovieId, Vec<f32>>) -> Self {
        let mut ids: Vec<MovieId> = embeddings.keys().copied().collect();
        ids.sort_unstable();

        let pairs = ids
            .par_iter()
            .enumerate()
            .flat_map_iter(|(i, &a)| {
                let ids = &ids;
                ids[i + 1..].iter().filter_map(move |&b| {
                    let key = PairKey::new(a, b)?;
                    let score = cosine_similarity(&embeddings[&a], &embeddings[&b]);
                    Some((key, score))
                })
            })
            .collect();

        Self { pairs }
    }

    /// Rebuild a map from legacy entries stored under arbitrary pair
    /// orientation. Both orientations canonicalize to the same key; a
    /// pair present twice keeps the last value seen.
    pub fn from_legacy_entries(entries: impl IntoIterator<Item = ((MovieId, MovieId), f32)>) -> Self {
        let pairs = entries
            .into_iter()
            .filter_map(|((a, b), score)| PairKey::new(a, b).map(|key| (key, score)))
            .collect();
        Self { pairs }
    }

    /// Store a pair's similarity.
    pub fn insert(&mut self, key: PairKey, score: f32) {
        self.pairs.insert(key, score);
    }

    /// Similarity for a pair, under either query orientation.
    ///
    /// Keys are canonical, so `(a, b)` and `(b, a)` probe the same entry —
    /// the legacy dual-orientation fallback collapses into one lookup. An
    /// absent pair means the map is inconsistent with its node set and is
    /// a fatal `MissingSimilarity`.
    pub fn lookup(&self, a: MovieId, b: MovieId) -> Result<f32> {
        let key = PairKey::new(a, b).ok_or(CineError::MissingSimilarity(a, b))?;
        self.pairs
            .get(&key)
            .copied()
            .ok_or(CineError::MissingSimilarity(a, b))
    }

    /// Raw entry access for a canonical key.
    pub fn get(&self, key: PairKey) -> Option<f32> {
        self.pairs.get(&key).copied()
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the map holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over stored pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PairKey, f32)> + '_ {
        self.pairs.iter().map(|(k, v)| (*k, *v))
    }

    /// Sorted distinct movie IDs appearing in any stored pair.
    pub fn movie_ids(&self) -> Vec<MovieId> {
        let mut ids: Vec<MovieId> = self
            .pairs
            .keys()
            .flat_map(|k| [k.first(), k.second()])
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// One cell of the sampled similarity matrix.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityCell {
    /// Name of the first movie.
    pub movie_1: String,
    /// Name of the second movie.
    pub movie_2: String,
    /// Similarity score, or [`SELF_SIMILARITY`] on the diagonal.
    pub similarity: f32,
}

/// Build one matrix cell, resolving names through the table.
///
/// A self-pair short-circuits to the sentinel without a lookup.
pub fn matrix_cell(
    similarities: &SimilarityMap,
    table: &MovieTable,
    id_1: MovieId,
    id_2: MovieId,
) -> Result<SimilarityCell> {
    let movie_1 = table.require(id_1)?.name.clone();
    let movie_2 = table.require(id_2)?.name.clone();
    let similarity = if id_1 == id_2 {
        SELF_SIMILARITY
    } else {
        similarities.lookup(id_1, id_2)?
    };
    Ok(SimilarityCell {
        movie_1,
        movie_2,
        similarity,
    })
}

/// Deterministically sample `movie_count` movies and emit all their
/// pairwise similarities as a flat table for matrix visualization.
pub fn sample_matrix(
    similarities: &SimilarityMap,
    table: &MovieTable,
    movie_count: usize,
    seed: u64,
) -> Result<Vec<SimilarityCell>> {
    let ids = similarities.movie_ids();
    if movie_count > ids.len() {
        return Err(CineError::Config(format!(
            "cannot sample {movie_count} movies from a similarity map covering {}",
            ids.len()
        )));
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let sampled: Vec<MovieId> = ids
        .choose_multiple(&mut rng, movie_count)
        .copied()
        .collect();

    let mut cells = Vec::with_capacity(movie_count * movie_count.saturating_sub(1) / 2);
    for (i, &id_1) in sampled.iter().enumerate() {
        for &id_2 in &sampled[i + 1..] {
            cells.push(matrix_cell(similarities, table, id_1, id_2)?);
        }
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::MovieRecord;
    use std::collections::BTreeMap;

    fn movie(id: u64, name: &str) -> MovieRecord {
        MovieRecord {
            wikipedia_id: MovieId(id),
            name: name.to_string(),
            release_year: 1990,
            rating: Some(5.0),
            num_votes: Some(10),
            plot: None,
            genres: BTreeMap::new(),
            themes: BTreeMap::new(),
        }
    }

    fn table(names: &[(u64, &str)]) -> MovieTable {
        let mut t = MovieTable::new();
        for (id, name) in names {
            t.insert(movie(*id, name));
        }
        t
    }

    #[test]
    fn cosine_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn pairwise_stores_each_pair_once_symmetrically() {
        let mut embeddings = HashMap::new();
        embeddings.insert(MovieId(1), vec![1.0, 0.0]);
        embeddings.insert(MovieId(2), vec![0.0, 1.0]);
        embeddings.insert(MovieId(3), vec![1.0, 1.0]);

        let map = SimilarityMap::build_pairwise(&embeddings);
        assert_eq!(map.len(), 3);

        // Fallback-lookup contract: both orientations resolve to the same
        // stored value.
        let ab = map.lookup(MovieId(1), MovieId(3)).unwrap();
        let ba = map.lookup(MovieId(3), MovieId(1)).unwrap();
        assert_eq!(ab, ba);
        assert!((ab - (0.5f32).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn missing_pair_is_fatal() {
        let map = SimilarityMap::new();
        let err = map.lookup(MovieId(1), MovieId(2)).unwrap_err();
        assert!(matches!(
            err,
            CineError::MissingSimilarity(MovieId(1), MovieId(2))
        ));
    }

    #[test]
    fn legacy_entries_canonicalize() {
        let map = SimilarityMap::from_legacy_entries([
            ((MovieId(9), MovieId(2)), 0.4),
            ((MovieId(2), MovieId(9)), 0.4),
        ]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.lookup(MovieId(2), MovieId(9)).unwrap(), 0.4);
    }

    #[test]
    fn self_pair_gets_the_sentinel() {
        let map = SimilarityMap::new();
        let t = table(&[(1, "Heat")]);
        let cell = matrix_cell(&map, &t, MovieId(1), MovieId(1)).unwrap();
        assert_eq!(cell.similarity, SELF_SIMILARITY);
    }

    #[test]
    fn sample_matrix_is_deterministic_and_complete() {
        let mut embeddings = HashMap::new();
        for id in 1..=5u64 {
            embeddings.insert(MovieId(id), vec![id as f32, 1.0]);
        }
        let map = SimilarityMap::build_pairwise(&embeddings);
        let t = table(&[(1, "A"), (2, "B"), (3, "C"), (4, "D"), (5, "E")]);

        let first = sample_matrix(&map, &t, 3, 23).unwrap();
        let second = sample_matrix(&map, &t, 3, 23).unwrap();
        assert_eq!(first.len(), 3);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.movie_1, b.movie_1);
            assert_eq!(a.movie_2, b.movie_2);
            assert_eq!(a.similarity, b.similarity);
        }
    }

    #[test]
    fn oversized_sample_is_a_config_error() {
        let map = SimilarityMap::new();
        let t = table(&[]);
        assert!(matches!(
            sample_matrix(&map, &t, 2, 0),
            Err(CineError::Config(_))
        ));
    }

    #[test]
    fn sampled_name_missing_from_table_is_unknown_node() {
        let mut embeddings = HashMap::new();
        embeddings.insert(MovieId(1), vec![1.0]);
        embeddings.insert(MovieId(2), vec![1.0]);
        let map = SimilarityMap::build_pairwise(&embeddings);
        let t = table(&[(1, "A")]);
        let err = sample_matrix(&map, &t, 2, 0).unwrap_err();
        assert!(matches!(err, CineError::UnknownNode(_)));
    }
}
