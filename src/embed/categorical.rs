//! Genre/theme-distribution embedding.
//!
//! Scores are laid out in lexicographic label order — the `BTreeMap`
//! iteration order — so two documents with the same label sets place the
//! same label at the same vector index. Uniformity of the label sets is a
//! batch-build precondition, validated before any vector is produced.

use std::collections::BTreeMap;

use crate::corpus::MovieTable;
use crate::embed::l2_normalize;
use crate::errors::{CineError, Result};

/// Embed a classification as genre scores followed by theme scores, each
/// block in sorted label order, L2-normalized.
pub fn embed_distribution(
    genres: &BTreeMap<String, f32>,
    themes: &BTreeMap<String, f32>,
) -> Result<Vec<f32>> {
    let mut vector: Vec<f32> = genres.values().chain(themes.values()).copied().collect();
    if vector.is_empty() {
        return Err(CineError::NoContent);
    }
    l2_normalize(&mut vector)?;
    Ok(vector)
}

/// Embed a raw label set as an indicator distribution over a fixed,
/// sorted label universe, L2-normalized.
pub fn embed_indicator(labels: &BTreeMap<String, f32>, universe: &[String]) -> Result<Vec<f32>> {
    if universe.is_empty() {
        return Err(CineError::NoContent);
    }
    let mut vector: Vec<f32> = universe
        .iter()
        .map(|label| if labels.contains_key(label) { 1.0 } else { 0.0 })
        .collect();
    l2_normalize(&mut vector)?;
    Ok(vector)
}

/// Sorted distinct genre labels across a table — the indicator universe
/// for one decade partition.
pub fn genre_label_universe(table: &MovieTable) -> Vec<String> {
    let mut labels: Vec<String> = table
        .iter()
        .flat_map(|m| m.genres.keys().cloned())
        .collect();
    labels.sort_unstable();
    labels.dedup();
    labels
}

/// Validate that every movie in the table carries the identical genre and
/// theme label sets.
///
/// Concatenated score vectors are only comparable under this condition,
/// so it is enforced at batch-build time, not at use time.
pub fn validate_uniform_labels(table: &MovieTable) -> Result<()> {
    let mut movies = table.iter();
    let Some(reference) = movies.next() else {
        return Ok(());
    };

    let genre_labels: Vec<&String> = reference.genres.keys().collect();
    let theme_labels: Vec<&String> = reference.themes.keys().collect();

    for movie in movies {
        if movie.genres.keys().ne(genre_labels.iter().copied())
            || movie.themes.keys().ne(theme_labels.iter().copied())
        {
            return Err(CineError::SchemaAssertion(format!(
                "movie {} does not share the partition's genre/theme label sets",
                movie.wikipedia_id
            )));
        }
    }
    Ok(())
}
