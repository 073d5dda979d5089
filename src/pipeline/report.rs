//! Tabular outputs consumed by the visualization layer.
//!
//! Two tables leave the core: the metrics-joined movie table and the
//! sampled similarity matrix ([`crate::similarity::sample_matrix`]).

use serde::Serialize;

use crate::corpus::MovieTable;
use crate::errors::Result;
use crate::graph::MovieGraph;
use crate::types::MovieId;

/// One row of the metrics-joined movie table: the movie's columns with
/// `degree`, `betweenness`, and `log_betweenness` appended.
#[derive(Debug, Clone, Serialize)]
pub struct MovieMetricsRow {
    /// Movie ID.
    pub wikipedia_id: MovieId,
    /// Movie title.
    pub name: String,
    /// Release year.
    pub release_year: u16,
    /// IMDb rating.
    pub rating: Option<f32>,
    /// Unweighted neighbor count.
    pub degree: u32,
    /// Normalized betweenness centrality.
    pub betweenness: f64,
    /// `ln(betweenness + 1e-4)`.
    pub log_betweenness: f64,
}

/// Join graph metrics back onto the source table, one row per node.
///
/// Inner-join semantics: only movies with a graph node produce a row,
/// and every node must have a table row (`UnknownNode` otherwise).
/// Rows come back in ID order.
pub fn metrics_table(graph: &MovieGraph, table: &MovieTable) -> Result<Vec<MovieMetricsRow>> {
    let mut rows: Vec<MovieMetricsRow> = graph
        .nodes()
        .map(|node| {
            let record = table.require(node.wikipedia_id)?;
            Ok(MovieMetricsRow {
                wikipedia_id: node.wikipedia_id,
                name: record.name.clone(),
                release_year: record.release_year,
                rating: record.rating,
                degree: node.degree,
                betweenness: node.betweenness,
                log_betweenness: node.log_betweenness,
            })
        })
        .collect::<Result<_>>()?;

    rows.sort_by_key(|row| row.wikipedia_id);
    Ok(rows)
}
