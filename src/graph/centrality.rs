//! Centrality enrichment: table attributes, degree, betweenness, and the
//! log-transformed variant.

use std::collections::VecDeque;

use petgraph::graph::{NodeIndex, UnGraph};

use crate::corpus::MovieTable;
use crate::errors::Result;
use crate::graph::{MovieGraph, MovieNode, SimilarityEdge};

/// Epsilon keeping the betweenness logarithm finite at zero centrality.
/// Isolated nodes end up at `ln(1e-4) ≈ -9.21`.
pub const LOG_EPSILON: f64 = 1e-4;

/// Attach table attributes and centrality metrics to every node.
///
/// Copies `name`, `release_year`, and `rating` from the source table
/// (every node must have a row — `UnknownNode` otherwise), then computes
/// `degree`, normalized shortest-path `betweenness`, and
/// `log_betweenness = ln(betweenness + 1e-4)`.
///
/// Deterministic for a fixed graph and table.
pub fn enrich_with_centrality(graph: &mut MovieGraph, table: &MovieTable) -> Result<()> {
    let indices: Vec<NodeIndex> = graph.inner().node_indices().collect();

    for &idx in &indices {
        let id = graph.inner()[idx].wikipedia_id;
        let record = table.require(id)?;
        let name = record.name.clone();
        let release_year = record.release_year;
        let rating = record.rating;

        let node = &mut graph.inner_mut()[idx];
        node.name = name;
        node.release_year = release_year;
        node.rating = rating;
    }

    for &idx in &indices {
        let degree = graph.inner().neighbors(idx).count() as u32;
        graph.inner_mut()[idx].degree = degree;
    }

    let centrality = betweenness_centrality(graph.inner());
    for idx in indices {
        let betweenness = centrality[idx.index()];
        let node = &mut graph.inner_mut()[idx];
        node.betweenness = betweenness;
        node.log_betweenness = (betweenness + LOG_EPSILON).ln();
    }

    Ok(())
}

/// Brandes shortest-path betweenness over an unweighted undirected graph.
///
/// Accumulates dependencies from every source via BFS, then rescales by
/// `1 / ((n - 1)(n - 2))` for `n > 2` — the usual normalization for
/// undirected graphs, with the double-counting of each unordered pair
/// folded into the factor.
fn betweenness_centrality(graph: &UnGraph<MovieNode, SimilarityEdge>) -> Vec<f64> {
    let n = graph.node_count();
    let mut centrality = vec![0.0f64; n];

    for source in graph.node_indices() {
        let s = source.index();

        let mut stack = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut dist = vec![-1i64; n];
        let mut queue = VecDeque::new();

        sigma[s] = 1.0;
        dist[s] = 0;
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for neighbor in graph.neighbors(NodeIndex::new(v)) {
                let w = neighbor.index();
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
        for value in &mut centrality {
            *value *= scale;
        }
    }
    centrality
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EdgePolicy;
    use crate::corpus::MovieRecord;
    use crate::graph::MovieGraphBuilder;
    use crate::similarity::SimilarityMap;
    use crate::types::{MovieId, PairKey};
    use std::collections::BTreeMap;

    fn table_for(ids: &[u64]) -> MovieTable {
        let mut table = MovieTable::new();
        for &id in ids {
            table.insert(MovieRecord {
                wikipedia_id: MovieId(id),
                name: format!("movie-{id}"),
                release_year: 1990,
                rating: Some(id as f32),
                num_votes: Some(100),
                plot: None,
                genres: BTreeMap::new(),
                themes: BTreeMap::new(),
            });
        }
        table
    }

    fn graph_of(pairs: &[(u64, u64)], nodes: &[u64]) -> MovieGraph {
        let mut similarities = SimilarityMap::new();
        for &(a, b) in pairs {
            similarities.insert(PairKey::new(MovieId(a), MovieId(b)).unwrap(), 1.0);
        }
        let ids: Vec<MovieId> = nodes.iter().copied().map(MovieId).collect();
        MovieGraphBuilder::new(EdgePolicy::Full)
            .build(&similarities, &ids)
            .unwrap()
    }

    #[test]
    fn path_middle_has_full_betweenness() {
        let mut graph = graph_of(&[(1, 2), (2, 3)], &[1, 2, 3]);
        enrich_with_centrality(&mut graph, &table_for(&[1, 2, 3])).unwrap();

        let middle = graph.node(MovieId(2)).unwrap();
        let end = graph.node(MovieId(1)).unwrap();
        assert!((middle.betweenness - 1.0).abs() < 1e-12);
        assert_eq!(end.betweenness, 0.0);
        assert_eq!(middle.degree, 2);
        assert_eq!(end.degree, 1);
    }

    #[test]
    fn star_center_has_full_betweenness() {
        let mut graph = graph_of(&[(1, 2), (1, 3), (1, 4)], &[1, 2, 3, 4]);
        enrich_with_centrality(&mut graph, &table_for(&[1, 2, 3, 4])).unwrap();

        let center = graph.node(MovieId(1)).unwrap();
        assert!((center.betweenness - 1.0).abs() < 1e-12);
        for id in [2, 3, 4] {
            assert_eq!(graph.node(MovieId(id)).unwrap().betweenness, 0.0);
        }
    }

    #[test]
    fn log_betweenness_matches_the_epsilon_shifted_log_exactly() {
        let mut graph = graph_of(&[(1, 2), (2, 3), (3, 4)], &[1, 2, 3, 4]);
        enrich_with_centrality(&mut graph, &table_for(&[1, 2, 3, 4])).unwrap();

        for node in graph.nodes() {
            assert_eq!(node.log_betweenness, (node.betweenness + LOG_EPSILON).ln());
        }
    }

    #[test]
    fn isolated_node_metrics() {
        let mut graph = graph_of(&[(1, 2)], &[1, 2, 3]);
        enrich_with_centrality(&mut graph, &table_for(&[1, 2, 3])).unwrap();

        let isolated = graph.node(MovieId(3)).unwrap();
        assert_eq!(isolated.degree, 0);
        assert_eq!(isolated.betweenness, 0.0);
        assert_eq!(isolated.log_betweenness, LOG_EPSILON.ln());
        assert!((isolated.log_betweenness + 9.21034).abs() < 1e-5);
    }

    #[test]
    fn table_attributes_are_copied_onto_nodes() {
        let mut graph = graph_of(&[(1, 2)], &[1, 2]);
        enrich_with_centrality(&mut graph, &table_for(&[1, 2])).unwrap();

        let node = graph.node(MovieId(1)).unwrap();
        assert_eq!(node.name, "movie-1");
        assert_eq!(node.release_year, 1990);
        assert_eq!(node.rating, Some(1.0));
    }

    #[test]
    fn node_without_table_row_is_unknown() {
        let mut graph = graph_of(&[(1, 2)], &[1, 2]);
        let err = enrich_with_centrality(&mut graph, &table_for(&[1])).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::CineError::UnknownNode(MovieId(2))
        ));
    }
}
