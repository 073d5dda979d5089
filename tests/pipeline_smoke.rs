use std::collections::BTreeMap;

use cinegraph::corpus::MovieRecord;
use cinegraph::embed::{l2_normalize, EncodingModel};
use cinegraph::graph::LOG_EPSILON;
use cinegraph::pipeline::metrics_table;
use cinegraph::similarity::{matrix_cell, sample_matrix, SELF_SIMILARITY};
use cinegraph::{
    Approach, CineError, Decade, MovieId, MovieTable, PartitionBuildPipeline, PartitionStore,
    PipelineConfig, Result,
};

/// Fixed-vocabulary bag-of-words encoder: each known token owns one
/// vector slot, so phrase similarities are fully predictable.
struct VocabModel {
    vocab: Vec<&'static str>,
}

impl VocabModel {
    fn new() -> Self {
        Self {
            vocab: vec![
                "query", "a", "cat", "chases", "mouse", "dog", "spaceship", "explodes",
            ],
        }
    }
}

impl EncodingModel for VocabModel {
    fn dims(&self) -> usize {
        self.vocab.len()
    }

    fn encode(&self, texts: &[String], normalize: bool) -> Result<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|text| {
                let mut vector = vec![0.0f32; self.vocab.len()];
                for token in text.split(|c: char| !c.is_alphanumeric()) {
                    if token.is_empty() {
                        continue;
                    }
                    let token = token.to_lowercase();
                    if let Some(slot) = self.vocab.iter().position(|w| *w == token) {
                        vector[slot] += 1.0;
                    }
                }
                if normalize {
                    l2_normalize(&mut vector)?;
                }
                Ok(vector)
            })
            .collect()
    }
}

fn movie(id: u64, name: &str, year: u16, rating: Option<f32>, plot: Option<&str>) -> MovieRecord {
    MovieRecord {
        wikipedia_id: MovieId(id),
        name: name.to_string(),
        release_year: year,
        rating,
        num_votes: rating.map(|_| 1000),
        plot: plot.map(str::to_string),
        genres: BTreeMap::new(),
        themes: BTreeMap::new(),
    }
}

fn three_movie_table() -> MovieTable {
    let mut table = MovieTable::new();
    table.insert(movie(
        1,
        "Cat and Mouse",
        1994,
        Some(7.2),
        Some("A cat chases a mouse."),
    ));
    table.insert(movie(
        2,
        "Dog Days",
        1996,
        Some(6.8),
        Some("A dog chases a cat."),
    ));
    table.insert(movie(
        3,
        "Deep Space",
        1999,
        Some(8.1),
        Some("A spaceship explodes."),
    ));
    // No IMDb match: must be dropped by the build, not carried along.
    table.insert(movie(
        4,
        "Unrated Obscurity",
        1995,
        None,
        Some("A cat chases a dog."),
    ));
    // Rated, but outside the decade.
    table.insert(movie(
        5,
        "Wrong Decade",
        2005,
        Some(7.5),
        Some("A spaceship chases a cat."),
    ));
    table
}

#[test]
fn three_movie_full_clique_end_to_end() {
    let table = three_movie_table();
    let model = VocabModel::new();
    let pipeline = PartitionBuildPipeline::new(PipelineConfig::default(), &model);
    let decade = Decade::from_start_year(1990).unwrap();

    let artifacts = pipeline.build(&table, decade, Approach::Plots).unwrap();

    assert_eq!(artifacts.embeddings.len(), 3);
    assert!(!artifacts.embeddings.contains_key(&MovieId(4)));
    assert!(!artifacts.embeddings.contains_key(&MovieId(5)));
    for embedding in artifacts.embeddings.values() {
        assert_eq!(embedding.len(), model.dims());
        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    // Full clique over three movies: exactly three edges.
    assert_eq!(artifacts.graph.node_count(), 3);
    assert_eq!(artifacts.graph.edge_count(), 3);

    // The two chase plots are semantically closer to each other than
    // either is to the spaceship plot.
    let s12 = artifacts.similarities.lookup(MovieId(1), MovieId(2)).unwrap();
    let s13 = artifacts.similarities.lookup(MovieId(1), MovieId(3)).unwrap();
    let s23 = artifacts.similarities.lookup(MovieId(2), MovieId(3)).unwrap();
    assert!(s12 > s13, "expected {s12} > {s13}");
    assert!(s12 > s23, "expected {s12} > {s23}");

    // Complete graph: every node has degree 2 and zero betweenness, and
    // the log transform matches the epsilon-shifted log exactly.
    for node in artifacts.graph.nodes() {
        assert_eq!(node.degree, 2);
        assert_eq!(node.betweenness, 0.0);
        assert_eq!(node.log_betweenness, (node.betweenness + LOG_EPSILON).ln());
        assert!(node.rating.is_some());
    }
}

#[test]
fn metrics_table_drops_nothing_and_invents_nothing() {
    let table = three_movie_table();
    let model = VocabModel::new();
    let pipeline = PartitionBuildPipeline::new(PipelineConfig::default(), &model);
    let decade = Decade::from_start_year(1990).unwrap();
    let artifacts = pipeline.build(&table, decade, Approach::Plots).unwrap();

    let rows = metrics_table(&artifacts.graph, &table).unwrap();
    assert_eq!(rows.len(), 3);
    let ids: Vec<MovieId> = rows.iter().map(|r| r.wikipedia_id).collect();
    assert_eq!(ids, vec![MovieId(1), MovieId(2), MovieId(3)]);
    for row in &rows {
        assert!(row.rating.is_some());
        assert_eq!(row.log_betweenness, (row.betweenness + LOG_EPSILON).ln());
    }
}

#[test]
fn partition_store_round_trip_and_matrix_sampling() {
    let table = three_movie_table();
    let model = VocabModel::new();
    let pipeline = PartitionBuildPipeline::new(PipelineConfig::default(), &model);
    let decade = Decade::from_start_year(1990).unwrap();
    let artifacts = pipeline.build(&table, decade, Approach::Plots).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let store = PartitionStore::new(dir.path());
    let config = PipelineConfig::default();
    store.save(&artifacts, &config).unwrap();

    let (metadata, loaded) = store.load(decade, Approach::Plots).unwrap();
    assert_eq!(metadata.decade, decade);
    assert_eq!(loaded.graph.node_count(), artifacts.graph.node_count());

    // Sampled matrix over every movie in the partition.
    let cells = sample_matrix(&loaded.similarities, &table, 3, 23).unwrap();
    assert_eq!(cells.len(), 3);
    for cell in &cells {
        assert!(cell.similarity <= 1.0);
    }

    // Self-pair sentinel, for any sampled set.
    for id in [1u64, 2, 3] {
        let cell = matrix_cell(&loaded.similarities, &table, MovieId(id), MovieId(id)).unwrap();
        assert_eq!(cell.similarity, SELF_SIMILARITY);
    }

    // A partition that was never built stays an error.
    let other = Decade::from_start_year(1950).unwrap();
    let err = store.load(other, Approach::Plots).unwrap_err();
    assert!(matches!(err, CineError::PartitionNotFound(_)));
}

#[test]
fn custom_genre_partition_aligns_and_validates_label_sets() {
    let genres = |action: f32, drama: f32| -> BTreeMap<String, f32> {
        [("action".to_string(), action), ("drama".to_string(), drama)]
            .into_iter()
            .collect()
    };
    let themes = |war: f32| -> BTreeMap<String, f32> {
        [("war".to_string(), war)].into_iter().collect()
    };

    let mut table = MovieTable::new();
    let mut first = movie(1, "First", 1991, Some(6.0), None);
    first.genres = genres(0.9, 0.1);
    first.themes = themes(0.4);
    table.insert(first);
    let mut second = movie(2, "Second", 1992, Some(7.0), None);
    second.genres = genres(0.2, 0.8);
    second.themes = themes(0.9);
    table.insert(second);

    let model = VocabModel::new();
    let pipeline = PartitionBuildPipeline::new(PipelineConfig::default(), &model);
    let decade = Decade::from_start_year(1990).unwrap();

    let artifacts = pipeline
        .build(&table, decade, Approach::CustomGenres)
        .unwrap();
    assert_eq!(artifacts.embeddings.len(), 2);
    // Identical label sets -> identical layout: genre scores first in
    // sorted label order, then theme scores.
    let first = &artifacts.embeddings[&MovieId(1)];
    let second = &artifacts.embeddings[&MovieId(2)];
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);
    // movie 1: (0.9, 0.1, 0.4) normalized -> action is the largest slot.
    assert!(first[0] > first[1] && first[0] > first[2]);
    // movie 2: (0.2, 0.8, 0.9) normalized -> war is the largest slot.
    assert!(second[2] > second[0] && second[2] > second[1]);

    // A movie with a diverging label set fails the batch-time validation.
    let mut stray = movie(3, "Stray", 1993, Some(5.0), None);
    stray.genres = [("comedy".to_string(), 1.0)].into_iter().collect();
    stray.themes = themes(0.5);
    table.insert(stray);

    let err = pipeline
        .build(&table, decade, Approach::CustomGenres)
        .unwrap_err();
    assert!(matches!(err, CineError::SchemaAssertion(_)));
}

#[test]
fn raw_genre_partition_embeds_over_a_shared_universe() {
    let labels = |names: &[&str]| -> BTreeMap<String, f32> {
        names.iter().map(|n| (n.to_string(), 1.0)).collect()
    };

    let mut table = MovieTable::new();
    let mut first = movie(1, "First", 1991, Some(6.0), None);
    first.genres = labels(&["action", "thriller"]);
    table.insert(first);
    let mut second = movie(2, "Second", 1992, Some(7.0), None);
    second.genres = labels(&["action", "romance"]);
    table.insert(second);
    let mut third = movie(3, "Third", 1993, Some(7.5), None);
    third.genres = labels(&["documentary"]);
    table.insert(third);

    let model = VocabModel::new();
    let pipeline = PartitionBuildPipeline::new(PipelineConfig::default(), &model);
    let decade = Decade::from_start_year(1990).unwrap();
    let artifacts = pipeline.build(&table, decade, Approach::RawGenres).unwrap();

    // Universe: action, documentary, romance, thriller.
    for embedding in artifacts.embeddings.values() {
        assert_eq!(embedding.len(), 4);
    }
    let s12 = artifacts.similarities.lookup(MovieId(1), MovieId(2)).unwrap();
    let s13 = artifacts.similarities.lookup(MovieId(1), MovieId(3)).unwrap();
    // Shared "action" beats no overlap at all.
    assert!(s12 > s13);
    assert_eq!(s13, 0.0);
}
