//! Cleaned movie-table ingestion.
//!
//! The preprocessing collaborator hands the pipeline one JSONL file with a
//! movie per line. This loader reads it into a [`MovieTable`], dropping
//! rows whose `(lowercased name, release year)` key is ambiguous — both
//! occurrences go, since that key must be unique for the ratings join.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CineError, Result};
use crate::types::{Decade, MovieId};

/// One row of the cleaned movie table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Unique movie key.
    pub wikipedia_id: MovieId,
    /// Movie title.
    pub name: String,
    /// Release year.
    pub release_year: u16,
    /// IMDb average rating; `None` when no IMDb match exists.
    #[serde(default)]
    pub rating: Option<f32>,
    /// IMDb vote count; `None` when no IMDb match exists.
    #[serde(default)]
    pub num_votes: Option<u64>,
    /// Plot summary text.
    #[serde(default)]
    pub plot: Option<String>,
    /// Genre label -> confidence score.
    #[serde(default)]
    pub genres: BTreeMap<String, f32>,
    /// Theme label -> confidence score.
    #[serde(default)]
    pub themes: BTreeMap<String, f32>,
}

impl MovieRecord {
    /// Join key against the IMDb title table: lowercased name plus year.
    pub(crate) fn name_year_key(&self) -> (String, u16) {
        (self.name.to_lowercase(), self.release_year)
    }
}

/// The cleaned table, indexed by movie ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieTable {
    movies: BTreeMap<MovieId, MovieRecord>,
}

impl MovieTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a table from a JSONL file, one movie per line.
    ///
    /// Rows sharing a `(lowercased name, release year)` key are dropped
    /// entirely, both occurrences.
    pub fn from_jsonl(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: MovieRecord = serde_json::from_str(&line).map_err(|e| {
                CineError::SchemaAssertion(format!(
                    "{}:{}: {e}",
                    path.as_ref().display(),
                    line_no + 1
                ))
            })?;
            records.push(record);
        }

        let mut key_counts: HashMap<(String, u16), usize> = HashMap::new();
        for record in &records {
            *key_counts.entry(record.name_year_key()).or_insert(0) += 1;
        }

        let total = records.len();
        let mut table = Self::new();
        for record in records {
            if key_counts[&record.name_year_key()] == 1 {
                table.insert(record);
            }
        }
        let dropped = total - table.len();
        if dropped > 0 {
            tracing::debug!(dropped, "dropped rows with ambiguous (name, year) keys");
        }

        Ok(table)
    }

    /// Insert a record, replacing any previous row with the same ID.
    pub fn insert(&mut self, record: MovieRecord) {
        self.movies.insert(record.wikipedia_id, record);
    }

    /// Row for a movie, if present.
    pub fn get(&self, id: MovieId) -> Option<&MovieRecord> {
        self.movies.get(&id)
    }

    /// Mutable row for a movie, if present.
    pub fn get_mut(&mut self, id: MovieId) -> Option<&mut MovieRecord> {
        self.movies.get_mut(&id)
    }

    /// Row for a movie, or `UnknownNode` — the attribute-lookup
    /// precondition of the centrality pass.
    pub fn require(&self, id: MovieId) -> Result<&MovieRecord> {
        self.get(id).ok_or(CineError::UnknownNode(id))
    }

    /// Number of movies in the table.
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Iterate over rows in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &MovieRecord> {
        self.movies.values()
    }

    /// Subset of movies released inside the decade.
    pub fn for_decade(&self, decade: Decade) -> MovieTable {
        let movies = self
            .movies
            .iter()
            .filter(|(_, m)| decade.contains(m.release_year))
            .map(|(id, m)| (*id, m.clone()))
            .collect();
        MovieTable { movies }
    }

    /// Subset of movies carrying both a rating and a vote count.
    ///
    /// Movies without an IMDb match are dropped here, never propagated
    /// with a sentinel rating.
    pub fn rated(&self) -> MovieTable {
        let movies = self
            .movies
            .iter()
            .filter(|(_, m)| m.rating.is_some() && m.num_votes.is_some())
            .map(|(id, m)| (*id, m.clone()))
            .collect();
        MovieTable { movies }
    }
}
