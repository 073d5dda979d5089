//! IMDb ratings join.
//!
//! Reads the IMDb `titles.tsv` and `ratings.tsv` exports (tab-separated,
//! header row, `\N` nulls) and attaches `averageRating` / `numVotes` to
//! movies by matching lowercased `(title, year)` keys. Movies without a
//! match keep `rating = None` — expected absence, filtered downstream.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::corpus::MovieTable;
use crate::errors::{CineError, Result};
use crate::types::MovieId;

/// Null marker used by the IMDb TSV exports.
const IMDB_NULL: &str = "\\N";

/// Attach IMDb ratings to every matching movie in the table.
///
/// `data_dir` must contain `titles.tsv` and `ratings.tsv`. Returns the
/// number of movies that received a rating.
pub fn append_ratings(table: &mut MovieTable, data_dir: &Path) -> Result<usize> {
    let titles = load_title_index(&data_dir.join("titles.tsv"))?;
    let ratings = load_ratings(&data_dir.join("ratings.tsv"))?;

    let keys: Vec<(MovieId, (String, u16))> = table
        .iter()
        .map(|m| (m.wikipedia_id, m.name_year_key()))
        .collect();

    let mut matched = 0;
    for (id, key) in keys {
        let Some(tconst) = titles.get(&key) else {
            continue;
        };
        let Some(&(rating, votes)) = ratings.get(tconst) else {
            continue;
        };
        if let Some(record) = table.get_mut(id) {
            record.rating = Some(rating);
            record.num_votes = Some(votes);
            matched += 1;
        }
    }

    tracing::info!(matched, total = table.len(), "attached IMDb ratings");
    Ok(matched)
}

/// Validate a header row and map required column names to indexes.
fn header_indexes(
    path: &Path,
    header: &str,
    required: &[&str],
) -> Result<HashMap<String, usize>> {
    let columns: HashMap<String, usize> = header
        .split('\t')
        .enumerate()
        .map(|(i, name)| (name.trim().to_string(), i))
        .collect();

    for col in required {
        if !columns.contains_key(*col) {
            return Err(CineError::SchemaAssertion(format!(
                "{} must contain the {col} column",
                path.display()
            )));
        }
    }
    Ok(columns)
}

/// `(lowercased title, year)` -> `tconst`, restricted to `titleType == "movie"`.
///
/// Ambiguous `(title, year)` keys are dropped entirely, both occurrences —
/// the same rule the table loader applies on its side of the join.
fn load_title_index(path: &Path) -> Result<HashMap<(String, u16), String>> {
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    let header = lines.next().transpose()?.ok_or_else(|| {
        CineError::SchemaAssertion(format!("{} is empty", path.display()))
    })?;
    let columns = header_indexes(
        path,
        &header,
        &["tconst", "titleType", "originalTitle", "startYear"],
    )?;
    let tconst_ix = columns["tconst"];
    let type_ix = columns["titleType"];
    let title_ix = columns["originalTitle"];
    let year_ix = columns["startYear"];

    let mut index: HashMap<(String, u16), String> = HashMap::new();
    let mut ambiguous: HashSet<(String, u16)> = HashSet::new();

    for line in lines {
        let line = line?;
        let fields: Vec<&str> = line.split('\t').collect();
        let (Some(tconst), Some(title_type), Some(title), Some(year)) = (
            fields.get(tconst_ix),
            fields.get(type_ix),
            fields.get(title_ix),
            fields.get(year_ix),
        ) else {
            continue;
        };

        if *title_type != "movie" || *title == IMDB_NULL || *year == IMDB_NULL {
            continue;
        }
        let Ok(year) = year.parse::<u16>() else {
            continue;
        };

        let key = (title.to_lowercase(), year);
        if ambiguous.contains(&key) {
            continue;
        }
        if index.remove(&key).is_some() {
            ambiguous.insert(key);
            continue;
        }
        index.insert(key, tconst.to_string());
    }

    Ok(index)
}

/// `tconst` -> `(averageRating, numVotes)`.
fn load_ratings(path: &Path) -> Result<HashMap<String, (f32, u64)>> {
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    let header = lines.next().transpose()?.ok_or_else(|| {
        CineError::SchemaAssertion(format!("{} is empty", path.display()))
    })?;
    let columns = header_indexes(path, &header, &["tconst", "averageRating", "numVotes"])?;
    let tconst_ix = columns["tconst"];
    let rating_ix = columns["averageRating"];
    let votes_ix = columns["numVotes"];

    let mut ratings = HashMap::new();
    for line in lines {
        let line = line?;
        let fields: Vec<&str> = line.split('\t').collect();
        let (Some(tconst), Some(rating), Some(votes)) = (
            fields.get(tconst_ix),
            fields.get(rating_ix),
            fields.get(votes_ix),
        ) else {
            continue;
        };
        if *rating == IMDB_NULL || *votes == IMDB_NULL {
            continue;
        }
        let (Ok(rating), Ok(votes)) = (rating.parse::<f32>(), votes.parse::<u64>()) else {
            continue;
        };
        ratings.insert(tconst.to_string(), (rating, votes));
    }

    Ok(ratings)
}
