//! Common core types used across the pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CineError, Result};

/// Wikipedia page ID identifying a movie. Stable across decades.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for MovieId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Canonical unordered pair of distinct movie IDs, smaller ID first.
///
/// Replaces the legacy string-encoded `"id1-id2"` keys: a pair has exactly
/// one representation, so lookups never need a dual-orientation fallback.
/// Legacy data stored under either orientation is canonicalized on ingest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PairKey(MovieId, MovieId);

impl PairKey {
    /// Build the canonical key for two distinct movies.
    ///
    /// Returns `None` for a self-pair: self-pairs are never stored in a
    /// similarity map.
    pub fn new(a: MovieId, b: MovieId) -> Option<Self> {
        if a == b {
            return None;
        }
        Some(if a < b { Self(a, b) } else { Self(b, a) })
    }

    /// Smaller endpoint of the pair.
    pub fn first(&self) -> MovieId {
        self.0
    }

    /// Larger endpoint of the pair.
    pub fn second(&self) -> MovieId {
        self.1
    }

    /// Parse a legacy `"id1-id2"` string key, in either orientation.
    pub fn parse_legacy(key: &str) -> Result<Self> {
        let mut parts = key.splitn(2, '-');
        let a = parts
            .next()
            .and_then(|p| p.trim().parse::<u64>().ok())
            .ok_or_else(|| CineError::SchemaAssertion(format!("bad pair key: {key:?}")))?;
        let b = parts
            .next()
            .and_then(|p| p.trim().parse::<u64>().ok())
            .ok_or_else(|| CineError::SchemaAssertion(format!("bad pair key: {key:?}")))?;
        Self::new(MovieId(a), MovieId(b))
            .ok_or_else(|| CineError::SchemaAssertion(format!("self-pair key: {key:?}")))
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// Start year of a 10-year bucket, e.g. `Decade(1990)` covers 1990-1999.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Decade(u16);

impl Decade {
    /// Earliest decade in the corpus.
    pub const MIN_START: u16 = 1900;
    /// Latest decade in the corpus.
    pub const MAX_START: u16 = 2010;

    /// Build a decade from its start year. The year must be a multiple of
    /// ten inside the corpus range.
    pub fn from_start_year(year: u16) -> Result<Self> {
        if year % 10 != 0 || !(Self::MIN_START..=Self::MAX_START).contains(&year) {
            return Err(CineError::Config(format!(
                "invalid decade start year: {year} (expected a multiple of 10 in {}..={})",
                Self::MIN_START,
                Self::MAX_START
            )));
        }
        Ok(Self(year))
    }

    /// Bucket a release year into its decade; `None` outside the corpus range.
    pub fn from_release_year(year: u16) -> Option<Self> {
        let start = year - year % 10;
        (Self::MIN_START..=Self::MAX_START)
            .contains(&start)
            .then_some(Self(start))
    }

    /// Start year of the bucket.
    pub fn start_year(&self) -> u16 {
        self.0
    }

    /// Whether a release year falls inside this bucket.
    pub fn contains(&self, year: u16) -> bool {
        self.0 <= year && year < self.0 + 10
    }

    /// Human-readable label, e.g. `"1990s"`. Also the on-disk directory name.
    pub fn label(&self) -> String {
        format!("{}s", self.0)
    }

    /// All decades of the corpus, earliest first.
    pub fn all() -> impl Iterator<Item = Decade> {
        (Self::MIN_START..=Self::MAX_START).step_by(10).map(Decade)
    }
}

impl fmt::Display for Decade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Embedding strategy a partition was built with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Approach {
    /// Mean sentence embedding of the plot summary.
    Plots,
    /// Indicator distribution over the decade's genre-label universe.
    RawGenres,
    /// Concatenated genre/theme classification score distributions.
    CustomGenres,
}

impl Approach {
    /// On-disk directory name for the approach.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Approach::Plots => "plots",
            Approach::RawGenres => "raw_genres",
            Approach::CustomGenres => "custom_genres",
        }
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Approach {
    type Err = CineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plots" => Ok(Approach::Plots),
            "raw_genres" => Ok(Approach::RawGenres),
            "custom_genres" => Ok(Approach::CustomGenres),
            other => Err(CineError::Config(format!("unknown approach: {other:?}"))),
        }
    }
}
