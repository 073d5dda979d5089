//! Corpus ingestion: text normalization, the cleaned movie table, and the
//! IMDb ratings join.

pub mod loader;
pub mod normalizer;
/// IMDb titles/ratings TSV join.
pub mod ratings;

pub use loader::{MovieRecord, MovieTable};
pub use normalizer::normalize_phrases;
pub use ratings::append_ratings;
