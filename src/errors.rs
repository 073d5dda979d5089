//! Error types for cinegraph.

use thiserror::Error;

use crate::types::MovieId;

/// Top-level error type for pipeline operations.
///
/// Everything here is fatal to the partition build that raised it: this is
/// a batch pipeline, and a bad partition must not produce misleading
/// metrics. The one expected absence — a movie without an IMDb match — is
/// modeled as an `Option` on the record, not as an error.
#[derive(Debug, Error)]
pub enum CineError {
    /// Configuration-related errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// Normalizing a text produced no phrases to embed.
    #[error("no content: text yielded no phrases to embed")]
    NoContent,

    /// A zero-norm vector cannot be unit-normalized.
    #[error("degenerate vector: zero norm cannot be normalized")]
    DegenerateVector,

    /// A pair is absent from the similarity map under both orientations.
    #[error("missing similarity for pair ({0}, {1})")]
    MissingSimilarity(MovieId, MovieId),

    /// A graph node has no corresponding row in the source table.
    #[error("unknown node: movie {0} has no row in the source table")]
    UnknownNode(MovieId),

    /// A decade/approach partition has not been built.
    #[error("partition not found: {0}")]
    PartitionNotFound(String),

    /// An ingested external file does not match the expected schema.
    #[error("schema assertion failed: {0}")]
    SchemaAssertion(String),

    /// The encoding model misbehaved (wrong batch size or dimensionality).
    #[error("encoder error: {0}")]
    Encoder(String),

    /// I/O error wrapper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serde serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Bincode artifact encoding error.
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, CineError>;
