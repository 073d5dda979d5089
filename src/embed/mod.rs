//! Embedding: the encoding-model capability interface, vector helpers,
//! and the per-approach embedder variants.

pub mod categorical;
pub mod hashed;
pub mod text;

pub use categorical::{
    embed_distribution, embed_indicator, genre_label_universe, validate_uniform_labels,
};
pub use hashed::HashedBowModel;
pub use text::TextEmbedder;

use crate::errors::{CineError, Result};

/// Capability interface for any text-to-vector backend.
///
/// The pipeline depends only on this trait, never on a concrete embedding
/// library; a transformer-backed implementation can be injected without
/// touching the pipeline.
pub trait EncodingModel: Send + Sync {
    /// Fixed output dimensionality of the model.
    fn dims(&self) -> usize;

    /// Encode a batch of texts into vectors, one per input, optionally
    /// unit-normalized by the backend.
    fn encode(&self, texts: &[String], normalize: bool) -> Result<Vec<Vec<f32>>>;
}

/// Arithmetic mean across vectors of equal dimensionality.
pub fn mean_vector(vectors: &[Vec<f32>]) -> Result<Vec<f32>> {
    let first = vectors.first().ok_or(CineError::NoContent)?;
    let dims = first.len();
    if vectors.iter().any(|v| v.len() != dims) {
        return Err(CineError::Encoder(
            "model returned vectors of mixed dimensionality".to_string(),
        ));
    }

    let mut mean = vec![0.0f32; dims];
    for vector in vectors {
        for (acc, &x) in mean.iter_mut().zip(vector) {
            *acc += x;
        }
    }
    let count = vectors.len() as f32;
    for acc in &mut mean {
        *acc /= count;
    }
    Ok(mean)
}

/// L2-normalize a vector in place. A vector whose norm is exactly zero
/// cannot be normalized and raises `DegenerateVector` instead of
/// producing NaN.
pub fn l2_normalize(vector: &mut [f32]) -> Result<()> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        return Err(CineError::DegenerateVector);
    }
    for x in vector.iter_mut() {
        *x /= norm;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_vector_averages_componentwise() {
        let mean = mean_vector(&[vec![1.0, 3.0], vec![3.0, 5.0]]).unwrap();
        assert_eq!(mean, vec![2.0, 4.0]);
    }

    #[test]
    fn mean_vector_of_nothing_is_no_content() {
        assert!(matches!(mean_vector(&[]), Err(CineError::NoContent)));
    }

    #[test]
    fn mean_vector_rejects_mixed_dims() {
        let err = mean_vector(&[vec![1.0], vec![1.0, 2.0]]).unwrap_err();
        assert!(matches!(err, CineError::Encoder(_)));
    }

    #[test]
    fn normalization_is_idempotent() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v).unwrap();
        let unit = v.clone();
        l2_normalize(&mut v).unwrap();
        for (a, b) in v.iter().zip(&unit) {
            assert!((a - b).abs() < 1e-6);
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_norm_is_degenerate() {
        let mut v = vec![0.0, 0.0, 0.0];
        assert!(matches!(
            l2_normalize(&mut v),
            Err(CineError::DegenerateVector)
        ));
    }
}
