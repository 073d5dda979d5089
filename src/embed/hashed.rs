//! Deterministic hashed bag-of-words encoding model.
//!
//! Feature-hashes lowercased alphanumeric tokens into a fixed-width
//! vector with seeded XxHash64, so the same text encodes identically
//! across runs and platforms. This is the built-in offline backend; a
//! transformer-backed [`EncodingModel`](crate::embed::EncodingModel)
//! implementation can be injected in its place without touching the
//! pipeline.

use std::hash::Hasher;

use twox_hash::XxHash64;

use crate::embed::{l2_normalize, EncodingModel};
use crate::errors::{CineError, Result};

const HASH_SEED: u64 = 0x9E37_79B1_85EB_CA87;

/// Bag-of-words model hashing tokens into `dims` buckets.
#[derive(Debug, Clone)]
pub struct HashedBowModel {
    dims: usize,
}

impl HashedBowModel {
    /// Default vector width for the built-in backend.
    pub const DEFAULT_DIMS: usize = 256;

    /// Create a model with the given vector width.
    pub fn new(dims: usize) -> Result<Self> {
        if dims == 0 {
            return Err(CineError::Config(
                "hashed bag-of-words dims must be positive".to_string(),
            ));
        }
        Ok(Self { dims })
    }

    fn token_slot(&self, token: &str) -> usize {
        let mut hasher = XxHash64::with_seed(HASH_SEED);
        hasher.write(token.as_bytes());
        (hasher.finish() as usize) % self.dims
    }

    fn encode_one(&self, text: &str, normalize: bool) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dims];
        for token in text.split(|c: char| !c.is_alphanumeric()) {
            if token.is_empty() {
                continue;
            }
            vector[self.token_slot(&token.to_lowercase())] += 1.0;
        }
        if normalize {
            l2_normalize(&mut vector)?;
        }
        Ok(vector)
    }
}

impl Default for HashedBowModel {
    fn default() -> Self {
        Self {
            dims: Self::DEFAULT_DIMS,
        }
    }
}

impl EncodingModel for HashedBowModel {
    fn dims(&self) -> usize {
        self.dims
    }

    fn encode(&self, texts: &[String], normalize: bool) -> Result<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|text| self.encode_one(text, normalize))
            .collect()
    }
}
