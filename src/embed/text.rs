//! Plot-text embedding: one mean phrase vector per document.

use crate::config::PipelineConfig;
use crate::corpus::normalize_phrases;
use crate::embed::{l2_normalize, mean_vector, EncodingModel};
use crate::errors::{CineError, Result};

/// Embeds a plot summary as the arithmetic mean of its phrase vectors.
pub struct TextEmbedder<'a> {
    model: &'a dyn EncodingModel,
    template: String,
    normalize: bool,
}

impl std::fmt::Debug for TextEmbedder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEmbedder")
            .field("model", &"<EncodingModel>")
            .field("template", &self.template)
            .field("normalize", &self.normalize)
            .finish()
    }
}

impl<'a> TextEmbedder<'a> {
    /// Create an embedder over an injected encoding model.
    pub fn new(model: &'a dyn EncodingModel, config: &PipelineConfig) -> Self {
        Self {
            model,
            template: config.input_template.clone(),
            normalize: config.normalize_embeddings,
        }
    }

    /// Embed one document.
    ///
    /// Splits the text into deduplicated phrases, prefixes each with the
    /// retrieval template, encodes the batch, and averages. A text that
    /// yields no phrases is `NoContent`; a zero-norm mean under
    /// normalization is `DegenerateVector`.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let phrases = normalize_phrases(text);
        if phrases.is_empty() {
            return Err(CineError::NoContent);
        }

        let formatted: Vec<String> = phrases
            .iter()
            .map(|p| format!("{}{}", self.template, p))
            .collect();

        let vectors = self.model.encode(&formatted, true)?;
        if vectors.len() != formatted.len() {
            return Err(CineError::Encoder(format!(
                "model returned {} vectors for {} phrases",
                vectors.len(),
                formatted.len()
            )));
        }

        let mut mean = mean_vector(&vectors)?;
        if self.normalize {
            l2_normalize(&mut mean)?;
        }
        Ok(mean)
    }
}
