use crate::error::EmbedError;

/// Embedder turns a vocabulary word into a dense float32 vector.
///
/// Vectors are expected to be L2-normalized; consumers re-normalize before
/// persisting anyway. A failed call affects only the word(s) passed in.
///
/// Implementations must be safe for concurrent use (Send + Sync).
#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
    /// Return the embedding vector for a single word.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    /// Return embedding vectors for several words, in input order.
    ///
    /// The default implementation calls [`Embedder::embed`] per word and
    /// fails on the first error.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// Return the dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
