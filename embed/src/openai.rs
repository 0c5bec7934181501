use reqwest::Client;

use crate::config::EmbedConfig;
use crate::embed::Embedder;
use crate::error::EmbedError;
use crate::openai_compat::{EmbeddingCall, call_embedding_api};

pub const MODEL_OPENAI_3_SMALL: &str = "text-embedding-3-small";
pub const MODEL_OPENAI_3_LARGE: &str = "text-embedding-3-large";

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENAI_MAX_BATCH: usize = 2048;
const OPENAI_DEFAULT_DIM: usize = 1536;

/// Embedder backed by the OpenAI embeddings API.
///
/// Works with any OpenAI-compatible provider by setting
/// [`EmbedConfig::base_url`]. Words are lowercased keys already, so the text
/// sent is the word itself.
pub struct OpenAI {
    client: Client,
    api_key: String,
    model: String,
    dim: usize,
    base_url: String,
}

impl OpenAI {
    pub fn new(api_key: &str) -> Self {
        Self::from_config(EmbedConfig::default().with_api_key(api_key))
    }

    pub fn from_config(cfg: EmbedConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: cfg.api_key,
            model: non_empty(cfg.model, MODEL_OPENAI_3_SMALL),
            dim: if cfg.dimension == 0 {
                OPENAI_DEFAULT_DIM
            } else {
                cfg.dimension
            },
            base_url: non_empty(cfg.base_url, OPENAI_BASE_URL),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn call_api(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if self.api_key.is_empty() {
            return Err(EmbedError::MissingApiKey);
        }
        let call = EmbeddingCall {
            api_key: &self.api_key,
            base_url: &self.base_url,
            model: &self.model,
            dimensions: Some(self.dim),
        };
        let vecs = call_embedding_api(&self.client, &call, texts).await?;
        for v in &vecs {
            if v.len() != self.dim {
                return Err(EmbedError::DimensionMismatch {
                    got: v.len(),
                    want: self.dim,
                });
            }
        }
        Ok(vecs)
    }
}

fn non_empty(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

#[async_trait::async_trait]
impl Embedder for OpenAI {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        if text.trim().is_empty() {
            return Err(EmbedError::EmptyInput);
        }
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or(EmbedError::MissingIndex(0))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Err(EmbedError::EmptyInput);
        }

        let mut result = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(OPENAI_MAX_BATCH) {
            tracing::debug!(words = chunk.len(), model = %self.model, "embed: calling API");
            result.extend(self.call_api(chunk).await?);
        }
        Ok(result)
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_fill_in() {
        let e = OpenAI::from_config(EmbedConfig::default().with_api_key("sk-test"));
        assert_eq!(e.model(), MODEL_OPENAI_3_SMALL);
        assert_eq!(e.dimension(), OPENAI_DEFAULT_DIM);
        assert_eq!(e.base_url, OPENAI_BASE_URL);
    }

    #[test]
    fn config_overrides_apply() {
        let cfg = EmbedConfig::default()
            .with_api_key("sk-test")
            .with_model(MODEL_OPENAI_3_LARGE)
            .with_dimension(256)
            .with_base_url("http://localhost:8080/v1");
        let e = OpenAI::from_config(cfg);
        assert_eq!(e.model(), MODEL_OPENAI_3_LARGE);
        assert_eq!(e.dimension(), 256);
        assert_eq!(e.base_url, "http://localhost:8080/v1");
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let e = OpenAI::from_config(EmbedConfig::default());
        let err = e.embed("apple").await.unwrap_err();
        assert!(matches!(err, EmbedError::MissingApiKey));
    }

    #[tokio::test]
    async fn blank_word_is_rejected() {
        let e = OpenAI::new("sk-test");
        assert!(matches!(e.embed("  ").await, Err(EmbedError::EmptyInput)));
    }
}
