use serde::{Deserialize, Serialize};

/// Settings for an OpenAI-compatible embedding endpoint.
///
/// Empty strings and a zero dimension mean "use the provider default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub model: String,

    #[serde(skip_serializing_if = "is_zero")]
    pub dimension: usize,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_url: String,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl EmbedConfig {
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = key.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_dimension(mut self, dim: usize) -> Self {
        self.dimension = dim;
        self
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// True when an API key is configured.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}
