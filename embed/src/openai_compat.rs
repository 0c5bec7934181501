use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::EmbedError;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
    encoding_format: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f64>,
}

/// Parameters of one call to an OpenAI-compatible `/embeddings` endpoint.
pub(crate) struct EmbeddingCall<'a> {
    pub api_key: &'a str,
    pub base_url: &'a str,
    pub model: &'a str,
    pub dimensions: Option<usize>,
}

/// Call an OpenAI-compatible embedding endpoint and return one vector per
/// input text, in input order.
pub(crate) async fn call_embedding_api(
    client: &Client,
    call: &EmbeddingCall<'_>,
    texts: &[&str],
) -> Result<Vec<Vec<f32>>, EmbedError> {
    let url = format!("{}/embeddings", call.base_url.trim_end_matches('/'));
    let body = EmbeddingRequest {
        model: call.model,
        input: texts,
        dimensions: call.dimensions,
        encoding_format: "float",
    };

    let resp = client
        .post(&url)
        .bearer_auth(call.api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| EmbedError::Api(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(EmbedError::Api(format!("HTTP {status}: {body}")));
    }

    let data: EmbeddingResponse = resp
        .json()
        .await
        .map_err(|e| EmbedError::Api(e.to_string()))?;

    order_by_index(data.data, texts.len())
}

/// The API may return items out of order; slot them back by index.
fn order_by_index(items: Vec<EmbeddingData>, n: usize) -> Result<Vec<Vec<f32>>, EmbedError> {
    let mut vecs: Vec<Option<Vec<f32>>> = vec![None; n];
    for item in items {
        if item.index >= n {
            return Err(EmbedError::UnexpectedIndex {
                index: item.index,
                batch_size: n,
            });
        }
        vecs[item.index] = Some(item.embedding.iter().map(|&v| v as f32).collect());
    }

    vecs.into_iter()
        .enumerate()
        .map(|(i, v)| v.ok_or(EmbedError::MissingIndex(i)))
        .collect()
}
