use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Embedder, EmbeddingError};

/// OpenAI-compatible embedding backend (`POST {base_url}/v1/embeddings`).
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String, model: String, base_url: String) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedItem>,
}

#[derive(Deserialize)]
struct EmbedItem {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api(format!("{status}: {body}")));
        }

        let resp: EmbedResponse = response.json().await?;
        let vectors = into_vectors(resp, texts.len())?;
        debug!(model = %self.model, count = vectors.len(), "Embeddings received");
        Ok(vectors)
    }
}

/// Orders the returned vectors by input index and checks one came back per text.
fn into_vectors(
    mut resp: EmbedResponse,
    expected: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    resp.data.sort_by_key(|item| item.index);

    if resp.data.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            actual: resp.data.len(),
        });
    }

    Ok(resp.data.into_iter().map(|item| item.embedding).collect())
}
