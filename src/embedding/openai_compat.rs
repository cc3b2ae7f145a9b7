use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::EmbeddingProvider;
use crate::core::errors::AssistantError;

/// Batch size per request; local servers choke on very large payloads.
const MAX_BATCH: usize = 32;

/// Embedder backed by a `/v1/embeddings` endpoint.
#[derive(Clone)]
pub struct OpenAiCompatEmbedder {
    base_url: String,
    model_id: String,
    dimension: usize,
    client: Client,
}

impl OpenAiCompatEmbedder {
    pub fn new(
        base_url: String,
        model_id: String,
        dimension: usize,
        timeout: Duration,
    ) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AssistantError::internal)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model_id,
            dimension,
            client,
        })
    }

    async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AssistantError> {
        let url = format!("{}/v1/embeddings", self.base_url);
        let body = json!({
            "model": self.model_id,
            "input": inputs,
        });

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(AssistantError::internal)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(AssistantError::Embedding(format!(
                "embeddings endpoint error: {}",
                text
            )));
        }

        let payload: Value = res.json().await.map_err(AssistantError::internal)?;

        let mut embeddings = Vec::new();
        if let Some(data) = payload["data"].as_array() {
            for item in data {
                if let Some(vals) = item["embedding"].as_array() {
                    let vec: Vec<f32> = vals
                        .iter()
                        .filter_map(|v| v.as_f64().map(|f| f as f32))
                        .collect();
                    embeddings.push(vec);
                }
            }
        }

        if embeddings.len() != inputs.len() {
            return Err(AssistantError::Embedding(format!(
                "endpoint returned {} vectors for {} inputs",
                embeddings.len(),
                inputs.len()
            )));
        }
        for vec in &embeddings {
            if vec.len() != self.dimension {
                return Err(AssistantError::Embedding(format!(
                    "vector dimension mismatch: got {}, expected {}",
                    vec.len(),
                    self.dimension
                )));
            }
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiCompatEmbedder {
    fn name(&self) -> &str {
        "openai-compat"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn health_check(&self) -> Result<bool, AssistantError> {
        let url = format!("{}/v1/models", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AssistantError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let mut all = Vec::with_capacity(inputs.len());
        for batch in inputs.chunks(MAX_BATCH) {
            let vectors = self.embed_batch(batch).await?;
            all.extend(vectors);
            tracing::debug!("embedded {}/{} texts", all.len(), inputs.len());
        }

        Ok(all)
    }
}
