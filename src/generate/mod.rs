//! Optional prose generation for comparison reports.
//!
//! The comparator works from templates alone; when an OpenAI-compatible
//! chat endpoint is configured, its output is spliced into the report
//! instead. Any failure falls back to the template text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::core::errors::AssistantError;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// return the generator name
    fn name(&self) -> &str;

    /// generate a completion for a single prompt
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError>;
}

/// Generator backed by a `/v1/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiCompatGenerator {
    base_url: String,
    model_id: String,
    client: Client,
}

impl OpenAiCompatGenerator {
    pub fn new(
        base_url: String,
        model_id: String,
        timeout: Duration,
    ) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AssistantError::internal)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model_id,
            client,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatGenerator {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = json!({
            "model": self.model_id,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0.7,
            "max_tokens": 800,
            "stream": false,
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
            return Err(AssistantError::Internal(format!(
                "chat endpoint error: {}",
                text
            )));
        }

        let payload: Value = res.json().await.map_err(AssistantError::internal)?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        if content.is_empty() {
            return Err(AssistantError::Internal(
                "chat endpoint returned no content".to_string(),
            ));
        }
        Ok(content)
    }
}
