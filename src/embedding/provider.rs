use async_trait::async_trait;

use crate::core::errors::AssistantError;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// return the provider name (e.g. "openai-compat", "hash")
    fn name(&self) -> &str;

    /// length of every vector this provider produces
    fn dimension(&self) -> usize;

    /// check if the provider is healthy/reachable
    async fn health_check(&self) -> Result<bool, AssistantError>;

    /// embed a batch of texts, one vector per input, in order
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AssistantError>;
}
