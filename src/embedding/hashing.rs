use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::provider::EmbeddingProvider;
use crate::core::errors::AssistantError;

/// Deterministic bag-of-words embedder.
///
/// Each lowercased token is hashed into a bucket of a fixed-length
/// vector, which is then L2-normalised. No semantics beyond lexical
/// overlap, but the output is stable across runs and needs no model
/// server, which is what the tests and the offline path require.
#[derive(Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dimension];

        for token in text.split_whitespace() {
            let token: String = token
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            if token.is_empty() {
                continue;
            }

            let digest = Sha256::digest(token.as_bytes());
            let bucket = u64::from_le_bytes(digest[..8].try_into().unwrap_or_default());
            vec[(bucket % self.dimension as u64) as usize] += 1.0;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for x in &mut vec {
                *x /= norm;
            }
        }

        vec
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    fn name(&self) -> &str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn health_check(&self) -> Result<bool, AssistantError> {
        Ok(true)
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AssistantError> {
        Ok(inputs.iter().map(|text| self.embed_one(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn output_is_deterministic_and_normalised() {
        let embedder = HashEmbedder::new(64);
        let inputs = vec!["solar power in Dharnai".to_string()];

        let first = embedder.embed(&inputs).await.unwrap();
        let second = embedder.embed(&inputs).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].len(), 64);

        let norm: f32 = first[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn similar_texts_score_higher_than_unrelated() {
        let embedder = HashEmbedder::new(128);
        let inputs = vec![
            "water conservation and rainwater harvesting".to_string(),
            "rainwater harvesting tanks for water storage".to_string(),
            "digital banking and cashless transactions".to_string(),
        ];
        let vecs = embedder.embed(&inputs).await.unwrap();

        let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };
        assert!(dot(&vecs[0], &vecs[1]) > dot(&vecs[0], &vecs[2]));
    }

    #[tokio::test]
    async fn empty_input_is_a_zero_vector() {
        let embedder = HashEmbedder::new(16);
        let vecs = embedder.embed(&["".to_string()]).await.unwrap();
        assert!(vecs[0].iter().all(|x| *x == 0.0));
    }
}
