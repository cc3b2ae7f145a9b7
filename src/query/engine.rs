use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::errors::AssistantError;
use crate::embedding::EmbeddingProvider;
use crate::index::{FlatIndex, Metric, StoredChunk};

/// A ranked search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub source: String,
    pub chunk_index: usize,
    /// Raw metric value from the index (L2 distance or cosine).
    pub distance: f32,
    /// Normalised similarity in (0, 1]; `1 / (1 + distance)` for L2,
    /// the cosine itself for inner-product indexes.
    pub score: f32,
    /// 1-based rank in the result list.
    pub rank: usize,
}

pub struct QueryEngine {
    index: FlatIndex,
    chunks: Vec<StoredChunk>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl QueryEngine {
    pub fn new(
        index: FlatIndex,
        chunks: Vec<StoredChunk>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, AssistantError> {
        if index.len() != chunks.len() {
            return Err(AssistantError::Internal(format!(
                "index/chunk misalignment: {} vectors, {} chunks",
                index.len(),
                chunks.len()
            )));
        }
        Ok(Self {
            index,
            chunks,
            embedder,
        })
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// k-nearest-neighbour search for a free-text query.
    pub async fn search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>, AssistantError> {
        if query.trim().is_empty() {
            return Err(AssistantError::BadRequest("empty query".to_string()));
        }

        let embedded = self.embedder.embed(&[query.to_string()]).await?;
        let query_vector = embedded
            .first()
            .ok_or_else(|| AssistantError::Embedding("no vector for query".to_string()))?;

        let hits = self.index.search(query_vector, k)?;
        let results = hits
            .into_iter()
            .filter(|(idx, _)| *idx < self.chunks.len())
            .enumerate()
            .map(|(rank, (idx, distance))| {
                let chunk = &self.chunks[idx];
                RetrievedChunk {
                    text: chunk.text.clone(),
                    source: chunk.source.clone(),
                    chunk_index: chunk.chunk_index,
                    distance,
                    score: self.similarity(distance),
                    rank: rank + 1,
                }
            })
            .collect();

        Ok(results)
    }

    /// Retrieve chunks about a named entity (a village or a city).
    ///
    /// Searches with a widened candidate set, then keeps only chunks
    /// that mention the entity lexically, since nearest neighbours for
    /// a bare name drift toward generic corpus text.
    pub async fn retrieve_entity(
        &self,
        name: &str,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>, AssistantError> {
        let candidates = (k * 2).min(self.chunks.len().max(1));
        let hits = self.search(name, candidates).await?;

        let mut relevant: Vec<RetrievedChunk> = hits
            .into_iter()
            .filter(|hit| is_relevant_chunk(name, &hit.text, &hit.source))
            .collect();
        relevant.truncate(k);

        for (rank, hit) in relevant.iter_mut().enumerate() {
            hit.rank = rank + 1;
        }

        tracing::info!("retrieved {} relevant chunks for {}", relevant.len(), name);
        Ok(relevant)
    }

    fn similarity(&self, distance: f32) -> f32 {
        match self.index.metric() {
            Metric::L2 => 1.0 / (1.0 + distance),
            Metric::InnerProduct => distance,
        }
    }
}

/// Lexical relevance check for entity retrieval.
fn is_relevant_chunk(name: &str, text: &str, source: &str) -> bool {
    let name_lower = name.to_lowercase();
    let text_lower = text.to_lowercase();
    let source_lower = source.to_lowercase();

    text_lower.contains(&name_lower)
        || source_lower.contains(&name_lower)
        || name_lower
            .split_whitespace()
            .any(|word| text_lower.contains(word))
        || fuzzy_match(&name_lower, &text_lower)
}

/// Loose match: any name word longer than 3 characters appearing in
/// the text counts.
fn fuzzy_match(name: &str, text: &str) -> bool {
    name.split_whitespace()
        .any(|word| word.len() > 3 && text.contains(word))
}
