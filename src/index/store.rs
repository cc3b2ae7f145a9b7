//! ChunkStore trait — abstract interface for index persistence.
//!
//! The store keeps chunk text, per-chunk metadata and embedding vectors
//! together, aligned by insertion order. The primary implementation is
//! `SqliteChunkStore` in the `sqlite` module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::flat::Metric;
use crate::core::errors::AssistantError;

/// A persisted chunk with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    /// Stable identifier derived from source, index and content.
    pub chunk_id: String,
    pub text: String,
    /// Source file name.
    pub source: String,
    /// Chunk index within the source.
    pub chunk_index: usize,
    /// Number of chunks the source was split into.
    pub total_chunks: usize,
}

/// Index-level metadata recorded at build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMeta {
    pub embedding_model: String,
    pub dimension: usize,
    pub metric: Metric,
}

/// Abstract persistence for the flat index.
///
/// `load_all` must return chunks and vectors in insertion order with
/// equal lengths, so positions in the rebuilt index line up with the
/// chunk array.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Insert chunks with their embedding vectors.
    async fn insert_batch(
        &self,
        items: Vec<(StoredChunk, Vec<f32>)>,
    ) -> Result<(), AssistantError>;

    /// Load every chunk and vector, aligned by position.
    async fn load_all(&self) -> Result<(Vec<StoredChunk>, Vec<Vec<f32>>), AssistantError>;

    /// Total number of stored chunks.
    async fn count(&self) -> Result<usize, AssistantError>;

    /// Remove all chunks and index metadata.
    async fn clear(&self) -> Result<(), AssistantError>;

    /// Record index metadata (model, dimension, metric).
    async fn set_meta(&self, meta: &IndexMeta) -> Result<(), AssistantError>;

    /// Read index metadata, if the index has been built.
    async fn meta(&self) -> Result<Option<IndexMeta>, AssistantError>;
}
