use std::path::Path;

use sha2::{Digest, Sha256};

use super::flat::{FlatIndex, Metric};
use super::store::{ChunkStore, IndexMeta, StoredChunk};
use crate::core::errors::AssistantError;
use crate::corpus::{chunk_documents, load_documents, ChunkerConfig, TextChunk};
use crate::embedding::EmbeddingProvider;

/// Load, chunk, embed and persist a document folder.
///
/// Replaces whatever the store held before; the index metadata records
/// the embedding model so stale vectors are detected on open.
pub async fn build_index(
    docs_dir: &Path,
    store: &dyn ChunkStore,
    embedder: &dyn EmbeddingProvider,
    chunker: &ChunkerConfig,
    metric: Metric,
) -> Result<usize, AssistantError> {
    let docs = load_documents(docs_dir)?;
    let chunks = chunk_documents(&docs, chunker)?;

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = embedder.embed(&texts).await?;
    if vectors.len() != chunks.len() {
        return Err(AssistantError::Embedding(format!(
            "embedder returned {} vectors for {} chunks",
            vectors.len(),
            chunks.len()
        )));
    }

    store.clear().await?;
    let items: Vec<(StoredChunk, Vec<f32>)> = chunks
        .iter()
        .zip(vectors)
        .map(|(chunk, vector)| (stored_chunk(chunk), vector))
        .collect();
    store.insert_batch(items).await?;
    store
        .set_meta(&IndexMeta {
            embedding_model: embedder.name().to_string(),
            dimension: embedder.dimension(),
            metric,
        })
        .await?;

    tracing::info!(
        "indexed {} chunks from {} documents ({} metric, dim {})",
        chunks.len(),
        docs.len(),
        metric.as_str(),
        embedder.dimension()
    );
    Ok(chunks.len())
}

/// Rebuild the in-memory flat index from a store.
pub async fn open_index(
    store: &dyn ChunkStore,
) -> Result<(FlatIndex, Vec<StoredChunk>), AssistantError> {
    let meta = store.meta().await?.ok_or_else(|| {
        AssistantError::NotFound("index has not been built yet; run the index command".to_string())
    })?;

    let (chunks, vectors) = store.load_all().await?;
    if chunks.is_empty() {
        return Err(AssistantError::NotFound("index is empty".to_string()));
    }
    for vector in &vectors {
        if vector.len() != meta.dimension {
            return Err(AssistantError::Storage(format!(
                "stored vector has dimension {}, index metadata says {}",
                vector.len(),
                meta.dimension
            )));
        }
    }

    let mut index = FlatIndex::new(meta.dimension, meta.metric);
    index.add_batch(vectors)?;

    debug_assert_eq!(index.len(), chunks.len());
    tracing::info!("loaded index with {} vectors", index.len());
    Ok((index, chunks))
}

fn stored_chunk(chunk: &TextChunk) -> StoredChunk {
    StoredChunk {
        chunk_id: chunk_id(&chunk.source, chunk.chunk_index, &chunk.text),
        text: chunk.text.clone(),
        source: chunk.source.clone(),
        chunk_index: chunk.chunk_index,
        total_chunks: chunk.total_chunks,
    }
}

/// Stable id so re-indexing the same corpus replaces rows instead of
/// duplicating them.
fn chunk_id(source: &str, index: usize, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update([0]);
    hasher.update(index.to_le_bytes());
    hasher.update([0]);
    hasher.update(text.as_bytes());
    hex::encode(&hasher.finalize()[..16])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;
    use crate::index::SqliteChunkStore;

    #[test]
    fn chunk_ids_are_stable_and_distinct() {
        assert_eq!(chunk_id("a.txt", 0, "text"), chunk_id("a.txt", 0, "text"));
        assert_ne!(chunk_id("a.txt", 0, "text"), chunk_id("a.txt", 1, "text"));
        assert_ne!(chunk_id("a.txt", 0, "text"), chunk_id("b.txt", 0, "text"));
    }

    #[tokio::test]
    async fn build_then_open_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let docs_dir = tmp.path().join("docs");
        std::fs::create_dir(&docs_dir).unwrap();
        std::fs::write(docs_dir.join("one.txt"), "solar power village").unwrap();
        std::fs::write(docs_dir.join("two.txt"), "water harvesting village").unwrap();

        let store = SqliteChunkStore::open(tmp.path().join("idx.db"))
            .await
            .unwrap();
        let embedder = HashEmbedder::new(32);

        let n = build_index(
            &docs_dir,
            &store,
            &embedder,
            &ChunkerConfig::default(),
            Metric::InnerProduct,
        )
        .await
        .unwrap();
        assert_eq!(n, 2);

        let (index, chunks) = open_index(&store).await.unwrap();
        assert_eq!(index.len(), chunks.len());
        assert_eq!(index.dimension(), 32);
        assert_eq!(index.metric(), Metric::InnerProduct);
    }

    #[tokio::test]
    async fn open_without_build_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SqliteChunkStore::open(tmp.path().join("idx.db"))
            .await
            .unwrap();
        assert!(matches!(
            open_index(&store).await,
            Err(AssistantError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn rebuild_replaces_previous_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let docs_a = tmp.path().join("a");
        let docs_b = tmp.path().join("b");
        std::fs::create_dir(&docs_a).unwrap();
        std::fs::create_dir(&docs_b).unwrap();
        std::fs::write(docs_a.join("x.txt"), "alpha").unwrap();
        std::fs::write(docs_b.join("y.txt"), "beta").unwrap();

        let store = SqliteChunkStore::open(tmp.path().join("idx.db"))
            .await
            .unwrap();
        let embedder = HashEmbedder::new(16);
        let chunker = ChunkerConfig::default();

        build_index(&docs_a, &store, &embedder, &chunker, Metric::L2)
            .await
            .unwrap();
        build_index(&docs_b, &store, &embedder, &chunker, Metric::L2)
            .await
            .unwrap();

        let (_, chunks) = open_index(&store).await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].source, "y.txt");
    }
}
