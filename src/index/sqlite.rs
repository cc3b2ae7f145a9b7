//! SQLite-backed chunk store.
//!
//! Chunk text, metadata and little-endian f32 embedding blobs live in
//! one table; insertion order is preserved through a rowid position
//! column so a reload rebuilds the flat index with identical positions.

use std::path::PathBuf;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};

use super::flat::Metric;
use super::store::{ChunkStore, IndexMeta, StoredChunk};
use crate::core::errors::AssistantError;

pub struct SqliteChunkStore {
    pool: SqlitePool,
    #[allow(dead_code)]
    db_path: PathBuf,
}

impl SqliteChunkStore {
    pub async fn open(db_path: PathBuf) -> Result<Self, AssistantError> {
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(AssistantError::storage)?;

        let store = Self { pool, db_path };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), AssistantError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chunks (
                position INTEGER PRIMARY KEY AUTOINCREMENT,
                chunk_id TEXT NOT NULL UNIQUE,
                text TEXT NOT NULL,
                source TEXT NOT NULL DEFAULT '',
                chunk_index INTEGER NOT NULL DEFAULT 0,
                total_chunks INTEGER NOT NULL DEFAULT 1,
                embedding BLOB NOT NULL,
                created_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(AssistantError::storage)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_chunks_source ON chunks(source)")
            .execute(&self.pool)
            .await
            .map_err(AssistantError::storage)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS index_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(AssistantError::storage)?;

        Ok(())
    }

    fn serialize_embedding(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    async fn meta_value(&self, key: &str) -> Result<Option<String>, AssistantError> {
        let row = sqlx::query("SELECT value FROM index_meta WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(AssistantError::storage)?;
        Ok(row.map(|r| r.get("value")))
    }

    async fn set_meta_value(&self, key: &str, value: &str) -> Result<(), AssistantError> {
        sqlx::query(
            "INSERT INTO index_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now')",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(AssistantError::storage)?;
        Ok(())
    }
}

#[async_trait]
impl ChunkStore for SqliteChunkStore {
    async fn insert_batch(
        &self,
        items: Vec<(StoredChunk, Vec<f32>)>,
    ) -> Result<(), AssistantError> {
        let mut tx = self.pool.begin().await.map_err(AssistantError::storage)?;

        for (chunk, embedding) in items {
            let blob = Self::serialize_embedding(&embedding);
            sqlx::query(
                "INSERT OR REPLACE INTO chunks
                    (chunk_id, text, source, chunk_index, total_chunks, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(&chunk.chunk_id)
            .bind(&chunk.text)
            .bind(&chunk.source)
            .bind(chunk.chunk_index as i64)
            .bind(chunk.total_chunks as i64)
            .bind(blob)
            .execute(&mut *tx)
            .await
            .map_err(AssistantError::storage)?;
        }

        tx.commit().await.map_err(AssistantError::storage)?;
        Ok(())
    }

    async fn load_all(&self) -> Result<(Vec<StoredChunk>, Vec<Vec<f32>>), AssistantError> {
        let rows = sqlx::query(
            "SELECT chunk_id, text, source, chunk_index, total_chunks, embedding
             FROM chunks ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AssistantError::storage)?;

        let mut chunks = Vec::with_capacity(rows.len());
        let mut vectors = Vec::with_capacity(rows.len());
        for row in rows {
            let embedding_bytes: Vec<u8> = row.get("embedding");
            let chunk_index: i64 = row.get("chunk_index");
            let total_chunks: i64 = row.get("total_chunks");

            chunks.push(StoredChunk {
                chunk_id: row.get("chunk_id"),
                text: row.get("text"),
                source: row.get("source"),
                chunk_index: chunk_index as usize,
                total_chunks: total_chunks as usize,
            });
            vectors.push(Self::deserialize_embedding(&embedding_bytes));
        }

        Ok((chunks, vectors))
    }

    async fn count(&self) -> Result<usize, AssistantError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM chunks")
            .fetch_one(&self.pool)
            .await
            .map_err(AssistantError::storage)?;
        let n: i64 = row.get("n");
        Ok(n as usize)
    }

    async fn clear(&self) -> Result<(), AssistantError> {
        sqlx::query("DELETE FROM chunks")
            .execute(&self.pool)
            .await
            .map_err(AssistantError::storage)?;
        sqlx::query("DELETE FROM index_meta")
            .execute(&self.pool)
            .await
            .map_err(AssistantError::storage)?;
        Ok(())
    }

    async fn set_meta(&self, meta: &IndexMeta) -> Result<(), AssistantError> {
        self.set_meta_value("embedding_model", &meta.embedding_model)
            .await?;
        self.set_meta_value("dimension", &meta.dimension.to_string())
            .await?;
        self.set_meta_value("metric", meta.metric.as_str()).await?;
        Ok(())
    }

    async fn meta(&self) -> Result<Option<IndexMeta>, AssistantError> {
        let model = self.meta_value("embedding_model").await?;
        let dimension = self.meta_value("dimension").await?;
        let metric = self.meta_value("metric").await?;

        match (model, dimension, metric) {
            (Some(embedding_model), Some(dimension), Some(metric)) => {
                let dimension = dimension.parse::<usize>().map_err(|_| {
                    AssistantError::Storage(format!("corrupt dimension value: {}", dimension))
                })?;
                Ok(Some(IndexMeta {
                    embedding_model,
                    dimension,
                    metric: Metric::parse(&metric)?,
                }))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, text: &str, source: &str, index: usize) -> StoredChunk {
        StoredChunk {
            chunk_id: id.to_string(),
            text: text.to_string(),
            source: source.to_string(),
            chunk_index: index,
            total_chunks: 2,
        }
    }

    async fn store() -> (tempfile::TempDir, SqliteChunkStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = SqliteChunkStore::open(tmp.path().join("test.db"))
            .await
            .unwrap();
        (tmp, store)
    }

    #[tokio::test]
    async fn round_trip_preserves_order_and_alignment() {
        let (_tmp, store) = store().await;

        store
            .insert_batch(vec![
                (chunk("a", "first", "v.txt", 0), vec![1.0, 0.0]),
                (chunk("b", "second", "v.txt", 1), vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        let (chunks, vectors) = store.load_all().await.unwrap();
        assert_eq!(chunks.len(), vectors.len());
        assert_eq!(chunks[0].chunk_id, "a");
        assert_eq!(chunks[1].chunk_id, "b");
        assert_eq!(vectors[0], vec![1.0, 0.0]);
        assert_eq!(vectors[1], vec![0.0, 1.0]);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn reinserting_a_chunk_id_replaces_it() {
        let (_tmp, store) = store().await;

        store
            .insert_batch(vec![(chunk("a", "old", "v.txt", 0), vec![1.0])])
            .await
            .unwrap();
        store
            .insert_batch(vec![(chunk("a", "new", "v.txt", 0), vec![2.0])])
            .await
            .unwrap();

        let (chunks, vectors) = store.load_all().await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "new");
        assert_eq!(vectors[0], vec![2.0]);
    }

    #[tokio::test]
    async fn meta_round_trip() {
        let (_tmp, store) = store().await;
        assert!(store.meta().await.unwrap().is_none());

        let meta = IndexMeta {
            embedding_model: "hash".to_string(),
            dimension: 64,
            metric: Metric::InnerProduct,
        };
        store.set_meta(&meta).await.unwrap();

        let loaded = store.meta().await.unwrap().unwrap();
        assert_eq!(loaded.embedding_model, "hash");
        assert_eq!(loaded.dimension, 64);
        assert_eq!(loaded.metric, Metric::InnerProduct);
    }

    #[tokio::test]
    async fn clear_removes_chunks_and_meta() {
        let (_tmp, store) = store().await;
        store
            .insert_batch(vec![(chunk("a", "x", "v.txt", 0), vec![1.0])])
            .await
            .unwrap();
        store
            .set_meta(&IndexMeta {
                embedding_model: "hash".to_string(),
                dimension: 1,
                metric: Metric::L2,
            })
            .await
            .unwrap();

        store.clear().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.meta().await.unwrap().is_none());
    }
}
