//! Flat vector index and its SQLite persistence.
//!
//! The index is brute force: a query vector is compared against every
//! stored vector. Chunk text, metadata and vectors are kept as parallel
//! arrays aligned by position; the store preserves insertion order so a
//! reload reproduces the same positions.

mod builder;
mod flat;
mod sqlite;
mod store;

pub use builder::{build_index, open_index};
pub use flat::{normalize, FlatIndex, Metric};
pub use sqlite::SqliteChunkStore;
pub use store::{ChunkStore, IndexMeta, StoredChunk};
