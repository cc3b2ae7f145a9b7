//! Corpus handling: document loading and chunking.
//!
//! Documents are flat `.txt` files, one per entity (a village or a
//! problem report). Chunks are fixed-size word windows with overlap and
//! are the unit of embedding and retrieval.

mod chunker;
mod loader;

pub use chunker::{chunk_documents, split_into_chunks, ChunkerConfig, TextChunk};
pub use loader::{load_documents, Document};
