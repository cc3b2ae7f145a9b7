use serde::{Deserialize, Serialize};

use super::loader::Document;
use crate::core::errors::AssistantError;

/// Chunking parameters, counted in words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }
}

impl ChunkerConfig {
    pub fn validate(&self) -> Result<(), AssistantError> {
        if self.chunk_size == 0 {
            return Err(AssistantError::BadRequest(
                "chunk_size must be positive".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(AssistantError::BadRequest(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// A chunk of a source document with positional metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChunk {
    pub text: String,
    /// Source file name.
    pub source: String,
    /// Chunk index within the source.
    pub chunk_index: usize,
    /// Number of chunks the source was split into.
    pub total_chunks: usize,
    /// Word offset of the chunk in the source.
    pub start_word: usize,
}

/// Split text into overlapping word windows.
///
/// The window advances by `chunk_size - overlap` words. A text of at
/// most `chunk_size` words comes back as a single chunk. Boundaries are
/// a pure function of the input and the config.
pub fn split_into_chunks(text: &str, config: &ChunkerConfig) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.is_empty() {
        return Vec::new();
    }
    if words.len() <= config.chunk_size {
        return vec![words.join(" ")];
    }

    let step = config.chunk_size.saturating_sub(config.overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let end = (start + config.chunk_size).min(words.len());
        chunks.push(words[start..end].join(" "));

        if end == words.len() {
            break;
        }
        start += step;
    }

    chunks
}

/// Chunk a batch of documents, attaching per-chunk metadata.
pub fn chunk_documents(
    docs: &[Document],
    config: &ChunkerConfig,
) -> Result<Vec<TextChunk>, AssistantError> {
    config.validate()?;

    let step = config.chunk_size.saturating_sub(config.overlap).max(1);
    let mut all = Vec::new();

    for doc in docs {
        let pieces = split_into_chunks(&doc.text, config);
        tracing::debug!("{}: {} chunks", doc.filename, pieces.len());

        let total = pieces.len();
        for (i, text) in pieces.into_iter().enumerate() {
            all.push(TextChunk {
                text,
                source: doc.filename.clone(),
                chunk_index: i,
                total_chunks: total,
                start_word: i * step,
            });
        }
    }

    if all.is_empty() {
        return Err(AssistantError::BadRequest(
            "no text chunks to embed".to_string(),
        ));
    }

    tracing::info!("chunked {} documents into {} chunks", docs.len(), all.len());
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(chunk_size: usize, overlap: usize) -> ChunkerConfig {
        ChunkerConfig {
            chunk_size,
            overlap,
        }
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let text = words(10);
        let chunks = split_into_chunks(&text, &config(500, 50));
        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn windows_advance_by_stride() {
        let chunks = split_into_chunks(&words(25), &config(10, 2));
        // stride 8: windows 0..10, 8..18, 16..25
        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].starts_with("w0 "));
        assert!(chunks[1].starts_with("w8 "));
        assert!(chunks[2].starts_with("w16 "));
        assert!(chunks[2].ends_with("w24"));
    }

    #[test]
    fn consecutive_chunks_overlap() {
        let chunks = split_into_chunks(&words(20), &config(10, 2));
        assert!(chunks[0].ends_with("w8 w9"));
        assert!(chunks[1].starts_with("w8 w9"));
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = words(1234);
        let cfg = config(500, 50);
        assert_eq!(split_into_chunks(&text, &cfg), split_into_chunks(&text, &cfg));
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(split_into_chunks("   ", &config(10, 2)).is_empty());
    }

    #[test]
    fn document_metadata_is_positional() {
        let docs = vec![
            Document {
                filename: "a.txt".to_string(),
                text: words(25),
            },
            Document {
                filename: "b.txt".to_string(),
                text: words(3),
            },
        ];

        let chunks = chunk_documents(&docs, &config(10, 2)).unwrap();
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].source, "a.txt");
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].total_chunks, 3);
        assert_eq!(chunks[1].start_word, 8);
        assert_eq!(chunks[3].source, "b.txt");
        assert_eq!(chunks[3].total_chunks, 1);
    }

    #[test]
    fn invalid_overlap_is_rejected() {
        let docs = vec![Document {
            filename: "a.txt".to_string(),
            text: words(5),
        }];
        assert!(chunk_documents(&docs, &config(10, 10)).is_err());
    }
}
