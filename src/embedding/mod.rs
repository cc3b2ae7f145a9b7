//! Embedding providers.
//!
//! `OpenAiCompatEmbedder` talks to a local OpenAI-compatible server
//! (LM Studio / llama.cpp style). `HashEmbedder` is a deterministic
//! offline stand-in used for tests and endpoint-less runs.

mod hashing;
mod openai_compat;
mod provider;

pub use hashing::HashEmbedder;
pub use openai_compat::OpenAiCompatEmbedder;
pub use provider::EmbeddingProvider;
