//! Retrieval core for the sustainable smart city assistant.
//!
//! The pipeline: load flat-text documents, split them into word-window
//! chunks, embed the chunks, store chunk text + metadata + vectors in
//! SQLite, and answer queries with brute-force nearest-neighbour search
//! plus keyword heuristics (village comparison, problem solving).

pub mod compare;
pub mod core;
pub mod corpus;
pub mod embedding;
pub mod generate;
pub mod index;
pub mod query;
pub mod solve;
