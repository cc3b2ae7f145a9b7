//! Query engine: embed a query, run nearest-neighbour search, filter.

mod engine;

pub use engine::{QueryEngine, RetrievedChunk};
