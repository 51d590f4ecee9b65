//! Semantic retrieval infrastructure for recipe embeddings.
//!
//! Embeddings are generated locally with fastembed and stored inside each
//! recipe document; ranking is a full scan scored with cosine similarity.
//!
//! # Architecture
//!
//! - `embeddings`: Wraps fastembed for embedding generation
//! - `provider`: Lazily-initialized embedding service behind the `Embedder` seam
//! - `scorer`: Cosine similarity scoring of one query against many documents

pub mod embeddings;
mod provider;
mod scorer;

pub use embeddings::{EmbeddingError, EmbeddingModel};
pub use provider::{Embedder, EmbeddingProvider};
pub use scorer::{cosine_similarities, round3};
